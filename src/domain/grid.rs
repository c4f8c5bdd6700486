//! Read-only tile grid: solidity queries and world ⇄ grid conversion.
//!
//! ## Coordinate systems
//!
//! World space: X grows right, Y grows **up**, origin at the map's
//! bottom-left corner.
//!
//! Grid space: `(gx, gy)` integer cells, `gy` grows **down** from the top
//! row (the tile map layer layout). Converting a world Y therefore inverts:
//!
//! ```text
//!   gy = floor(height_tiles - world_y / tile_size)
//! ```
//!
//! Row `r` spans world Y `(ts * (h - r - 1), ts * (h - r)]` under this
//! formula, so a point lying exactly on a tile's top edge maps to that tile.
//! Ground snapping relies on this: a body resting on row `r` keeps scanning
//! row `r` on the next tick.
//!
//! ## Solidity
//!
//! Out-of-range cells are never solid. In-range cells are solid iff their
//! gid is collidable in the grid's `TileSet`. The per-cell answer is
//! computed once at construction; the grid is immutable afterwards and may
//! be shared by reference across bodies and threads.

use glam::{IVec2, Vec2};

use super::rect::Rect;
use super::tile::{TileSet, EMPTY_GID};

#[derive(Clone, Debug)]
pub struct TileGrid {
    tile_size: f32,
    width: usize,
    height: usize,
    /// Row-major, row 0 at the top.
    gids: Vec<u32>,
    /// Derived from `gids` + `tileset` at construction.
    solid: Vec<bool>,
    tileset: TileSet,
}

// ── Construction ──

impl TileGrid {
    /// Build a grid from row-major gids (row 0 = top row).
    ///
    /// `gids` shorter than `width * height` is padded with empty tiles;
    /// extra entries are dropped.
    pub fn new(tile_size: f32, width: usize, height: usize, mut gids: Vec<u32>, tileset: TileSet) -> Self {
        gids.resize(width * height, EMPTY_GID);
        let solid = gids.iter().map(|&gid| tileset.is_collidable(gid)).collect();
        TileGrid { tile_size, width, height, gids, solid, tileset }
    }

    /// A grid with no tiles at all.
    pub fn empty(tile_size: f32, width: usize, height: usize) -> Self {
        TileGrid::new(tile_size, width, height, vec![], TileSet::new())
    }
}

// ── Queries ──

impl TileGrid {
    #[inline]
    pub fn tile_size(&self) -> f32 { self.tile_size }
    #[inline]
    pub fn width_tiles(&self) -> usize { self.width }
    #[inline]
    pub fn height_tiles(&self) -> usize { self.height }

    pub fn tileset(&self) -> &TileSet {
        &self.tileset
    }

    /// Map extent in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }

    #[inline]
    fn index(&self, gx: i32, gy: i32) -> Option<usize> {
        if gx < 0 || gy < 0 { return None; }
        let (x, y) = (gx as usize, gy as usize);
        if x >= self.width || y >= self.height { return None; }
        Some(y * self.width + x)
    }

    /// Is the cell at `(gx, gy)` solid? Out of range = not solid.
    #[inline]
    pub fn is_solid(&self, gx: i32, gy: i32) -> bool {
        match self.index(gx, gy) {
            Some(i) => self.solid[i],
            None => false,
        }
    }

    /// Gid at `(gx, gy)`, `None` outside the map.
    pub fn gid_at(&self, gx: i32, gy: i32) -> Option<u32> {
        self.index(gx, gy).map(|i| self.gids[i])
    }

    /// World point → grid cell. Not clamped: points outside the map yield
    /// cells outside `[0, extent)`.
    pub fn world_to_grid(&self, point: Vec2) -> IVec2 {
        let gx = (point.x / self.tile_size).floor();
        let gy = (self.height as f32 - point.y / self.tile_size).floor();
        IVec2::new(gx as i32, gy as i32)
    }

    /// Clamp a grid cell into the map on both axes.
    pub fn clamp_to_map(&self, cell: IVec2) -> IVec2 {
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        IVec2::new(cell.x.min(max_x).max(0), cell.y.min(max_y).max(0))
    }

    /// Cell containing a literal position, always inside the map.
    pub fn map_coord(&self, point: Vec2) -> IVec2 {
        self.clamp_to_map(self.world_to_grid(point))
    }

    /// World Y of the top edge of row `gy`.
    #[inline]
    pub fn tile_top(&self, gy: i32) -> f32 {
        (self.height as i32 - gy) as f32 * self.tile_size
    }

    /// World-space rectangle covered by cell `(gx, gy)`.
    pub fn tile_rect(&self, gx: i32, gy: i32) -> Rect {
        let ts = self.tile_size;
        Rect::new(gx as f32 * ts, self.tile_top(gy) - ts, ts, ts)
    }
}

// ══════════════════════════════════════════════════════════════
// Test fixtures
// ══════════════════════════════════════════════════════════════

/// Build a grid from ASCII rows (top row first): `#` is a collidable tile
/// (gid 1), `d` a decorative non-collidable tile (gid 2), anything else
/// empty.
#[cfg(test)]
pub(crate) fn grid_from(tile_size: f32, rows: &[&str]) -> TileGrid {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    let mut gids = vec![EMPTY_GID; width * height];
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            gids[y * width + x] = match ch {
                '#' => 1,
                'd' => 2,
                _ => EMPTY_GID,
            };
        }
    }
    let mut tileset = TileSet::new().with_collidable(1);
    tileset.set_property(2, "isCollidable", "false");
    TileGrid::new(tile_size, width, height, gids, tileset)
}
