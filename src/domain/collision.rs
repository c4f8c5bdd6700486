//! Sweep-and-resolve against a tile grid.
//!
//! ## Pipeline (one body, one tick)
//!
//!   1. Hit box at the current center (`cur_bb`) and at the predicted
//!      center (`pre_bb`).
//!   2. Sweep region = union of both boxes.
//!   3. Region corners → grid cells (`to_tile_coord`). Because grid Y is
//!      inverted, the min corner yields the *bottom* row (`start.y`) and the
//!      max corner the *top* row (`finish.y`), so `start.y >= finish.y`.
//!   4. Visit rows from `start.y` down to `finish.y`, columns from
//!      `start.x` up to `finish.x`, and resolve every solid cell by the
//!      direction of travel.
//!
//! ## Direction table
//!
//!   Down  → snap the hit box bottom onto the tile top (landing).
//!   Up    → no response: ceilings are passed through.
//!   Left  → no response.
//!   Right → no response.
//!
//! Horizontal and ceiling responses are not implemented: their branches
//! exist and are visited but leave the predicted position untouched.
//!
//! ## Landing contact
//!
//! A solid cell only lands the body when it is actually crossed this tick:
//!   - it overlaps the predicted hit box on X (touching edges excluded), and
//!   - its top edge lies in `[pre_bottom, cur_bottom + CONTACT_EPSILON]`.
//!
//! With several candidates the highest top wins, so the result does not
//! depend on visiting order and fast falls cannot tunnel through a floor.

use glam::{IVec2, Vec2};

use super::grid::TileGrid;
use super::rect::Rect;

/// Slack for "already resting on this edge" after float round-off.
pub const CONTACT_EPSILON: f32 = 1.0e-3;

// ══════════════════════════════════════════════════════════════
// Direction of travel
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Horizontal {
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Vertical {
    Up,
    Down,
}

/// Sign of a displacement, per axis. `None` = no motion on that axis.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Direction {
    pub horizontal: Option<Horizontal>,
    pub vertical: Option<Vertical>,
}

impl Direction {
    pub fn of(diff: Vec2) -> Self {
        let horizontal = if diff.x > 0.0 {
            Some(Horizontal::Right)
        } else if diff.x < 0.0 {
            Some(Horizontal::Left)
        } else {
            None
        };
        let vertical = if diff.y > 0.0 {
            Some(Vertical::Up)
        } else if diff.y < 0.0 {
            Some(Vertical::Down)
        } else {
            None
        };
        Direction { horizontal, vertical }
    }

    pub fn is_still(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}

// ══════════════════════════════════════════════════════════════
// Sweep region
// ══════════════════════════════════════════════════════════════

/// World point → grid cell for sweep bounds. Unclamped: a sweep that leaves
/// the map keeps its true extent and the off-map cells read as empty.
#[inline]
pub fn to_tile_coord(grid: &TileGrid, point: Vec2) -> IVec2 {
    grid.world_to_grid(point)
}

pub fn sweep_region(cur_bb: &Rect, pre_bb: &Rect) -> Rect {
    cur_bb.union(pre_bb)
}

/// Inclusive cell range covered by a sweep region.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScanRange {
    /// Cell of the region's min corner (left column, bottom row).
    pub start: IVec2,
    /// Cell of the region's max corner (right column, top row).
    pub finish: IVec2,
}

impl ScanRange {
    pub fn of(grid: &TileGrid, region: &Rect) -> Self {
        ScanRange {
            start: to_tile_coord(grid, region.min()),
            finish: to_tile_coord(grid, region.max()),
        }
    }

    /// Cells in visiting order: rows descend from `start.y` to `finish.y`,
    /// columns ascend from `start.x` to `finish.x`.
    pub fn cells(&self) -> impl Iterator<Item = IVec2> {
        let (start, finish) = (self.start, self.finish);
        (finish.y..=start.y)
            .rev()
            .flat_map(move |gy| (start.x..=finish.x).map(move |gx| IVec2::new(gx, gy)))
    }

    pub fn cell_count(&self) -> usize {
        let cols = (self.finish.x - self.start.x + 1).max(0) as usize;
        let rows = (self.start.y - self.finish.y + 1).max(0) as usize;
        cols * rows
    }
}

// ══════════════════════════════════════════════════════════════
// Resolution
// ══════════════════════════════════════════════════════════════

/// Outcome of resolving one predicted move.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Resolution {
    /// Resolved hit box center.
    pub position: Vec2,
    /// Row the body landed on, if a downward contact was resolved.
    pub landed_row: Option<i32>,
}

/// Resolve a move of a hit box of `size` from center `cur_pos` to center
/// `pre_pos` against the grid's solid cells.
///
/// Axes are resolved independently: X is returned as predicted, Y is
/// snapped only on a downward landing.
pub fn resolve(grid: &TileGrid, cur_pos: Vec2, pre_pos: Vec2, size: Vec2) -> Resolution {
    let mut ret = pre_pos;
    let diff = pre_pos - cur_pos;
    let dir = Direction::of(diff);
    if dir.is_still() {
        return Resolution { position: ret, landed_row: None };
    }

    let cur_bb = Rect::from_center(cur_pos, size);
    let pre_bb = Rect::from_center(pre_pos, size);
    let range = ScanRange::of(grid, &sweep_region(&cur_bb, &pre_bb));

    // (row, tile top) of the best landing candidate so far
    let mut landing: Option<(i32, f32)> = None;

    for cell in range.cells() {
        if !grid.is_solid(cell.x, cell.y) { continue; }

        match dir.horizontal {
            Some(Horizontal::Right) => {
                // Wall contact moving right: no response.
            }
            Some(Horizontal::Left) => {
                // Wall contact moving left: no response.
            }
            None => {}
        }

        match dir.vertical {
            Some(Vertical::Up) => {
                // Ceiling: no response.
            }
            Some(Vertical::Down) => {
                if let Some(top) = landing_top(grid, cell, &cur_bb, &pre_bb) {
                    if landing.map_or(true, |(_, best)| top > best) {
                        landing = Some((cell.y, top));
                    }
                }
            }
            None => {}
        }
    }

    if let Some((_, top)) = landing {
        ret.y = top + size.y * 0.5;
    }

    Resolution { position: ret, landed_row: landing.map(|(row, _)| row) }
}

/// Top edge of `cell` if the falling box crosses it this tick.
fn landing_top(grid: &TileGrid, cell: IVec2, cur_bb: &Rect, pre_bb: &Rect) -> Option<f32> {
    let tile = grid.tile_rect(cell.x, cell.y);
    if !tile.overlaps_x(pre_bb) { return None; }

    let top = grid.tile_top(cell.y);
    if top > cur_bb.min_y() + CONTACT_EPSILON { return None; }
    if top < pre_bb.min_y() { return None; }
    Some(top)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::grid_from;

    const BOX: Vec2 = Vec2::new(16.0, 16.0);

    /// 10x10, tile size 16, row 5 solid (world Y band 64..80).
    fn floor_grid() -> TileGrid {
        let mut rows = vec![".........."; 10];
        rows[5] = "##########";
        grid_from(16.0, &rows)
    }

    // ── direction ──

    #[test]
    fn direction_signs() {
        let d = Direction::of(Vec2::new(2.0, -1.0));
        assert_eq!(d.horizontal, Some(Horizontal::Right));
        assert_eq!(d.vertical, Some(Vertical::Down));
        assert!(Direction::of(Vec2::ZERO).is_still());
        assert_eq!(Direction::of(Vec2::new(-0.5, 0.0)).vertical, None);
    }

    // ── scan range ──

    #[test]
    fn scan_range_rows_are_inverted() {
        let g = floor_grid();
        let cur = Rect::from_center(Vec2::new(40.0, 100.0), BOX);
        let pre = Rect::from_center(Vec2::new(40.0, 85.0), BOX);
        let range = ScanRange::of(&g, &sweep_region(&cur, &pre));
        // min corner (32, 77) → (2, 5); max corner (48, 108) → (3, 3)
        assert_eq!(range.start, IVec2::new(2, 5));
        assert_eq!(range.finish, IVec2::new(3, 3));
        assert!(range.start.y >= range.finish.y);
        assert_eq!(range.cell_count(), 6);
    }

    #[test]
    fn cells_descend_rows_and_ascend_columns() {
        let range = ScanRange { start: IVec2::new(1, 4), finish: IVec2::new(2, 3) };
        let cells: Vec<IVec2> = range.cells().collect();
        assert_eq!(
            cells,
            vec![
                IVec2::new(1, 4),
                IVec2::new(2, 4),
                IVec2::new(1, 3),
                IVec2::new(2, 3),
            ]
        );
    }

    // ── resolve ──

    #[test]
    fn no_motion_returns_prediction() {
        let g = floor_grid();
        let p = Vec2::new(40.0, 88.0);
        let r = resolve(&g, p, p, BOX);
        assert_eq!(r.position, p);
        assert_eq!(r.landed_row, None);
    }

    #[test]
    fn falling_through_floor_top_snaps() {
        let g = floor_grid();
        let r = resolve(&g, Vec2::new(40.0, 100.0), Vec2::new(40.0, 85.0), BOX);
        assert_eq!(r.position, Vec2::new(40.0, 88.0));
        assert_eq!(r.landed_row, Some(5));
    }

    #[test]
    fn resting_on_floor_stays_put() {
        let g = floor_grid();
        let r = resolve(&g, Vec2::new(40.0, 88.0), Vec2::new(40.0, 87.9), BOX);
        assert_eq!(r.position, Vec2::new(40.0, 88.0));
        assert_eq!(r.landed_row, Some(5));
    }

    #[test]
    fn fall_above_floor_is_unresolved() {
        let g = floor_grid();
        let r = resolve(&g, Vec2::new(40.0, 120.0), Vec2::new(40.0, 115.0), BOX);
        assert_eq!(r.position, Vec2::new(40.0, 115.0));
        assert_eq!(r.landed_row, None);
    }

    #[test]
    fn fast_fall_lands_on_highest_crossed_top() {
        // Floors on rows 3 and 6: tops at 112 and 64.
        let mut rows = vec![".........."; 10];
        rows[3] = "##########";
        rows[6] = "##########";
        let g = grid_from(16.0, &rows);
        let r = resolve(&g, Vec2::new(40.0, 130.0), Vec2::new(40.0, 40.0), BOX);
        assert_eq!(r.landed_row, Some(3));
        assert_eq!(r.position.y, 120.0);
    }

    #[test]
    fn tile_only_touching_side_is_ignored() {
        // Single solid cell at column 3; box spans x 32..48, touching it.
        let mut rows = vec![".........."; 10];
        rows[5] = "...#......";
        let g = grid_from(16.0, &rows);
        let r = resolve(&g, Vec2::new(40.0, 100.0), Vec2::new(40.0, 85.0), BOX);
        assert_eq!(r.landed_row, None);
        assert_eq!(r.position, Vec2::new(40.0, 85.0));
    }

    #[test]
    fn tile_already_above_feet_is_ignored() {
        // Box bottom at 70 is inside row 5 (64..80); its top does not count.
        let g = floor_grid();
        let r = resolve(&g, Vec2::new(40.0, 78.0), Vec2::new(40.0, 74.0), BOX);
        assert_eq!(r.landed_row, None);
    }

    #[test]
    fn decorative_tiles_do_not_block() {
        let mut rows = vec![".........."; 10];
        rows[5] = "dddddddddd";
        let g = grid_from(16.0, &rows);
        let r = resolve(&g, Vec2::new(40.0, 100.0), Vec2::new(40.0, 85.0), BOX);
        assert_eq!(r.landed_row, None);
    }

    #[test]
    fn rising_through_ceiling_is_unresolved() {
        let g = floor_grid();
        let r = resolve(&g, Vec2::new(40.0, 60.0), Vec2::new(40.0, 65.0), BOX);
        assert_eq!(r.position, Vec2::new(40.0, 65.0));
        assert_eq!(r.landed_row, None);
    }

    #[test]
    fn horizontal_moves_into_walls_are_unresolved() {
        let mut rows = vec![".........."; 10];
        rows[4] = "....#.....";
        let g = grid_from(16.0, &rows);
        // Row 4 spans Y 80..96; box centered at Y 88 walks into column 4.
        let right = resolve(&g, Vec2::new(56.0, 88.0), Vec2::new(60.0, 88.0), BOX);
        assert_eq!(right.position, Vec2::new(60.0, 88.0));
        let left = resolve(&g, Vec2::new(88.0, 88.0), Vec2::new(84.0, 88.0), BOX);
        assert_eq!(left.position, Vec2::new(84.0, 88.0));
        assert_eq!(left.landed_row, None);
    }

    #[test]
    fn sweep_leaving_the_map_is_safe() {
        let g = floor_grid();
        let r = resolve(&g, Vec2::new(-30.0, 200.0), Vec2::new(-35.0, 190.0), BOX);
        assert_eq!(r.position, Vec2::new(-35.0, 190.0));
        assert_eq!(r.landed_row, None);
    }
}
