//! Level loader.
//!
//! ## Sources (priority order):
//!   1. `run.level` from `config.toml` (a level file)
//!   2. Built-in embedded level
//!
//! ## Level format (TOML):
//!   ```toml
//!   name = "Lab"
//!   tile_size = 16.0          # optional, defaults to physics.tile_size
//!   spawn = [60.0, 75.0]      # optional sprite anchor position
//!   map = """
//!   ..........
//!   ..P.......
//!   ##########
//!   """
//!
//!   [[tiles]]
//!   glyph = "#"
//!   gid = 1
//!   [tiles.properties]
//!   isCollidable = "true"
//!   ```
//!
//! Map rows are listed top row first and must all have the same width.
//! Each `[[tiles]]` entry binds one glyph to one gid and carries that gid's
//! property table (the tile-type metadata a tile map editor would attach).
//! Property values are strings; other TOML scalars are stored in their
//! textual form.
//!
//! ## Reserved glyphs:
//!   '.' / ' ' = Empty (gid 0)
//!   'P'       = Player spawn (empty cell; spawn at the cell center unless
//!               `spawn` is given)

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::config::LabConfig;
use crate::domain::grid::TileGrid;
use crate::domain::tile::{Properties, TileSet, EMPTY_GID};

const SPAWN_GLYPH: char = 'P';

/// Runtime level data, ready to simulate.
#[derive(Debug)]
pub struct LevelDef {
    pub name: String,
    pub grid: TileGrid,
    pub spawn: Vec2,
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("level parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("level map is empty")]
    EmptyMap,
    #[error("map row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("tile glyph {0:?} must be a single non-reserved character")]
    InvalidGlyph(String),
    #[error("glyph {0:?} is defined twice")]
    DuplicateGlyph(char),
    #[error("gid {0} is defined twice")]
    DuplicateGid(u32),
    #[error("glyph {0:?} uses gid 0, which is reserved for empty tiles")]
    EmptyGid(char),
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),
}

// ── TOML Schema ──

#[derive(Deserialize, Debug)]
struct TomlLevel {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    tile_size: Option<f32>,
    #[serde(default)]
    spawn: Option<[f32; 2]>,
    map: String,
    #[serde(default)]
    tiles: Vec<TomlTile>,
}

#[derive(Deserialize, Debug)]
struct TomlTile {
    glyph: String,
    gid: u32,
    #[serde(default)]
    properties: HashMap<String, toml::Value>,
}

fn default_name() -> String { "Untitled".into() }

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load the configured level, or the embedded one when none is set.
pub fn load_level(config: &LabConfig) -> Result<LevelDef, LevelError> {
    let tile_size = config.physics.tile_size;
    match &config.run.level {
        Some(path) => load_level_file(path, tile_size),
        None => parse_level(EMBEDDED_LEVEL, tile_size),
    }
}

pub fn load_level_file(path: &Path, default_tile_size: f32) -> Result<LevelDef, LevelError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| LevelError::Io { path: path.to_path_buf(), source })?;
    parse_level(&text, default_tile_size)
}

/// Parse a level document into a grid + spawn point.
pub fn parse_level(text: &str, default_tile_size: f32) -> Result<LevelDef, LevelError> {
    let doc: TomlLevel = toml::from_str(text)?;

    let tile_size = doc.tile_size.unwrap_or(default_tile_size);
    if tile_size.is_nan() || tile_size <= 0.0 {
        return Err(LevelError::InvalidTileSize(tile_size));
    }

    let (legend, tileset) = build_tileset(&doc.tiles)?;
    let rows = map_rows(&doc.map);
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.chars().count());
    if height == 0 || width == 0 {
        return Err(LevelError::EmptyMap);
    }

    let mut gids = Vec::with_capacity(width * height);
    let mut spawn_cell: Option<(usize, usize)> = None;

    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(LevelError::RaggedRow { row: y, expected: width, found });
        }
        for (x, ch) in row.chars().enumerate() {
            let gid = match ch {
                '.' | ' ' => EMPTY_GID,
                SPAWN_GLYPH => {
                    spawn_cell.get_or_insert((x, y));
                    EMPTY_GID
                }
                _ => *legend
                    .get(&ch)
                    .ok_or(LevelError::UnknownGlyph { glyph: ch, row: y, col: x })?,
            };
            gids.push(gid);
        }
    }

    let grid = TileGrid::new(tile_size, width, height, gids, tileset);

    let spawn = match (doc.spawn, spawn_cell) {
        (Some([x, y]), _) => Vec2::new(x, y),
        (None, Some((x, y))) => grid.tile_rect(x as i32, y as i32).center(),
        (None, None) => {
            let size = grid.world_size();
            Vec2::new(size.x * 0.5, size.y - tile_size * 0.5)
        }
    };

    Ok(LevelDef { name: doc.name, grid, spawn })
}

// ══════════════════════════════════════════════════════════════
// Internal
// ══════════════════════════════════════════════════════════════

/// Map text → rows, dropping blank lines around the block.
fn map_rows(map: &str) -> Vec<&str> {
    let lines: Vec<&str> = map.lines().collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(a), Some(b)) => lines[a..=b].to_vec(),
        _ => vec![],
    }
}

fn build_tileset(tiles: &[TomlTile]) -> Result<(HashMap<char, u32>, TileSet), LevelError> {
    let mut legend = HashMap::new();
    let mut seen_gids = HashSet::new();
    let mut tileset = TileSet::new();

    for tile in tiles {
        let mut chars = tile.glyph.chars();
        let glyph = match (chars.next(), chars.next()) {
            (Some(c), None) if !matches!(c, '.' | ' ' | SPAWN_GLYPH) => c,
            _ => return Err(LevelError::InvalidGlyph(tile.glyph.clone())),
        };
        if tile.gid == EMPTY_GID {
            return Err(LevelError::EmptyGid(glyph));
        }
        if legend.insert(glyph, tile.gid).is_some() {
            return Err(LevelError::DuplicateGlyph(glyph));
        }
        if !seen_gids.insert(tile.gid) {
            return Err(LevelError::DuplicateGid(tile.gid));
        }

        let props: Properties = tile.properties.iter()
            .map(|(k, v)| {
                let text = match v {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect();
        tileset.insert(tile.gid, props);
    }

    Ok((legend, tileset))
}

// ══════════════════════════════════════════════════════════════
// Embedded level
// ══════════════════════════════════════════════════════════════

/// 20x12 lab: a ledge, a pit with a floor, a floating platform and a
/// decorative (non-collidable) strip.
pub const EMBEDDED_LEVEL: &str = r##"
name = "Lab"

map = """
....................
....................
....................
..........===.......
....................
....................
.P..................
....................
#####.....##########
#####~~~~~##########
####################
####################
"""

[[tiles]]
glyph = "#"
gid = 1
[tiles.properties]
isCollidable = "true"

[[tiles]]
glyph = "="
gid = 2
[tiles.properties]
isCollidable = "true"
kind = "platform"

[[tiles]]
glyph = "~"
gid = 3
[tiles.properties]
isCollidable = "false"
kind = "water"
"##;

#[cfg(test)]
mod tests {
    use super::*;

    const SOLID_TILE: &str = "[[tiles]]\nglyph = \"#\"\ngid = 1\n[tiles.properties]\nisCollidable = \"true\"\n";

    fn level(map: &str, extra: &str) -> String {
        format!("map = \"\"\"\n{map}\"\"\"\n{extra}\n{SOLID_TILE}")
    }

    #[test]
    fn embedded_level_parses() {
        let def = parse_level(EMBEDDED_LEVEL, 16.0).unwrap();
        assert_eq!(def.name, "Lab");
        assert_eq!(def.grid.width_tiles(), 20);
        assert_eq!(def.grid.height_tiles(), 12);
        // 'P' at column 1, row 6 → cell center.
        assert_eq!(def.spawn, Vec2::new(24.0, 88.0));
        // Ground, platform, water strip.
        assert!(def.grid.is_solid(0, 8));
        assert!(def.grid.is_solid(11, 3));
        assert!(!def.grid.is_solid(6, 9));
        assert_eq!(def.grid.gid_at(6, 9), Some(3));
        assert!(!def.grid.is_solid(7, 8));
        assert_eq!(def.grid.tileset().property(2, "kind"), Some("platform"));
    }

    #[test]
    fn explicit_spawn_and_tile_size() {
        let text = level("....\n####\n", "tile_size = 8.0\nspawn = [60.0, 75.0]\nname = \"t\"");
        let def = parse_level(&text, 16.0).unwrap();
        assert_eq!(def.spawn, Vec2::new(60.0, 75.0));
        assert_eq!(def.grid.tile_size(), 8.0);
        assert_eq!(def.name, "t");
    }

    #[test]
    fn missing_spawn_defaults_to_top_center() {
        let def = parse_level(&level("....\n####\n", ""), 16.0).unwrap();
        assert_eq!(def.spawn, Vec2::new(32.0, 24.0));
        assert_eq!(def.name, "Untitled");
    }

    #[test]
    fn non_string_properties_use_their_text() {
        let text = "map = \"#\"\n[[tiles]]\nglyph = \"#\"\ngid = 4\n[tiles.properties]\nisCollidable = true\n";
        let def = parse_level(text, 16.0).unwrap();
        assert!(def.grid.is_solid(0, 0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse_level(&level("....\n###\n", ""), 16.0).unwrap_err();
        assert!(matches!(err, LevelError::RaggedRow { row: 1, expected: 4, found: 3 }));
    }

    #[test]
    fn unknown_glyph_is_rejected() {
        let err = parse_level(&level("..x.\n####\n", ""), 16.0).unwrap_err();
        assert!(matches!(err, LevelError::UnknownGlyph { glyph: 'x', row: 0, col: 2 }));
    }

    #[test]
    fn empty_map_is_rejected() {
        let err = parse_level(&level("\n\n", ""), 16.0).unwrap_err();
        assert!(matches!(err, LevelError::EmptyMap));
    }

    #[test]
    fn bad_tile_tables_are_rejected() {
        let dup = format!("{}{SOLID_TILE}", level("#\n", ""));
        assert!(matches!(parse_level(&dup, 16.0), Err(LevelError::DuplicateGlyph('#'))));

        let reserved = "map = \".\"\n[[tiles]]\nglyph = \"P\"\ngid = 1\n";
        assert!(matches!(parse_level(reserved, 16.0), Err(LevelError::InvalidGlyph(_))));

        let zero = "map = \".\"\n[[tiles]]\nglyph = \"x\"\ngid = 0\n";
        assert!(matches!(parse_level(zero, 16.0), Err(LevelError::EmptyGid('x'))));

        let same_gid = "map = \".\"\n[[tiles]]\nglyph = \"x\"\ngid = 5\n[[tiles]]\nglyph = \"y\"\ngid = 5\n";
        assert!(matches!(parse_level(same_gid, 16.0), Err(LevelError::DuplicateGid(5))));
    }

    #[test]
    fn non_positive_tile_size_is_rejected() {
        let err = parse_level(&level("#\n", ""), 0.0).unwrap_err();
        assert!(matches!(err, LevelError::InvalidTileSize(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_level_file(Path::new("/nonexistent/platformer-lab/level.toml"), 16.0).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }

    #[test]
    fn bundled_cave_level_parses() {
        let def = parse_level(include_str!("../../levels/cave.toml"), 8.0).unwrap();
        assert_eq!(def.name, "Cave");
        assert_eq!(def.grid.tile_size(), 16.0);
        assert_eq!((def.grid.width_tiles(), def.grid.height_tiles()), (18, 9));
        assert_eq!(def.spawn, Vec2::new(56.0, 104.0));
        assert!(def.grid.is_solid(10, 4));
        assert_eq!(def.grid.tileset().property(1, "kind"), Some("rock"));
    }

    #[test]
    fn load_level_falls_back_to_embedded() {
        let def = load_level(&LabConfig::default()).unwrap();
        assert_eq!(def.name, "Lab");
    }
}
