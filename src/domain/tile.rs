//! Tile set: per-gid property tables, as attached to a tile map's tile types.
//!
//! Tile semantics are queried through methods here, never cached as flags on
//! callers, so "what makes a tile solid" lives in one place.
//!
//! Properties are string-typed. A tile is collidable iff its `isCollidable`
//! property is exactly `"true"`; gid 0, a gid with no table, a table without
//! the key, or any other value all mean "not collidable".

use std::collections::HashMap;

/// Gid reserved for "no tile".
pub const EMPTY_GID: u32 = 0;

/// Property key consulted by [`TileSet::is_collidable`].
pub const COLLIDABLE_KEY: &str = "isCollidable";

pub type Properties = HashMap<String, String>;

#[derive(Clone, Debug, Default)]
pub struct TileSet {
    properties: HashMap<u32, Properties>,
}

impl TileSet {
    pub fn new() -> Self {
        TileSet { properties: HashMap::new() }
    }

    /// Attach (or replace) the property table of `gid`.
    pub fn insert(&mut self, gid: u32, props: Properties) {
        self.properties.insert(gid, props);
    }

    /// Set a single property on `gid`, creating its table if needed.
    pub fn set_property(&mut self, gid: u32, key: &str, value: &str) {
        self.properties
            .entry(gid)
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Shorthand used by level fixtures: mark `gid` collidable.
    pub fn with_collidable(mut self, gid: u32) -> Self {
        self.set_property(gid, COLLIDABLE_KEY, "true");
        self
    }

    pub fn properties_for(&self, gid: u32) -> Option<&Properties> {
        self.properties.get(&gid)
    }

    pub fn property(&self, gid: u32, key: &str) -> Option<&str> {
        self.properties_for(gid)?.get(key).map(String::as_str)
    }

    /// Does this gid block movement?
    pub fn is_collidable(&self, gid: u32) -> bool {
        if gid == EMPTY_GID { return false; }
        self.property(gid, COLLIDABLE_KEY) == Some("true")
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
