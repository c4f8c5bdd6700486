//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct LabConfig {
    pub physics: PhysicsConfig,
    pub run: RunConfig,
}

/// Tuning values handed to `TileGrid` / `KinematicBody` at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub tile_size: f32,   // world units per tile edge
    pub gravity: f32,     // downward force per second, applied as gravity * dt
    pub max_speed: f32,   // per-axis velocity clamp
    pub mass: f32,
    pub walk_speed: f32,  // |velocity.x| while a move intent is held
    pub jump_force: f32,  // upward force applied once by a grounded jump
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub ticks: u32,
    pub dt: f32,
    /// Level file; `None` = built-in level.
    pub level: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    run: TomlRun,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_tile_size")]
    tile_size: f32,
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_max_speed")]
    max_speed: f32,
    #[serde(default = "default_mass")]
    mass: f32,
    #[serde(default = "default_walk_speed")]
    walk_speed: f32,
    #[serde(default = "default_jump_force")]
    jump_force: f32,
}

#[derive(Deserialize, Debug)]
struct TomlRun {
    #[serde(default = "default_ticks")]
    ticks: u32,
    #[serde(default = "default_dt")]
    dt: f32,
    #[serde(default)]
    level: Option<String>,
}

// ── Defaults ──

fn default_tile_size() -> f32 { 16.0 }
fn default_gravity() -> f32 { 20.0 }
fn default_max_speed() -> f32 { 5.0 }
fn default_mass() -> f32 { 10.0 }
fn default_walk_speed() -> f32 { 1.0 }
fn default_jump_force() -> f32 { 20.0 }   // +2 units/tick at mass 10
fn default_ticks() -> u32 { 360 }         // 6s at 60 Hz
fn default_dt() -> f32 { 1.0 / 60.0 }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            tile_size: default_tile_size(),
            gravity: default_gravity(),
            max_speed: default_max_speed(),
            mass: default_mass(),
            walk_speed: default_walk_speed(),
            jump_force: default_jump_force(),
        }
    }
}

impl Default for TomlRun {
    fn default() -> Self {
        TomlRun { ticks: default_ticks(), dt: default_dt(), level: None }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        TomlPhysics::default().into()
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

impl From<TomlPhysics> for PhysicsConfig {
    fn from(t: TomlPhysics) -> Self {
        PhysicsConfig {
            tile_size: t.tile_size,
            gravity: t.gravity,
            max_speed: t.max_speed,
            mass: t.mass,
            walk_speed: t.walk_speed,
            jump_force: t.jump_force,
        }
    }
}

impl From<TomlConfig> for LabConfig {
    fn from(t: TomlConfig) -> Self {
        LabConfig {
            physics: t.physics.into(),
            run: RunConfig {
                ticks: t.run.ticks,
                dt: t.run.dt,
                level: t.run.level.map(PathBuf::from),
            },
        }
    }
}

// ── Loading ──

impl LabConfig {
    /// Parse a config document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(text)?;
        Ok(parsed.into())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    /// A relative `run.level` is resolved against the directory the config
    /// was found in.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() { continue; }
            match Self::from_file(&path) {
                Ok(mut cfg) => {
                    info!(path = %path.display(), "loaded config");
                    if let Some(level) = cfg.run.level.take() {
                        cfg.run.level = Some(if level.is_absolute() { level } else { dir.join(level) });
                    }
                    return cfg;
                }
                Err(e) => {
                    warn!("{e}");
                    warn!("using default settings");
                    return Self::default();
                }
            }
        }
        Self::default()
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
