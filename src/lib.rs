//! Platformer Lab: movement and collision core for a 2D tile platformer.
//!
//! `domain` holds the core (tile grid, kinematic body, sweep-and-resolve);
//! `sim` is a headless world that steps bodies against a level;
//! `config` loads tuning values from `config.toml`.

pub mod config;
pub mod domain;
pub mod sim;
