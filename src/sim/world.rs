//! World: one shared tile grid plus the bodies moving through it.
//!
//! The grid is read-only for the world's whole life; bodies borrow it
//! immutably during their tick, so the world needs no locking and bodies
//! never observe each other.
//!
//! Body 0 is the player (the one `FrameInput` drives); any further bodies
//! only fall under gravity and keep whatever velocity they were given.

use glam::Vec2;

use crate::domain::body::KinematicBody;
use crate::domain::grid::TileGrid;

/// Index of a body in `WorldState::bodies`.
pub type BodyId = usize;

pub const PLAYER: BodyId = 0;

pub struct WorldState {
    pub grid: TileGrid,
    pub bodies: Vec<KinematicBody>,
    /// Sprite anchor position new players are placed at.
    pub spawn: Vec2,
    pub tick: u64,
}

impl WorldState {
    pub fn new(grid: TileGrid, spawn: Vec2) -> Self {
        WorldState { grid, bodies: vec![], spawn, tick: 0 }
    }

    /// Add a body; the first one spawned is the player.
    pub fn spawn(&mut self, body: KinematicBody) -> BodyId {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    pub fn player(&self) -> Option<&KinematicBody> {
        self.bodies.get(PLAYER)
    }

    pub fn player_mut(&mut self) -> Option<&mut KinematicBody> {
        self.bodies.get_mut(PLAYER)
    }

    pub fn body(&self, id: BodyId) -> Option<&KinematicBody> {
        self.bodies.get(id)
    }
}
