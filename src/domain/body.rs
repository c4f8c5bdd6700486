//! Kinematic body: a hit box driven by forces and intents, resolved against
//! a `TileGrid` once per tick.
//!
//! ## Position model
//!
//! The canonical physics position is the hit box **center**. The visual
//! sprite is described by a `SpriteFrame` (size + normalized anchor); the
//! hit box sits at `collider_origin` from the sprite's bottom-left corner.
//! The sprite anchor position is always derived from the center, so every
//! move goes through `set_collider_position` and the offset cannot drift.
//!
//! ## State machine
//!
//!   Airborne ──(downward contact resolved)──▶ Grounded
//!   Grounded ──(tick without downward contact)──▶ Airborne
//!
//! Initial state is Airborne. A body resting on a floor under gravity keeps
//! landing every tick and therefore stays Grounded.
//!
//! ## Movement split
//!
//! Vertical motion is force-driven (gravity, jump). Horizontal motion is
//! intent-driven: `move_left` / `move_right` / `stop` write `velocity.x`
//! directly and bypass acceleration.

use glam::Vec2;
use tracing::debug;

use crate::config::PhysicsConfig;

use super::collision;
use super::grid::TileGrid;
use super::rect::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BodyState {
    Grounded,
    Airborne,
}

/// Visual frame of the actor, as reported by the scene.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SpriteFrame {
    /// Bounding-box size in world units.
    pub size: Vec2,
    /// Normalized anchor: `(0, 0)` bottom-left, `(1, 1)` top-right.
    pub anchor: Vec2,
}

impl SpriteFrame {
    /// Frame of `size` anchored at its center.
    pub fn new(size: Vec2) -> Self {
        SpriteFrame { size, anchor: Vec2::splat(0.5) }
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    /// Offset from the bounding-box origin to the anchor point.
    #[inline]
    fn anchor_offset(&self) -> Vec2 {
        self.anchor * self.size
    }
}

#[derive(Clone, Debug)]
pub struct KinematicBody {
    /// Hit box center.
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    mass: f32,
    state: BodyState,

    sprite: SpriteFrame,
    collider_origin: Vec2,
    collider_size: Vec2,

    // ── Tuning (copied from PhysicsConfig) ──
    gravity: f32,
    max_speed: f32,
    walk_speed: f32,
    jump_force: f32,
}

// ── Construction ──

impl KinematicBody {
    /// A body at the world origin whose hit box is one tile square and
    /// starts at the sprite's bottom-left corner. The sprite defaults to the
    /// hit box size.
    pub fn new(config: &PhysicsConfig) -> Self {
        let size = Vec2::splat(config.tile_size);
        KinematicBody {
            position: size * 0.5,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: config.mass,
            state: BodyState::Airborne,
            sprite: SpriteFrame::new(size),
            collider_origin: Vec2::ZERO,
            collider_size: size,
            gravity: config.gravity,
            max_speed: config.max_speed,
            walk_speed: config.walk_speed,
            jump_force: config.jump_force,
        }
    }

    /// Replace the sprite frame, keeping the sprite anchor where it is.
    pub fn with_sprite(mut self, sprite: SpriteFrame) -> Self {
        let anchor_pos = self.sprite_position();
        self.sprite = sprite;
        self.set_sprite_position(anchor_pos);
        self
    }

    /// Set the hit box relative to the sprite's bottom-left corner.
    pub fn with_collider(mut self, collider: Rect) -> Self {
        self.set_collider(collider);
        self
    }

    /// Place the sprite anchor at `position`.
    pub fn placed_at(mut self, position: Vec2) -> Self {
        self.set_sprite_position(position);
        self
    }
}

// ── Position accessors ──

impl KinematicBody {
    /// Hit box center in world space.
    #[inline]
    pub fn collider_position(&self) -> Vec2 {
        self.position
    }

    /// Move the hit box center. The sprite follows.
    #[inline]
    pub fn set_collider_position(&mut self, center: Vec2) {
        self.position = center;
    }

    /// Hit box in world space.
    pub fn collider(&self) -> Rect {
        Rect::from_center(self.position, self.collider_size)
    }

    /// Hit box relative to the sprite's bottom-left corner.
    pub fn local_collider(&self) -> Rect {
        Rect { origin: self.collider_origin, size: self.collider_size }
    }

    /// Change the hit box. The sprite stays put; the center moves with it.
    pub fn set_collider(&mut self, collider: Rect) {
        let anchor_pos = self.sprite_position();
        self.collider_origin = collider.origin;
        self.collider_size = collider.size;
        self.set_sprite_position(anchor_pos);
    }

    pub fn collider_origin(&self) -> Vec2 { self.collider_origin }
    pub fn collider_size(&self) -> Vec2 { self.collider_size }
    pub fn sprite(&self) -> SpriteFrame { self.sprite }

    /// World position of the sprite anchor.
    pub fn sprite_position(&self) -> Vec2 {
        self.sprite_origin() + self.sprite.anchor_offset()
    }

    /// Move the sprite anchor; routed through the collider position.
    pub fn set_sprite_position(&mut self, position: Vec2) {
        let origin = position - self.sprite.anchor_offset();
        self.set_collider_position(origin + self.collider_origin + self.collider_size * 0.5);
    }

    /// Sprite bounding box in world space.
    pub fn sprite_bounds(&self) -> Rect {
        Rect { origin: self.sprite_origin(), size: self.sprite.size }
    }

    fn sprite_origin(&self) -> Vec2 {
        self.position - self.collider_size * 0.5 - self.collider_origin
    }
}

// ── Kinematic state ──

impl KinematicBody {
    pub fn velocity(&self) -> Vec2 { self.velocity }
    pub fn set_velocity(&mut self, velocity: Vec2) { self.velocity = velocity; }
    pub fn acceleration(&self) -> Vec2 { self.acceleration }
    pub fn mass(&self) -> f32 { self.mass }
    pub fn set_mass(&mut self, mass: f32) { self.mass = mass; }
    pub fn max_speed(&self) -> f32 { self.max_speed }
    pub fn state(&self) -> BodyState { self.state }

    pub fn is_grounded(&self) -> bool {
        self.state == BodyState::Grounded
    }

    pub fn is_airborne(&self) -> bool {
        self.state == BodyState::Airborne
    }
}

// ── Forces and intents ──

impl KinematicBody {
    /// Accumulate `force / mass` into this tick's acceleration.
    /// Dropped when mass is not positive.
    pub fn apply_force(&mut self, force: Vec2) {
        if self.mass > 0.0 {
            self.acceleration += force / self.mass;
        }
    }

    pub fn move_left(&mut self) {
        self.velocity.x = -self.walk_speed;
    }

    pub fn move_right(&mut self) {
        self.velocity.x = self.walk_speed;
    }

    pub fn stop(&mut self) {
        self.velocity.x = 0.0;
    }

    /// Push off the ground. Ignored while airborne.
    pub fn jump(&mut self) -> bool {
        if !self.is_grounded() { return false; }
        self.apply_force(Vec2::new(0.0, self.jump_force));
        true
    }
}

// ── Tick ──

impl KinematicBody {
    /// Advance one frame: apply gravity for `dt`, then `step`.
    pub fn tick(&mut self, dt: f32, grid: &TileGrid) {
        self.apply_force(Vec2::new(0.0, -self.gravity * dt));
        self.step(grid);
    }

    /// Integrate, clamp, predict, resolve against `grid`, commit.
    pub fn step(&mut self, grid: &TileGrid) {
        self.velocity += self.acceleration;
        self.acceleration = Vec2::ZERO;

        self.velocity.x = clamp_axis(self.velocity.x, self.max_speed);
        self.velocity.y = clamp_axis(self.velocity.y, self.max_speed);

        let cur_pos = self.collider_position();
        let pre_pos = cur_pos + self.velocity;

        let mut landed_row = None;
        let diff = pre_pos - cur_pos;
        let resolved = if diff == Vec2::ZERO {
            pre_pos
        } else {
            let res = collision::resolve(grid, cur_pos, pre_pos, self.collider_size);
            landed_row = res.landed_row;
            res.position
        };

        self.set_collider_position(resolved);

        match landed_row {
            Some(row) => {
                self.velocity.y = 0.0;
                if self.state == BodyState::Airborne {
                    debug!(row, y = resolved.y, "body landed");
                }
                self.state = BodyState::Grounded;
            }
            None => {
                if self.state == BodyState::Grounded {
                    debug!(x = resolved.x, y = resolved.y, "body left ground");
                }
                self.state = BodyState::Airborne;
            }
        }
    }
}

#[inline]
fn clamp_axis(v: f32, max: f32) -> f32 {
    v.max(-max).min(max)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
