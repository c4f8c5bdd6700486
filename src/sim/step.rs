//! The step function: advances the world by one frame.
//!
//! Processing order:
//!   1. Player intent (horizontal velocity, jump force)
//!   2. Body ticks against the shared grid (gravity → integrate → resolve)
//!   3. Grounded/airborne transition events
//!
//! Bodies tick in index order. They never interact, so the order only
//! affects the order of emitted events.

use crate::domain::body::{BodyState, KinematicBody};
use crate::domain::intent::{FrameInput, MoveDir};
use super::event::SimEvent;
use super::world::{BodyId, WorldState, PLAYER};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput, dt: f32) -> Vec<SimEvent> {
    let mut events: Vec<SimEvent> = Vec::new();
    world.tick += 1;

    let jumped = match world.player_mut() {
        Some(player) => apply_input(player, input),
        None => false,
    };
    if jumped {
        events.push(SimEvent::Jumped { body: PLAYER });
    }

    resolve_bodies(world, dt, jumped, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Intent
// ══════════════════════════════════════════════════════════════

/// Returns whether a jump was accepted.
fn apply_input(player: &mut KinematicBody, input: FrameInput) -> bool {
    match input.movement {
        Some(MoveDir::Left) => player.move_left(),
        Some(MoveDir::Right) => player.move_right(),
        None => player.stop(),
    }
    input.jump && player.jump()
}

// ══════════════════════════════════════════════════════════════
// Physics
// ══════════════════════════════════════════════════════════════

fn resolve_bodies(world: &mut WorldState, dt: f32, player_jumped: bool, events: &mut Vec<SimEvent>) {
    let grid = &world.grid;
    for (id, body) in world.bodies.iter_mut().enumerate() {
        let before = body.state();
        body.tick(dt, grid);
        if let Some(event) = transition(id, before, body, player_jumped && id == PLAYER) {
            events.push(event);
        }
    }
}

fn transition(id: BodyId, before: BodyState, body: &KinematicBody, jumped: bool) -> Option<SimEvent> {
    match (before, body.state()) {
        (BodyState::Airborne, BodyState::Grounded) => {
            Some(SimEvent::Landed { body: id, y: body.collider().min_y() })
        }
        (BodyState::Grounded, BodyState::Airborne) if !jumped => {
            Some(SimEvent::LeftGround { body: id })
        }
        _ => None,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::domain::grid::grid_from;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// Floor (top at Y 48) under columns 0..=4 only.
    fn ledge_world() -> WorldState {
        let grid = grid_from(16.0, &[
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "#####.....",
            "#####.....",
            "#####.....",
        ]);
        WorldState::new(grid, Vec2::new(24.0, 70.0))
    }

    fn spawn_player(world: &mut WorldState) -> BodyId {
        let body = KinematicBody::new(&PhysicsConfig::default()).placed_at(world.spawn);
        world.spawn(body)
    }

    fn run_until_landed(world: &mut WorldState) -> Vec<SimEvent> {
        let mut all = vec![];
        for _ in 0..300 {
            let events = step(world, FrameInput::default(), DT);
            let landed = events.iter().any(|e| matches!(e, SimEvent::Landed { .. }));
            all.extend(events);
            if landed { break; }
        }
        all
    }

    #[test]
    fn falling_player_reports_landing_once() {
        let mut world = ledge_world();
        let id = spawn_player(&mut world);
        let events = run_until_landed(&mut world);
        assert_eq!(events, vec![SimEvent::Landed { body: id, y: 48.0 }]);

        // Resting frames are quiet.
        for _ in 0..30 {
            assert!(step(&mut world, FrameInput::default(), DT).is_empty());
        }
        assert!(world.tick > 30);
    }

    #[test]
    fn jump_reports_jumped_not_left_ground() {
        let mut world = ledge_world();
        spawn_player(&mut world);
        run_until_landed(&mut world);

        let events = step(&mut world, FrameInput::jump(), DT);
        assert_eq!(events, vec![SimEvent::Jumped { body: PLAYER }]);
        assert!(world.player().unwrap().is_airborne());

        // Jump while airborne is ignored.
        let events = step(&mut world, FrameInput::jump(), DT);
        assert!(events.is_empty());
    }

    #[test]
    fn walking_off_ledge_reports_left_ground() {
        let mut world = ledge_world();
        spawn_player(&mut world);
        run_until_landed(&mut world);

        let mut saw_left = false;
        for _ in 0..120 {
            let events = step(&mut world, FrameInput::moving(MoveDir::Right), DT);
            if events.contains(&SimEvent::LeftGround { body: PLAYER }) {
                saw_left = true;
                break;
            }
        }
        assert!(saw_left);
        assert!(world.player().unwrap().collider().min_x() >= 80.0);
    }

    #[test]
    fn no_movement_intent_stops_player() {
        let mut world = ledge_world();
        spawn_player(&mut world);
        run_until_landed(&mut world);

        step(&mut world, FrameInput::moving(MoveDir::Left), DT);
        assert_eq!(world.player().unwrap().velocity().x, -1.0);
        step(&mut world, FrameInput::default(), DT);
        assert_eq!(world.player().unwrap().velocity().x, 0.0);
    }

    #[test]
    fn extra_bodies_fall_independently() {
        let mut world = ledge_world();
        spawn_player(&mut world);
        let crate_id = world.spawn(
            KinematicBody::new(&PhysicsConfig::default()).placed_at(Vec2::new(40.0, 100.0)),
        );

        let mut landed = vec![];
        for _ in 0..300 {
            for e in step(&mut world, FrameInput::moving(MoveDir::Left), DT) {
                if let SimEvent::Landed { body, .. } = e {
                    landed.push(body);
                }
            }
        }
        assert!(landed.contains(&crate_id));
        let crate_body = world.body(crate_id).unwrap();
        assert!(crate_body.is_grounded());
        assert_eq!(crate_body.velocity().x, 0.0);
    }

    #[test]
    fn empty_world_steps_quietly() {
        let mut world = ledge_world();
        assert!(step(&mut world, FrameInput::jump(), DT).is_empty());
        assert_eq!(world.tick, 1);
    }
}
