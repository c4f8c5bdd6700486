//! Headless driver: loads config and a level, spawns the player, and plays a
//! scripted intent timeline through the simulation, logging every event.
//!
//! Log level follows `RUST_LOG` (default `info`; `debug` shows every
//! landing/lift-off decided inside the body).

use glam::Vec2;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use platformer_lab::config::LabConfig;
use platformer_lab::domain::body::{KinematicBody, SpriteFrame};
use platformer_lab::domain::intent::{FrameInput, MoveDir};
use platformer_lab::domain::rect::Rect;
use platformer_lab::sim::event::SimEvent;
use platformer_lab::sim::level::load_level;
use platformer_lab::sim::step;
use platformer_lab::sim::world::WorldState;

/// Player sprite: 32x32, anchored at its center.
const SPRITE_SIZE: Vec2 = Vec2::new(32.0, 32.0);
/// Player hit box relative to the sprite's bottom-left corner.
const PLAYER_COLLIDER: Rect = Rect { origin: Vec2::new(8.0, 0.0), size: Vec2::new(16.0, 16.0) };

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let config = LabConfig::load();

    if let Err(e) = run(&config) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &LabConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level = load_level(config)?;
    info!(
        name = %level.name,
        width = level.grid.width_tiles(),
        height = level.grid.height_tiles(),
        tile_size = level.grid.tile_size(),
        "level loaded"
    );

    let mut world = WorldState::new(level.grid, level.spawn);
    let player = KinematicBody::new(&config.physics)
        .with_sprite(SpriteFrame::new(SPRITE_SIZE))
        .with_collider(PLAYER_COLLIDER)
        .placed_at(world.spawn);
    world.spawn(player);

    for frame in 0..config.run.ticks {
        let input = scripted_input(frame);
        let events = step::step(&mut world, input, config.run.dt);
        for event in &events {
            log_event(frame, event, &world);
        }
    }

    if let Some(player) = world.player() {
        let pos = player.collider_position();
        info!(
            ticks = world.tick,
            x = pos.x,
            y = pos.y,
            grounded = player.is_grounded(),
            "simulation finished"
        );
        println!();
        println!("Final hit box center: ({:.2}, {:.2})", pos.x, pos.y);
        println!("Final state: {:?}", player.state());
    }

    Ok(())
}

// ── Script ──

/// Intent timeline (60 Hz frames): settle, walk right off the ledge into
/// the pit, wait to land, jump back up onto the ledge, idle.
fn scripted_input(frame: u32) -> FrameInput {
    match frame {
        0..=59 => FrameInput::default(),
        60..=139 => FrameInput::moving(MoveDir::Right),
        140..=199 => FrameInput::default(),
        200 => FrameInput::jump(),
        201..=250 => FrameInput::moving(MoveDir::Left),
        _ => FrameInput::default(),
    }
}

fn log_event(frame: u32, event: &SimEvent, world: &WorldState) {
    match event {
        SimEvent::Landed { body, y } => {
            let row = world.grid.map_coord(Vec2::new(0.0, *y)).y;
            info!(frame, body, y, row, "landed");
        }
        SimEvent::LeftGround { body } => info!(frame, body, "left ground"),
        SimEvent::Jumped { body } => info!(frame, body, "jumped"),
    }
}
