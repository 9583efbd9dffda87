//! Dungeon Walk - Headless Movement Driver
//!
//! Loads a tile level, drops a character on the first open tile and walks a
//! scripted square path, jumping now and then. Logs every grounded/airborne
//! transition and the final position.
//!
//! Run with: `cargo run --bin dungeon-walk -- [level.json] [frames]`
//!
//! Without a level path the bundled courtyard is used. Set `RUST_LOG=debug`
//! (or `trace` for every wall contact) for more detail.

use std::error::Error;
use std::f32::consts::FRAC_PI_2;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stygian_engine::player::{CharacterController, camera_relative_direction};
use stygian_engine::world::{CharacterShape, CollisionConfig, GridLevel, SpatialIndex};

const COURTYARD: &str = include_str!("../../assets/levels/courtyard.json");

/// Frames walked when none are given on the command line.
const DEFAULT_FRAMES: u32 = 600;

/// Frames spent walking in one heading before turning right.
const FRAMES_PER_LEG: u32 = 45;

/// Frames between jump attempts.
const JUMP_INTERVAL: u32 = 90;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run() {
        error!("dungeon-walk failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);

    let grid = match args.next() {
        Some(path) => {
            info!(%path, "loading level");
            GridLevel::from_json(&std::fs::read_to_string(&path)?)?
        }
        None => GridLevel::from_json(COURTYARD)?,
    };
    let frames = match args.next() {
        Some(frames) => frames.parse::<u32>()?,
        None => DEFAULT_FRAMES,
    };

    let index = SpatialIndex::from_grid(&grid, CollisionConfig::default())?;
    let (cells_x, cells_z) = index.cell_counts();
    info!(
        walls = index.walls().len(),
        planes = index.planes().len(),
        cells_x,
        cells_z,
        "level ready"
    );

    let spawn = grid
        .first_walkable()
        .ok_or("level has no walkable tile to spawn on")?;
    let mut player = CharacterController::new(spawn, CharacterShape::default());
    info!(position = ?spawn, "spawned");

    let mut yaw = FRAC_PI_2;
    let mut grounded = player.is_grounded();

    for frame in 0..frames {
        if frame > 0 && frame % FRAMES_PER_LEG == 0 {
            yaw += FRAC_PI_2;
        }
        if frame > 0 && frame % JUMP_INTERVAL == 0 && player.jump(&index) {
            info!(frame, position = ?player.position(), "jump");
        }

        player.walk(&index, camera_relative_direction(yaw, 1.0, 0.0));
        player.tick(&index);

        if player.is_grounded() != grounded {
            grounded = player.is_grounded();
            info!(
                frame,
                grounded,
                position = ?player.position(),
                floor = player.floor_height(&index),
                "vertical state changed"
            );
        }
    }

    info!(frames, position = ?player.position(), grounded, "walk finished");
    Ok(())
}
