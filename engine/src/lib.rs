//! Stygian Engine Library
//!
//! Solid geometry and collision for a first-person dungeon crawler.
//! The level is a static set of vertical wall segments and horizontal
//! floor/ceiling planes; a single upright cylinder walks, slides, steps,
//! falls and jumps through it.
//!
//! # Modules
//!
//! - [`physics`] - Geometry primitives and the sweep-and-slide resolver
//! - [`world`] - Level descriptions, collision tuning and the spatial index
//! - [`player`] - Vertical state machine and the per-frame character controller
//! - [`error`] - Level construction errors
//!
//! # Example
//!
//! ```ignore
//! use stygian_engine::world::{CollisionConfig, GridLevel, SpatialIndex};
//! use stygian_engine::player::CharacterController;
//! use glam::Vec2;
//!
//! // Build the level once
//! let grid = GridLevel::from_json(&std::fs::read_to_string("level.json")?)?;
//! let index = SpatialIndex::from_grid(&grid, CollisionConfig::default())?;
//!
//! // Spawn a character on the first open tile
//! let spawn = grid.first_walkable().unwrap_or_default();
//! let mut player = CharacterController::new(spawn, Default::default());
//!
//! // Each frame
//! player.walk(&index, Vec2::new(0.0, -1.0));
//! player.tick(&index);
//! ```

pub mod error;
pub mod physics;
pub mod player;
pub mod world;

pub use error::{GeometryError, LevelError};
// Re-export world types for convenience
pub use world::{CharacterShape, CollisionConfig, GridLevel, LevelDescription, SpatialIndex};
// Re-export player types
pub use player::{CharacterController, CharacterState, VerticalState};
