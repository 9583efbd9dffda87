//! World Module
//!
//! Contains the static level: its description, the collision tuning and the
//! spatial index every runtime query goes through.
//!
//! ## Lifecycle
//! A level is described (JSON or code), validated into geometry, indexed
//! once, and then only read. Characters never modify the world.

pub mod config;
pub mod level;
pub mod spatial_index;

pub use config::{CharacterShape, CollisionConfig};
pub use level::{
    Corner, Direction, GridLevel, LevelDescription, LevelGeometry, Tile, WallDescription,
};
pub use spatial_index::{NO_CEILING, NO_FLOOR, SpatialIndex};
