//! Collision Configuration Module
//!
//! Tuning values shared by the spatial index and both resolvers, plus the
//! size of the moving character.
//!
//! ## Units
//! Distances are in tile units (1 unit = one dungeon grid cell). Speeds and
//! accelerations are per simulation tick, not per second: the resolvers run
//! once per frame and know nothing about wall-clock time.

use serde::{Deserialize, Serialize};

/// Default number of spatial index cells along each horizontal axis.
pub const DEFAULT_PARTITIONS: usize = 4;

/// Maximum floor rise a character walks up without it counting as a wall.
pub const STEP_TOLERANCE: f32 = 0.2;

/// Downward acceleration per tick squared.
pub const GRAVITY: f32 = 0.003;

/// Upward speed per tick at the start of a jump.
pub const JUMP_SPEED: f32 = 0.06;

/// Collision time fraction kept between a character and the wall it hit.
pub const SLIDE_EPSILON: f32 = 0.01;

/// Remaining slide energy below which a collision absorbs the movement.
pub const ABSORB_THRESHOLD: f32 = 0.1;

/// Default character radius.
pub const CHARACTER_RADIUS: f32 = 0.3;

/// Default character height.
pub const CHARACTER_HEIGHT: f32 = 0.6;

/// Tuning for the spatial index and the resolvers.
///
/// Loaded from JSON by hosts that want to tweak it; every missing field falls
/// back to its default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Spatial index cells per horizontal axis
    pub partitions: usize,
    /// Highest floor (relative to the feet) that still counts as support
    pub step_tolerance: f32,
    /// Tolerance shaved off wall tops in the wall overlap test
    pub wall_step_height: f32,
    /// Downward acceleration per tick squared
    pub gravity: f32,
    /// Jump take-off speed per tick
    pub jump_speed: f32,
    /// Time fraction subtracted from every wall collision
    pub slide_epsilon: f32,
    /// Slides with less remaining energy than this are dropped
    pub absorb_threshold: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            partitions: DEFAULT_PARTITIONS,
            step_tolerance: STEP_TOLERANCE,
            wall_step_height: crate::physics::wall::WALL_STEP_HEIGHT,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            slide_epsilon: SLIDE_EPSILON,
            absorb_threshold: ABSORB_THRESHOLD,
        }
    }
}

impl CollisionConfig {
    /// Default tuning with a custom partition count.
    pub fn with_partitions(partitions: usize) -> Self {
        Self {
            partitions,
            ..Default::default()
        }
    }

    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Size of the moving cylinder. `position` always refers to its base center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterShape {
    pub radius: f32,
    pub height: f32,
}

impl Default for CharacterShape {
    fn default() -> Self {
        Self {
            radius: CHARACTER_RADIUS,
            height: CHARACTER_HEIGHT,
        }
    }
}

impl CharacterShape {
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollisionConfig::default();
        assert_eq!(config.partitions, 4);
        assert_eq!(config.step_tolerance, 0.2);
        assert_eq!(config.wall_step_height, 0.2);
        assert_eq!(config.gravity, 0.003);
        assert_eq!(config.jump_speed, 0.06);
        assert_eq!(config.slide_epsilon, 0.01);
        assert_eq!(config.absorb_threshold, 0.1);
    }

    #[test]
    fn test_with_partitions() {
        let config = CollisionConfig::with_partitions(16);
        assert_eq!(config.partitions, 16);
        assert_eq!(config.step_tolerance, STEP_TOLERANCE);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CollisionConfig::from_json(r#"{ "partitions": 8, "gravity": 0.01 }"#).unwrap();
        assert_eq!(config.partitions, 8);
        assert_eq!(config.gravity, 0.01);
        assert_eq!(config.jump_speed, JUMP_SPEED);
    }

    #[test]
    fn test_character_shape_default() {
        let shape = CharacterShape::default();
        assert_eq!(shape.radius, 0.3);
        assert_eq!(shape.height, 0.6);

        let shape: CharacterShape = serde_json::from_str(r#"{ "radius": 0.5 }"#).unwrap();
        assert_eq!(shape.radius, 0.5);
        assert_eq!(shape.height, CHARACTER_HEIGHT);
    }
}
