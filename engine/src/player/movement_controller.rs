//! Character Movement Controller
//!
//! Per-frame driver that combines the horizontal sweep-and-slide resolver
//! with the vertical state machine for one character.
//!
//! # Movement Model
//!
//! - Walk speed: 0.1 units per tick
//! - Horizontal moves collide and slide against walls, then snap to the
//!   floor when it is within step tolerance
//! - Gravity, jumping and landing run once per tick in [`CharacterController::tick`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use stygian_engine::player::{CharacterController, camera_relative_direction};
//! use stygian_engine::world::CharacterShape;
//!
//! let mut controller = CharacterController::new(spawn, CharacterShape::default());
//!
//! // Each frame:
//! let direction = camera_relative_direction(camera_yaw, forward_input, right_input);
//! controller.walk(&index, direction);
//! controller.tick(&index);
//! ```

use tracing::debug;

use super::vertical::{self, CharacterState, VerticalState};
use crate::physics::cache::VersionedCache;
use crate::physics::collision::move_and_collide;
use crate::physics::types::{Vec2, Vec3};
use crate::world::config::CharacterShape;
use crate::world::spatial_index::SpatialIndex;

/// Walk speed in units per tick
pub const WALK_SPEED: f32 = 0.1;

/// Horizontal direction for camera-relative input.
///
/// `yaw` is in radians with 0 looking toward -Z. `forward` and `right` are
/// the input axes (-1..1). The result is normalized, or zero without input.
pub fn camera_relative_direction(yaw: f32, forward: f32, right: f32) -> Vec2 {
    let forward_dir = Vec2::new(yaw.sin(), -yaw.cos());
    // Perpendicular to forward on the XZ plane
    let right_dir = Vec2::new(yaw.cos(), yaw.sin());
    (forward_dir * forward + right_dir * right).normalize_or_zero()
}

/// Movement controller for one character in a static level.
#[derive(Debug, Clone)]
pub struct CharacterController {
    state: CharacterState,
    shape: CharacterShape,
    /// Units per tick
    walk_speed: f32,
    /// Bumped whenever the position changes
    position_version: u64,
    /// Floor height keyed by (index id, position version)
    floor_cache: VersionedCache<(u64, u64), f32>,
}

impl CharacterController {
    /// A grounded character at rest at `position`.
    pub fn new(position: Vec3, shape: CharacterShape) -> Self {
        Self {
            state: CharacterState::new(position),
            shape,
            walk_speed: WALK_SPEED,
            position_version: 0,
            floor_cache: VersionedCache::new(),
        }
    }

    pub fn with_walk_speed(mut self, walk_speed: f32) -> Self {
        self.walk_speed = walk_speed;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn shape(&self) -> &CharacterShape {
        &self.shape
    }

    pub fn walk_speed(&self) -> f32 {
        self.walk_speed
    }

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded()
    }

    pub fn vertical_speed(&self) -> f32 {
        self.state.vertical_speed
    }

    /// Moves the character without collision and stops all vertical motion.
    pub fn teleport(&mut self, position: Vec3) {
        self.state = CharacterState::new(position);
        self.touch();
    }

    fn touch(&mut self) {
        self.position_version = self.position_version.wrapping_add(1);
    }

    /// Walks one tick in `direction` (any length; only its heading is used).
    ///
    /// Returns the new position.
    pub fn walk(&mut self, index: &SpatialIndex, direction: Vec2) -> Vec3 {
        let displacement = direction.normalize_or_zero() * self.walk_speed;
        if displacement == Vec2::ZERO {
            return self.state.position;
        }

        self.state.position =
            move_and_collide(index, self.state.position, displacement, &self.shape);
        vertical::place_on_floor(index, &mut self.state, &self.shape);
        self.touch();

        self.state.position
    }

    /// Runs one tick of gravity, landing and ceiling checks.
    pub fn tick(&mut self, index: &SpatialIndex) -> VerticalState {
        let before = self.state;
        let state = vertical::step_vertical(index, &mut self.state, &self.shape);

        if self.state.position != before.position {
            self.touch();
        }
        if state != before.state {
            debug!(?state, position = ?self.state.position, "vertical state changed");
        }

        state
    }

    /// Starts a jump with the level's configured take-off speed.
    pub fn jump(&mut self, index: &SpatialIndex) -> bool {
        vertical::jump(&mut self.state, index.config().jump_speed)
    }

    /// Height of the floor supporting the character, cached until it moves
    /// or a different level is queried.
    pub fn floor_height(&mut self, index: &SpatialIndex) -> f32 {
        let key = (index.id(), self.position_version);
        let position = self.state.position;
        let radius = self.shape.radius;
        self.floor_cache
            .get_or_update(key, || index.highest_plane(position, radius))
    }
}
