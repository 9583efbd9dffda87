//! Player Module
//!
//! Provides character movement through a static level.
//!
//! # Components
//!
//! - [`CharacterController`] - Per-frame walking, jumping and gravity
//!   - Walks with sweep-and-slide collision against walls
//!   - Follows slopes and small steps without leaving the ground
//! - [`vertical`] - Grounded/Airborne state machine with floor and ceiling checks

pub mod movement_controller;
pub mod vertical;

pub use movement_controller::{CharacterController, WALK_SPEED, camera_relative_direction};
pub use vertical::{
    CEILING_CLEARANCE, CharacterState, VerticalState, jump, place_on_floor, step_vertical,
};
