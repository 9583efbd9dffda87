//! Physics module for the dungeon engine
//!
//! Solid geometry and collision for first-person movement through a static
//! level. Built from scratch without an external physics library: the level
//! is a set of vertical wall segments and horizontal planes, and the only
//! moving body is an upright cylinder.
//!
//! # Unit System
//!
//! **1 unit = 1 dungeon tile**
//!
//! - Positions refer to the base center of the character's cylinder
//! - Velocities and accelerations are per simulation tick
//!
//! # Submodules
//!
//! - [`types`] - Vec2/Vec3 re-exported from glam, plus [`Aabb`]
//! - [`wall`] - Vertical wall segments with per-endpoint heights
//! - [`plane`] - Floor and ceiling quads
//! - [`collision`] - Sweep-and-slide horizontal resolver
//! - [`cache`] - Versioned cache for derived values

pub mod cache;
pub mod collision;
pub mod plane;
pub mod types;
pub mod wall;

// Re-export commonly used types at the physics module level
pub use cache::VersionedCache;
pub use collision::{
    HitKind, MAX_SLIDE_ITERATIONS, SlideResult, WallHit, line_intersection, move_and_collide,
    sweep_and_slide, vertex_contact_distance,
};
pub use plane::{HorizontalPlane, PlaneCorners, PlaneShape};
pub use types::{Aabb, Vec2, Vec3};
pub use wall::{WALL_STEP_HEIGHT, WallEndpoint, WallKind, WallSegment};
