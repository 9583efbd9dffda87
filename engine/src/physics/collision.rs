//! Collision detection module
//!
//! Sweep-and-slide movement of a vertical cylinder through the static walls
//! of a [`SpatialIndex`].
//!
//! # Sweep and slide
//!
//! Each pass sweeps the character's disk along the desired displacement,
//! finds the earliest wall face or wall vertex it would touch, stops just
//! short of it and turns the remaining motion into a slide along the
//! obstacle. A pass that hits nothing applies the whole displacement.
//! At most `1 + MAX_SLIDE_ITERATIONS` passes run per call, which is enough to
//! settle into a corner formed by two walls.
//!
//! # Example
//!
//! ```ignore
//! use stygian_engine::physics::collision::move_and_collide;
//! use stygian_engine::world::{CharacterShape, SpatialIndex};
//! use glam::{Vec2, Vec3};
//!
//! let index = SpatialIndex::from_grid(&level, Default::default())?;
//! let shape = CharacterShape::default();
//!
//! // Each frame:
//! player_position = move_and_collide(&index, player_position, Vec2::new(0.0, -0.1), &shape);
//! ```

use glam::Vec3Swizzles;
use static_assertions::const_assert_eq;
use tracing::trace;

use super::types::{Aabb, Vec2, Vec3};
use super::wall::WallSegment;
use crate::world::config::CharacterShape;
use crate::world::spatial_index::SpatialIndex;

/// Slide passes allowed after the first one. Deeper passes are dropped and
/// the character stays where the last pass left it.
pub const MAX_SLIDE_ITERATIONS: usize = 2;

const_assert_eq!(MAX_SLIDE_ITERATIONS, 2);

/// What part of a wall the character ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// The flat face between the two endpoints.
    Face,
    /// One of the two endpoints.
    Vertex,
}

/// Information about the earliest wall contact of one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Index of the wall in the spatial index
    pub wall: usize,
    /// Contact point in the XZ plane (on the wall line, or the vertex itself)
    pub point: Vec2,
    /// Unit direction pushing the character away from the obstacle
    pub normal: Vec2,
    /// Fraction of the displacement travelled before the contact
    pub time: f32,
    /// Face or vertex contact
    pub kind: HitKind,
}

impl WallHit {
    /// Creates a new WallHit with the given parameters.
    pub fn new(wall: usize, point: Vec2, normal: Vec2, time: f32, kind: HitKind) -> Self {
        Self {
            wall,
            point,
            normal,
            time,
            kind,
        }
    }
}

/// Outcome of a full sweep-and-slide call.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideResult {
    /// Final base position of the character
    pub position: Vec3,
    /// Every contact, in the order the passes found them
    pub hits: Vec<WallHit>,
    /// Number of sweep passes that ran
    pub passes: usize,
}

/// Intersection of the infinite lines through `a1`..`a2` and `b1`..`b2`.
///
/// Both lines are written as `a*x + b*y = c` and solved with Cramer's rule.
/// Parallel (or degenerate) lines have no intersection.
pub fn line_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let la = a2.y - a1.y;
    let lb = a1.x - a2.x;
    let lc = la * a1.x + lb * a1.y;

    let ma = b2.y - b1.y;
    let mb = b1.x - b2.x;
    let mc = ma * b1.x + mb * b1.y;

    let determinant = la * mb - ma * lb;
    if determinant == 0.0 {
        return None;
    }

    Some(Vec2::new(
        (mb * lc - lb * mc) / determinant,
        (la * mc - ma * lc) / determinant,
    ))
}

/// Distance a disk of `radius` centered at `point` travels along
/// `-inverse_direction` before its edge touches `vertex`.
///
/// `None` when the disk passes the vertex without touching it.
/// `inverse_direction` must be normalized.
pub fn vertex_contact_distance(
    vertex: Vec2,
    inverse_direction: Vec2,
    point: Vec2,
    radius: f32,
) -> Option<f32> {
    let to_point = point - vertex;
    let along = to_point.dot(inverse_direction);
    let discriminant = radius * radius - (to_point.length_squared() - along * along);

    if discriminant < 0.0 {
        return None;
    }

    Some(along - discriminant.sqrt())
}

/// Contact of the disk's leading edge with the face of `wall`, if the edge
/// crosses the wall line inside the segment. `wall` is left as 0.
fn face_hit(
    wall: &WallSegment,
    start: Vec2,
    displacement: Vec2,
    radius: f32,
    epsilon: f32,
) -> Option<WallHit> {
    let length = displacement.length();
    let direction = displacement / length;

    // Path of the point on the disk's edge nearest to the wall
    let from = start - wall.normal() * radius;
    let to = from + displacement;

    let crossing = wall.line_intersection(from, to)?;
    if !wall.contains_point(crossing) {
        return None;
    }

    let travelled = (crossing - from).dot(direction);
    let time = (travelled / length - epsilon).max(0.0);
    Some(WallHit::new(0, crossing, wall.normal(), time, HitKind::Face))
}

/// Earliest wall contact for a disk at `position` moving by `displacement`.
///
/// `displacement` must be non-zero.
pub fn find_earliest_hit(
    index: &SpatialIndex,
    position: Vec3,
    displacement: Vec2,
    shape: &CharacterShape,
) -> Option<WallHit> {
    let epsilon = index.config().slide_epsilon;
    let radius = shape.radius;
    let start = position.xz();
    let length = displacement.length();
    let direction = displacement / length;
    let inverse_direction = -direction;

    let query = Aabb::swept_cylinder(position, displacement, radius, shape.height);
    let mut earliest: Option<WallHit> = None;
    let mut earliest_time = 1.0;

    for wall_index in index.overlapping_wall_indices(&query) {
        let wall = &index.walls()[wall_index];

        if !wall.faces_movement(direction) {
            continue;
        }

        // Walls are one-sided: only a character in front of the line can hit the
        // face. Either side can still clip an endpoint.
        let in_front = (start - wall.start().point).dot(wall.normal()) >= 0.0;

        if in_front && let Some(hit) = face_hit(wall, start, displacement, radius, epsilon) {
            if hit.time < earliest_time {
                earliest_time = hit.time;
                earliest = Some(WallHit { wall: wall_index, ..hit });
            }
            continue;
        }

        for vertex in wall.vertices() {
            let Some(distance) = vertex_contact_distance(vertex, inverse_direction, start, radius)
            else {
                continue;
            };
            if distance <= 0.0 {
                continue;
            }

            let time = (distance / length - epsilon).max(0.0);
            if time < earliest_time {
                let stopped = start + displacement * time;
                let normal = (stopped - vertex).try_normalize().unwrap_or(wall.normal());

                earliest_time = time;
                earliest = Some(WallHit::new(wall_index, vertex, normal, time, HitKind::Vertex));
            }
        }
    }

    earliest
}

/// Moves a character by a horizontal `displacement`, colliding and sliding
/// against walls. Only X and Z of the position change.
pub fn sweep_and_slide(
    index: &SpatialIndex,
    position: Vec3,
    displacement: Vec2,
    shape: &CharacterShape,
) -> SlideResult {
    let absorb_threshold = index.config().absorb_threshold;
    let mut position = position;
    let mut displacement = displacement;
    let mut hits = Vec::new();
    let mut passes = 0;

    for _ in 0..=MAX_SLIDE_ITERATIONS {
        if displacement.length_squared() <= f32::EPSILON * f32::EPSILON {
            break;
        }
        passes += 1;

        let Some(hit) = find_earliest_hit(index, position, displacement, shape) else {
            position.x += displacement.x;
            position.z += displacement.y;
            break;
        };

        trace!(wall = hit.wall, time = hit.time, kind = ?hit.kind, "wall hit");

        position.x += displacement.x * hit.time;
        position.z += displacement.y * hit.time;
        hits.push(hit);

        let remaining_energy = 1.0 - hit.time;
        if remaining_energy < absorb_threshold {
            break;
        }

        // Cancel the part of the motion that pushes into the obstacle
        let slide_speed = -hit.normal.dot(displacement);
        displacement = (displacement + hit.normal * slide_speed) * remaining_energy;
    }

    SlideResult {
        position,
        hits,
        passes,
    }
}

/// Sweep-and-slide entry point: the character's new base position.
pub fn move_and_collide(
    index: &SpatialIndex,
    position: Vec3,
    displacement: Vec2,
    shape: &CharacterShape,
) -> Vec3 {
    sweep_and_slide(index, position, displacement, shape).position
}
