//! Wall segments
//!
//! A wall segment is a vertical quad standing on a 2D line in the XZ plane.
//! Each endpoint carries its own bottom and height, so a segment can have a
//! sloped top or bottom (the side of a ramp, a step between two slopes).
//!
//! Walls only block horizontal movement. Floors and ceilings are answered by
//! [`HorizontalPlane`](super::plane::HorizontalPlane).

use super::collision::line_intersection;
use super::types::{Aabb, Vec2, Vec3};
use crate::error::GeometryError;

/// Downward tolerance subtracted from a wall's top in the overlap test.
///
/// Matches the floor step tolerance so a character can step onto a surface
/// that is only marginally below the top of a neighbouring low wall.
pub const WALL_STEP_HEIGHT: f32 = 0.2;

/// One end of a wall segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallEndpoint {
    /// Horizontal position (x, z)
    pub point: Vec2,
    /// Height of the wall's bottom edge at this end
    pub bottom: f32,
    /// Vertical extent above `bottom`
    pub height: f32,
}

impl WallEndpoint {
    pub fn new(x: f32, bottom: f32, height: f32, z: f32) -> Self {
        Self {
            point: Vec2::new(x, z),
            bottom,
            height,
        }
    }

    /// Height of the wall's top edge at this end.
    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }
}

/// Shape class of a wall, decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallKind {
    /// Runs along the X axis or the Z axis (tile grid edges).
    Straight,
    /// Any other direction.
    Diagonal,
}

/// An immutable vertical obstacle used for horizontal collision.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    start: WallEndpoint,
    end: WallEndpoint,
    normal: Vec2,
    kind: WallKind,
    bounds: Aabb,
}

impl WallSegment {
    /// Creates a wall whose normal is the horizontal perpendicular of the
    /// segment direction: walking from `start` to `end`, the normal points to
    /// the left (for a wall along +X it points toward +Z).
    pub fn new(start: WallEndpoint, end: WallEndpoint) -> Result<Self, GeometryError> {
        let normal = (end.point - start.point)
            .perp()
            .try_normalize()
            .ok_or(GeometryError::DegenerateWall)?;
        Self::build(start, end, normal)
    }

    /// Creates a wall with an explicitly supplied outward normal.
    ///
    /// Only the horizontal direction of `normal` is used; it is normalized here.
    pub fn with_normal(
        start: WallEndpoint,
        end: WallEndpoint,
        normal: Vec2,
    ) -> Result<Self, GeometryError> {
        let normal = normal.try_normalize().ok_or(GeometryError::ZeroNormal)?;
        Self::build(start, end, normal)
    }

    fn build(start: WallEndpoint, end: WallEndpoint, normal: Vec2) -> Result<Self, GeometryError> {
        let direction = end.point - start.point;
        if direction.length_squared() <= f32::EPSILON {
            return Err(GeometryError::DegenerateWall);
        }

        let kind = if direction.x == 0.0 || direction.y == 0.0 {
            WallKind::Straight
        } else {
            WallKind::Diagonal
        };

        let bounds = Aabb::new(
            Vec3::new(
                start.point.x.min(end.point.x),
                start.bottom.min(end.bottom),
                start.point.y.min(end.point.y),
            ),
            Vec3::new(
                start.point.x.max(end.point.x),
                start.top().max(end.top()),
                start.point.y.max(end.point.y),
            ),
        );

        Ok(Self {
            start,
            end,
            normal,
            kind,
            bounds,
        })
    }

    pub fn start(&self) -> &WallEndpoint {
        &self.start
    }

    pub fn end(&self) -> &WallEndpoint {
        &self.end
    }

    /// Unit outward normal in the XZ plane.
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    /// Unit outward normal as a world-space vector (zero Y).
    pub fn normal_3d(&self) -> Vec3 {
        Vec3::new(self.normal.x, 0.0, self.normal.y)
    }

    pub fn kind(&self) -> WallKind {
        self.kind
    }

    /// Bounding box over both endpoints at both height extremes.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Both endpoints in the XZ plane.
    pub fn vertices(&self) -> [Vec2; 2] {
        [self.start.point, self.end.point]
    }

    /// Whether a movement in `direction` runs against the wall's face.
    ///
    /// A character moving away from (or parallel to) a wall can never hit it.
    pub fn faces_movement(&self, direction: Vec2) -> bool {
        self.normal.dot(direction) < 0.0
    }

    /// Position of `point` along the segment: 0 at `start`, 1 at `end`.
    ///
    /// Not clamped. Points off the line are projected onto it.
    pub fn param_at(&self, point: Vec2) -> f32 {
        let direction = self.end.point - self.start.point;
        let offset = point - self.start.point;

        match self.kind {
            WallKind::Straight if direction.x != 0.0 => offset.x / direction.x,
            WallKind::Straight => offset.y / direction.y,
            WallKind::Diagonal => direction.dot(offset) / direction.length_squared(),
        }
    }

    /// Bottom edge height at `point`, interpolated along the segment.
    pub fn bottom_at(&self, point: Vec2) -> f32 {
        let t = self.param_at(point).clamp(0.0, 1.0);
        self.start.bottom + (self.end.bottom - self.start.bottom) * t
    }

    /// Top edge height at `point`, interpolated along the segment.
    pub fn top_at(&self, point: Vec2) -> f32 {
        let t = self.param_at(point).clamp(0.0, 1.0);
        self.start.top() + (self.end.top() - self.start.top()) * t
    }

    /// Whether a point already known to lie on the wall's line falls within
    /// the segment's own extent.
    pub fn contains_point(&self, point: Vec2) -> bool {
        (0.0..=1.0).contains(&self.param_at(point))
    }

    /// Intersection of the infinite line through `from`..`to` with the wall's
    /// centerline. `None` when the lines are parallel.
    pub fn line_intersection(&self, from: Vec2, to: Vec2) -> Option<Vec2> {
        line_intersection(from, to, self.start.point, self.end.point)
    }

    /// Exact overlap test between this wall and an axis-aligned box.
    ///
    /// The box must overlap the wall's bounds, and the wall's vertical span
    /// evaluated under the box's four horizontal corners must overlap the
    /// box's vertical span. `step_height` is shaved off the wall's top so a
    /// box standing marginally below a low wall's top is not blocked by it.
    pub fn overlaps_box(&self, bounds: &Aabb, step_height: f32) -> bool {
        if !self.bounds.overlaps(bounds) {
            return false;
        }

        let corners = bounds.corners_xz();
        let bottom = corners
            .iter()
            .map(|&c| self.bottom_at(c))
            .fold(f32::INFINITY, f32::min);
        let top = corners
            .iter()
            .map(|&c| self.top_at(c))
            .fold(f32::NEG_INFINITY, f32::max);

        bottom < bounds.max.y && top - step_height > bounds.min.y
    }
}
