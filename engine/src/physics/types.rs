//! Physics type re-exports from glam
//!
//! This module provides the core mathematical types used throughout
//! the collision system. Vectors are re-exported from glam; the only
//! type defined here is the axis-aligned box every query is phrased in.
//!
//! Horizontal geometry lives in the XZ plane. Where a 2D vector is used,
//! `Vec2::x` is world X and `Vec2::y` is world Z.

pub use glam::{Vec2, Vec3};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// The smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |bounds, p| Self {
            min: bounds.min.min(p),
            max: bounds.max.max(p),
        }))
    }

    /// Box swept by a vertical cylinder whose base center moves from `base` by
    /// the horizontal `displacement`.
    pub fn swept_cylinder(base: Vec3, displacement: Vec2, radius: f32, height: f32) -> Self {
        let start = Vec2::new(base.x, base.z);
        let end = start + displacement;
        let lo = start.min(end) - Vec2::splat(radius);
        let hi = start.max(end) + Vec2::splat(radius);

        Self {
            min: Vec3::new(lo.x, base.y, lo.y),
            max: Vec3::new(hi.x, base.y + height, hi.y),
        }
    }

    /// Union of two boxes.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Size along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when the XZ footprints of both boxes share at least one point.
    pub fn overlaps_xz(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// True when the boxes share at least one point.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_xz(other) && self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// True when the point lies inside or on the boundary.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// The four horizontal corners as (x, z) pairs.
    pub fn corners_xz(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min.x, self.min.z),
            Vec2::new(self.min.x, self.max.z),
            Vec2::new(self.max.x, self.min.z),
            Vec2::new(self.max.x, self.max.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}
