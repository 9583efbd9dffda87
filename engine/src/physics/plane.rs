//! Horizontal planes (floors and ceilings)
//!
//! A plane is a quadrilateral given by four corners. Flat axis-aligned
//! rectangles are answered in O(1); anything else (ramps, skewed quads) is
//! split into two triangles for point-in-polygon tests and height
//! interpolation.
//!
//! ```text
//!   tl ---- tr        upper triangle: tl, tr, br
//!   |  \     |        lower triangle: tl, bl, br
//!   |    \   |
//!   bl ---- br        (z grows from the top row to the bottom row)
//! ```

use glam::Vec3Swizzles;
use serde::{Deserialize, Serialize};

use super::types::{Aabb, Vec2, Vec3};
use crate::error::GeometryError;

/// The four corners of a plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneCorners {
    pub tl: Vec3,
    pub tr: Vec3,
    pub bl: Vec3,
    pub br: Vec3,
}

impl PlaneCorners {
    pub fn new(tl: Vec3, tr: Vec3, bl: Vec3, br: Vec3) -> Self {
        Self { tl, tr, bl, br }
    }

    /// Corners in boundary-walk order: tl, tr, br, bl.
    fn ring(&self) -> [Vec3; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }
}

/// One half of a polygon plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    a: Vec3,
    b: Vec3,
    c: Vec3,
}

impl Triangle {
    fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Odd-crossing parity test along +X in the XZ projection.
    fn contains_xz(&self, p: Vec2) -> bool {
        let vertices = [self.a.xz(), self.b.xz(), self.c.xz()];
        let mut inside = false;

        for i in 0..3 {
            let a = vertices[i];
            let b = vertices[(i + 1) % 3];
            if (a.y > p.y) != (b.y > p.y) {
                let crossing_x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < crossing_x {
                    inside = !inside;
                }
            }
        }

        inside
    }

    /// Height of the triangle's plane above `p`, interpolated from the
    /// vertex heights by the point's fractions along the two edges leaving `a`.
    fn height_at(&self, p: Vec2) -> Option<f32> {
        let e1 = self.b.xz() - self.a.xz();
        let e2 = self.c.xz() - self.a.xz();
        let det = e1.perp_dot(e2);
        if det.abs() <= f32::EPSILON {
            return None;
        }

        let offset = p - self.a.xz();
        let u = offset.perp_dot(e2) / det;
        let v = e1.perp_dot(offset) / det;

        Some(self.a.y + u * (self.b.y - self.a.y) + v * (self.c.y - self.a.y))
    }
}

/// Shape class of a plane, decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneShape {
    /// Flat axis-aligned rectangle at a constant height.
    Rectangle { y: f32 },
    /// Arbitrary quad split along the tl-br diagonal.
    Polygon { upper: Triangle, lower: Triangle },
}

/// An immutable floor or ceiling surface.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalPlane {
    corners: PlaneCorners,
    shape: PlaneShape,
    bounds: Aabb,
}

impl HorizontalPlane {
    /// Classifies and builds a plane.
    ///
    /// Fails when two corners share the same horizontal position.
    pub fn new(corners: PlaneCorners) -> Result<Self, GeometryError> {
        let ring = corners.ring();
        for i in 0..4 {
            for j in (i + 1)..4 {
                if ring[i].xz() == ring[j].xz() {
                    return Err(GeometryError::DegeneratePlane);
                }
            }
        }

        let PlaneCorners { tl, tr, bl, br } = corners;
        let axis_aligned = tl.x == bl.x && tl.z == tr.z && bl.z == br.z && tr.x == br.x;
        let flat = tl.y == bl.y && bl.y == br.y && br.y == tr.y;

        let shape = if axis_aligned && flat {
            PlaneShape::Rectangle { y: tl.y }
        } else {
            PlaneShape::Polygon {
                upper: Triangle::new(tl, tr, br),
                lower: Triangle::new(tl, bl, br),
            }
        };

        let bounds = Aabb::from_points(ring).ok_or(GeometryError::DegeneratePlane)?;

        Ok(Self {
            corners,
            shape,
            bounds,
        })
    }

    pub fn corners(&self) -> &PlaneCorners {
        &self.corners
    }

    pub fn shape(&self) -> &PlaneShape {
        &self.shape
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn is_rectangle(&self) -> bool {
        matches!(self.shape, PlaneShape::Rectangle { .. })
    }

    /// Height of the plane under a disk of `radius` centered at `position`.
    ///
    /// `None` when the disk does not touch the plane. Only `position.x` and
    /// `position.z` are used.
    pub fn y_at_point(&self, position: Vec3, radius: f32) -> Option<f32> {
        match self.shape {
            PlaneShape::Rectangle { y } => self.rectangle_y(position, radius, y),
            PlaneShape::Polygon { upper, lower } => {
                self.polygon_y(position.xz(), radius, &upper, &lower)
            }
        }
    }

    fn rectangle_y(&self, position: Vec3, radius: f32, y: f32) -> Option<f32> {
        let b = &self.bounds;
        if position.x + radius < b.min.x
            || position.z + radius < b.min.z
            || position.x - radius >= b.max.x
            || position.z - radius >= b.max.z
        {
            return None;
        }

        Some(y)
    }

    fn polygon_y(&self, p: Vec2, radius: f32, upper: &Triangle, lower: &Triangle) -> Option<f32> {
        for triangle in [lower, upper] {
            if triangle.contains_xz(p) {
                if let Some(y) = triangle.height_at(p) {
                    return Some(y);
                }
            }
        }

        // Outside both triangles: the disk may still overlap a boundary edge
        let PlaneCorners { tl, tr, bl, br } = self.corners;
        [(tl, tr), (bl, br), (tl, bl), (tr, br)]
            .into_iter()
            .find_map(|(a, b)| edge_y(a, b, p, radius))
    }
}

/// Height on the edge `a`..`b` at the point closest to `p`, if a disk of
/// `radius` at `p` reaches the edge within its extent.
fn edge_y(a: Vec3, b: Vec3, p: Vec2, radius: f32) -> Option<f32> {
    let edge = b.xz() - a.xz();
    let t = edge.dot(p - a.xz()) / edge.length_squared();
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let closest = a.xz() + edge * t;
    if closest.distance(p) <= radius {
        Some(a.y + (b.y - a.y) * t)
    } else {
        None
    }
}
