//! Axis-aligned planes and point classification.

use nalgebra::Point3;

use crate::Axis;

/// Default epsilon for plane classification.
/// Points within this distance of the plane are considered "on" the plane.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a triangle or polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All vertices are in front of the plane
    Front,
    /// All vertices are behind the plane
    Back,
    /// All vertices are on the plane (coplanar)
    Coplanar,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

impl Classification {
    /// Folds a set of per-vertex sides into a single classification.
    pub fn from_sides(sides: &[PlaneSide]) -> Self {
        let front = sides.iter().filter(|s| **s == PlaneSide::Front).count();
        let back = sides.iter().filter(|s| **s == PlaneSide::Back).count();

        if front == 0 && back == 0 {
            Classification::Coplanar
        } else if back == 0 {
            Classification::Front
        } else if front == 0 {
            Classification::Back
        } else {
            Classification::Spanning
        }
    }
}

/// A plane perpendicular to one coordinate axis.
///
/// The plane is the set of points where `point[axis] == offset`. Its normal
/// points along `+axis`, or along `-axis` when the plane is flipped, so the
/// front side of a flipped plane is `point[axis] < offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPlane {
    axis: Axis,
    offset: f32,
    flipped: bool,
}

impl AxisPlane {
    /// Creates a plane at `offset` along `axis`, facing `+axis`.
    pub fn new(axis: Axis, offset: f32) -> Self {
        Self {
            axis,
            offset,
            flipped: false,
        }
    }

    /// The axis this plane is perpendicular to.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Position of the plane along its axis.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Returns `true` if the normal points along `-axis`.
    #[inline]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            flipped: !self.flipped,
            ..*self
        }
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f32>) -> f32 {
        let distance = point[self.axis.index()] - self.offset;
        if self.flipped { -distance } else { distance }
    }

    /// Classifies which side of the plane a point lies on.
    /// Uses the default `PLANE_EPSILON` tolerance.
    #[inline]
    pub fn classify_point(&self, point: &Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: &Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Classifies a triangle's three corners against the plane.
    pub fn classify_triangle(&self, corners: &[Point3<f32>; 3]) -> Classification {
        let sides = corners.map(|c| self.classify_point(&c));
        Classification::from_sides(&sides)
    }

    /// Computes where the segment `start -> end` crosses the plane.
    ///
    /// Returns the interpolation parameter `t = (offset - start) / (end - start)`
    /// measured along the plane's axis (0.0 = start, 1.0 = end).
    ///
    /// Returns `None` if the segment runs parallel to the plane (zero-length
    /// denominator) or doesn't reach it.
    pub fn intersect_segment(&self, start: &Point3<f32>, end: &Point3<f32>) -> Option<f32> {
        let axis = self.axis.index();
        let denom = end[axis] - start[axis];

        if denom.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.offset - start[axis]) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        Some(t)
    }
}
