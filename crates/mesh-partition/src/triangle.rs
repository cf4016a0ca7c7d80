//! Positional triangle used by intersection and partitioning tests.

use nalgebra::{Point3, Vector3};

use crate::{AxisAlignedBox, AxisPlane, Classification};

/// A triangle in 3D space, defined by three vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f32>; 3],
}

impl Triangle {
    /// Creates a new triangle from three points.
    ///
    /// The winding order determines the normal direction via the right-hand rule:
    /// normal = (b - a) x (c - a)
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>; 3] {
        &self.vertices
    }

    /// Computes the (unnormalized) normal vector of the triangle.
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Computes the unit normal vector of the triangle.
    ///
    /// Returns `None` if the triangle is degenerate (zero area).
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        let n = self.normal();
        let len = n.norm();
        if len > f32::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    pub fn area(&self) -> f32 {
        self.normal().norm() * 0.5
    }

    /// Computes the centroid (center of mass) of the triangle.
    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    pub fn bounding_box(&self) -> AxisAlignedBox {
        let [a, b, c] = &self.vertices;
        AxisAlignedBox::new(a.inf(b).inf(c), a.sup(b).sup(c))
    }

    /// Classifies this triangle relative to a plane.
    pub fn classify(&self, plane: &AxisPlane) -> Classification {
        plane.classify_triangle(&self.vertices)
    }

    /// Separating-axis overlap test against a box padded by `epsilon`.
    pub fn intersects_box(&self, bounds: &AxisAlignedBox, epsilon: f32) -> bool {
        let [a, b, c] = &self.vertices;
        bounds.intersects_triangle(a, b, c, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Axis;
    use assert_approx_eq::assert_approx_eq;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    #[test]
    fn area_and_centroid() {
        let tri = make_triangle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        assert_approx_eq!(tri.area(), 2.0);
        let c = tri.centroid();
        assert_approx_eq!(c.x, 2.0 / 3.0);
        assert_approx_eq!(c.y, 2.0 / 3.0);
    }

    #[test]
    fn unit_normal_follows_winding() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let n = tri.unit_normal().unwrap();
        assert_approx_eq!(n.z, 1.0);
    }

    #[test]
    fn degenerate_has_no_unit_normal() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert!(tri.unit_normal().is_none());
        assert_approx_eq!(tri.area(), 0.0);
    }

    #[test]
    fn classify_against_axis_plane() {
        let tri = make_triangle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        let middle = AxisPlane::new(Axis::X, 1.0);
        let beyond = AxisPlane::new(Axis::X, 5.0);
        let flat = AxisPlane::new(Axis::Z, 0.0);
        assert_eq!(tri.classify(&middle), Classification::Spanning);
        assert_eq!(tri.classify(&beyond), Classification::Back);
        assert_eq!(tri.classify(&flat), Classification::Coplanar);
    }

    #[test]
    fn bounding_box_covers_corners() {
        let tri = make_triangle([1.0, -1.0, 0.0], [2.0, 3.0, 0.5], [-1.0, 0.0, 1.0]);
        let b = tri.bounding_box();
        assert_eq!(b.bottom(), Point3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.top(), Point3::new(2.0, 3.0, 1.0));
    }
}
