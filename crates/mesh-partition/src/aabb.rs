//! Axis-aligned bounding boxes and box/triangle intersection.

use nalgebra::{Point3, Vector3};

use crate::AxisPlane;

/// Tolerance used when no configured boundary epsilon is at hand.
pub const BOX_EPSILON: f32 = 1e-4;

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis (0, 1 or 2).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vector3<f32> {
        let mut v = Vector3::zeros();
        v[self.index()] = 1.0;
        v
    }
}

/// An axis-aligned box spanned by a `bottom` (component-wise minimum) and a
/// `top` (component-wise maximum) corner.
///
/// Every constructor and mutator keeps `bottom[i] <= top[i]` on all axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBox {
    bottom: Point3<f32>,
    top: Point3<f32>,
}

impl AxisAlignedBox {
    /// Creates a box from two opposite corners, in any order.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self {
            bottom: a.inf(&b),
            top: a.sup(&b),
        }
    }

    /// Smallest box containing every point, or `None` if there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f32>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bottom = first;
        let mut top = first;
        for p in iter {
            bottom = bottom.inf(p);
            top = top.sup(p);
        }
        Some(Self { bottom, top })
    }

    #[inline]
    pub fn bottom(&self) -> Point3<f32> {
        self.bottom
    }

    #[inline]
    pub fn top(&self) -> Point3<f32> {
        self.top
    }

    /// Extent of the box along one axis.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        self.top[axis.index()] - self.bottom[axis.index()]
    }

    /// Extents along X, Y and Z.
    #[inline]
    pub fn extents(&self) -> Vector3<f32> {
        self.top - self.bottom
    }

    /// Sum of the three axis extents.
    pub fn extent_sum(&self) -> f32 {
        let e = self.extents();
        e.x + e.y + e.z
    }

    /// Largest of the three axis extents.
    pub fn max_extent(&self) -> f32 {
        self.extents().max()
    }

    /// Axis with the largest extent. Ties go to the earlier axis in X, Y, Z
    /// order.
    pub fn longest_axis(&self) -> Axis {
        let e = self.extents();
        let mut best = Axis::X;
        for axis in [Axis::Y, Axis::Z] {
            if e[axis.index()] > e[best.index()] {
                best = axis;
            }
        }
        best
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        Point3::from((self.bottom.coords + self.top.coords) * 0.5)
    }

    #[inline]
    pub fn half_extents(&self) -> Vector3<f32> {
        self.extents() * 0.5
    }

    /// Returns a copy grown by `amount` on every side.
    ///
    /// Negative amounts shrink the box, collapsing an axis to its center
    /// rather than inverting it.
    pub fn expanded(&self, amount: f32) -> Self {
        let pad = Vector3::repeat(amount);
        let mut bottom = self.bottom - pad;
        let mut top = self.top + pad;
        for i in 0..3 {
            if bottom[i] > top[i] {
                let mid = (bottom[i] + top[i]) * 0.5;
                bottom[i] = mid;
                top[i] = mid;
            }
        }
        Self { bottom, top }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &AxisAlignedBox) -> Self {
        Self {
            bottom: self.bottom.inf(&other.bottom),
            top: self.top.sup(&other.top),
        }
    }

    /// Sets the upper bound along `axis`, clamped so the box stays valid.
    pub fn set_top(&mut self, axis: Axis, value: f32) {
        let i = axis.index();
        self.top[i] = value.max(self.bottom[i]);
    }

    /// Sets the lower bound along `axis`, clamped so the box stays valid.
    pub fn set_bottom(&mut self, axis: Axis, value: f32) {
        let i = axis.index();
        self.bottom[i] = value.min(self.top[i]);
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains_point(&self, point: &Point3<f32>) -> bool {
        self.contains_point_with_epsilon(point, 0.0)
    }

    /// Containment test against the box padded by `epsilon` on every side.
    pub fn contains_point_with_epsilon(&self, point: &Point3<f32>, epsilon: f32) -> bool {
        (0..3).all(|i| point[i] >= self.bottom[i] - epsilon && point[i] <= self.top[i] + epsilon)
    }

    /// Box-box overlap, treating boxes closer than `epsilon` as touching.
    pub fn intersects_box(&self, other: &AxisAlignedBox, epsilon: f32) -> bool {
        (0..3).all(|i| {
            self.bottom[i] <= other.top[i] + epsilon && other.bottom[i] <= self.top[i] + epsilon
        })
    }

    /// Tests whether the triangle `v1 v2 v3` touches this box, using the
    /// separating axis theorem against the box padded by `epsilon`.
    pub fn intersects_triangle(
        &self,
        v1: &Point3<f32>,
        v2: &Point3<f32>,
        v3: &Point3<f32>,
        epsilon: f32,
    ) -> bool {
        // Any corner inside settles it
        if self.contains_point_with_epsilon(v1, epsilon)
            || self.contains_point_with_epsilon(v2, epsilon)
            || self.contains_point_with_epsilon(v3, epsilon)
        {
            return true;
        }

        // Work in box-centered coordinates
        let center = self.center();
        let half = self.half_extents() + Vector3::repeat(epsilon.max(0.0));
        let verts = [v1 - center, v2 - center, v3 - center];

        // Box face normals
        for i in 0..3 {
            let min = verts[0][i].min(verts[1][i]).min(verts[2][i]);
            let max = verts[0][i].max(verts[1][i]).max(verts[2][i]);
            if min > half[i] || max < -half[i] {
                return false;
            }
        }

        let edges = [
            verts[1] - verts[0],
            verts[2] - verts[1],
            verts[0] - verts[2],
        ];

        // Triangle plane
        let normal = edges[0].cross(&edges[1]);
        if normal.norm_squared() > f32::EPSILON * f32::EPSILON {
            let radius = half.dot(&normal.abs());
            let distance = normal.dot(&verts[0]);
            if distance.abs() > radius {
                return false;
            }
        }

        // Edge cross products
        for edge in &edges {
            for axis in Axis::ALL {
                let candidate = edge.cross(&axis.unit());
                if candidate.norm_squared() < f32::EPSILON {
                    continue;
                }
                let p0 = candidate.dot(&verts[0]);
                let p1 = candidate.dot(&verts[1]);
                let p2 = candidate.dot(&verts[2]);
                let radius = half.dot(&candidate.abs());
                if p0.min(p1).min(p2) > radius || p0.max(p1).max(p2) < -radius {
                    return false;
                }
            }
        }

        true
    }

    /// Bisects the box along `axis` at its midpoint.
    pub fn split(&self, axis: Axis) -> SplitBox {
        self.split_with_overlap(axis, 0.0)
    }

    /// Bisects the box along `axis`, growing each half by `margin` across the
    /// split plane so the two halves overlap by `2 * margin`.
    pub fn split_with_overlap(&self, axis: Axis, margin: f32) -> SplitBox {
        let i = axis.index();
        let plane_distance = (self.bottom[i] + self.top[i]) * 0.5;
        let mut lower = *self;
        let mut upper = *self;
        lower.set_top(axis, (plane_distance + margin).min(self.top[i]));
        upper.set_bottom(axis, (plane_distance - margin).max(self.bottom[i]));
        SplitBox {
            axis,
            lower,
            upper,
            plane_distance,
        }
    }

    /// The six bounding planes, each facing away from the box, in the order
    /// max-X, min-X, max-Y, min-Y, max-Z, min-Z.
    pub fn bounding_planes(&self) -> [AxisPlane; 6] {
        [
            AxisPlane::new(Axis::X, self.top.x),
            AxisPlane::new(Axis::X, self.bottom.x).flipped(),
            AxisPlane::new(Axis::Y, self.top.y),
            AxisPlane::new(Axis::Y, self.bottom.y).flipped(),
            AxisPlane::new(Axis::Z, self.top.z),
            AxisPlane::new(Axis::Z, self.bottom.z).flipped(),
        ]
    }
}

/// The two halves produced by bisecting a box, plus the plane between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitBox {
    pub axis: Axis,
    /// Half on the negative side of the plane.
    pub lower: AxisAlignedBox,
    /// Half on the positive side of the plane.
    pub upper: AxisAlignedBox,
    pub plane_distance: f32,
}
