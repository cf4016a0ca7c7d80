//! Polygon cutting/splitting by axis-aligned planes.

use crate::{AxisPlane, Classification, MeshData, PlaneSide, Polygon};

/// Trait for geometry that can be cut by a plane.
pub trait Cuttable {
    /// Cuts the geometry by a plane, appending any vertices created at the
    /// plane crossings to `pool`.
    ///
    /// Returns `(front, back)` where:
    /// - `front`: `Some(polygon)` containing the part on the front side of the plane
    /// - `back`: `Some(polygon)` containing the part on the back side of the plane
    ///
    /// # Return values by classification
    ///
    /// - **Front**: `(Some(self), None)` - entire geometry is in front
    /// - **Back**: `(None, Some(self))` - entire geometry is behind
    /// - **Coplanar**: `(None, Some(self))` - treated as back
    /// - **Spanning**: `(Some(front_part), Some(back_part))` - split into two pieces
    fn cut(&self, plane: &AxisPlane, pool: &mut MeshData) -> (Option<Polygon>, Option<Polygon>);
}

impl Cuttable for Polygon {
    fn cut(&self, plane: &AxisPlane, pool: &mut MeshData) -> (Option<Polygon>, Option<Polygon>) {
        match self.classify(plane, pool) {
            Classification::Front => (Some(self.clone()), None),
            Classification::Back | Classification::Coplanar => (None, Some(self.clone())),
            Classification::Spanning => split_polygon(self, plane, pool),
        }
    }
}

/// Splits a spanning polygon into front and back parts.
///
/// Uses a variant of the Sutherland-Hodgman algorithm:
/// walks the polygon edges and builds two index lists,
/// adding an interpolated vertex when an edge crosses the plane.
fn split_polygon(
    polygon: &Polygon,
    plane: &AxisPlane,
    pool: &mut MeshData,
) -> (Option<Polygon>, Option<Polygon>) {
    let indices = polygon.indices();
    let n = indices.len();

    let mut front_indices = Vec::with_capacity(n + 1);
    let mut back_indices = Vec::with_capacity(n + 1);

    let corners: Vec<_> = indices
        .iter()
        .filter_map(|&i| pool.vertex(i as usize))
        .collect();
    if corners.len() != n {
        return (None, None);
    }

    let sides: Vec<PlaneSide> = corners
        .iter()
        .map(|v| plane.classify_point(&v.position))
        .collect();

    for i in 0..n {
        let next_idx = (i + 1) % n;

        match sides[i] {
            PlaneSide::Front => front_indices.push(indices[i]),
            PlaneSide::Back => back_indices.push(indices[i]),
            PlaneSide::OnPlane => {
                // On-plane vertices go to both sides
                front_indices.push(indices[i]);
                back_indices.push(indices[i]);
            }
        }

        // Check if edge crosses the plane (excluding on-plane cases)
        let crosses = matches!(
            (sides[i], sides[next_idx]),
            (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
        );

        if crosses {
            let from = &corners[i];
            let to = &corners[next_idx];
            if let Some(t) = plane.intersect_segment(&from.position, &to.position) {
                let mut crossing = from.interpolate(to, t);
                // Land exactly on the plane despite rounding in the lerp
                crossing.position[plane.axis().index()] = plane.offset();
                let new_index = pool.push_vertex(&crossing);
                front_indices.push(new_index);
                back_indices.push(new_index);
            }
        }
    }

    let build = |list: Vec<u32>| {
        if list.len() >= 3 {
            Some(Polygon::new(list, polygon.material()))
        } else {
            None
        }
    };

    (build(front_indices), build(back_indices))
}
