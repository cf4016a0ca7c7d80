//! Convex working polygon produced while clipping triangles.

use nalgebra::Point3;

use crate::{AxisPlane, Classification, MeshData, PlaneSide, Triangle, TriangleFace};

/// A convex polygon whose corners index into a vertex pool ([`MeshData`]).
///
/// Corners keep the winding of the triangle they were cut from. Clipping a
/// triangle by one plane yields at most four corners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    indices: Vec<u32>,
    material: u32,
}

impl Polygon {
    /// Creates a new polygon from a list of pool indices.
    ///
    /// # Panics (debug builds only)
    /// Panics if fewer than 3 indices are provided.
    pub fn new(indices: Vec<u32>, material: u32) -> Self {
        debug_assert!(indices.len() >= 3, "polygon needs at least 3 corners");
        Self { indices, material }
    }

    /// Returns the pool indices of the corners.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Material id inherited from the source triangle.
    #[inline]
    pub fn material(&self) -> u32 {
        self.material
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Corner positions looked up in `pool`. Missing indices are skipped.
    pub fn positions<'a>(&'a self, pool: &'a MeshData) -> impl Iterator<Item = Point3<f32>> + 'a {
        self.indices
            .iter()
            .filter_map(|&i| pool.vertices.get(i as usize).copied())
    }

    /// Fan triangulation from the first corner.
    pub fn faces(&self) -> Vec<TriangleFace> {
        (1..self.indices.len().saturating_sub(1))
            .map(|i| {
                TriangleFace::new(
                    self.material,
                    self.indices[0],
                    self.indices[i],
                    self.indices[i + 1],
                )
            })
            .collect()
    }

    /// Total area of the fan triangles.
    pub fn area(&self, pool: &MeshData) -> f32 {
        self.faces()
            .iter()
            .filter_map(|f| pool.triangle(f))
            .map(|t: Triangle| t.area())
            .sum()
    }

    /// Classifies this polygon relative to a plane.
    pub fn classify(&self, plane: &AxisPlane, pool: &MeshData) -> Classification {
        let sides: Vec<PlaneSide> = self
            .positions(pool)
            .map(|p| plane.classify_point(&p))
            .collect();
        Classification::from_sides(&sides)
    }
}

impl From<&TriangleFace> for Polygon {
    fn from(face: &TriangleFace) -> Self {
        Self {
            indices: face.indices().to_vec(),
            material: face.material,
        }
    }
}
