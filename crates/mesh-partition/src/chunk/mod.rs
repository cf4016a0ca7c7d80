//! Splitting a mesh into box-bounded chunks that fit face and size budgets.
//!
//! Two policies share the same output type:
//!
//! - [`decompose`]: exact clipping. Chunks tile space without overlap and
//!   triangles crossing a split are cut, with every vertex attribute
//!   interpolated at the cut.
//! - [`partition_by_centroid`]: whole triangles are assigned to every
//!   (optionally overlapping) half-box holding their centroid. Nothing is
//!   cut, so boundary triangles may appear in both halves.
//!
//! Both walk an explicit worklist. A chunk that still breaks a budget when
//! it can no longer be split is kept and reported as a [`ChunkViolation`].

mod cuboid;
mod overlap;

use nalgebra::Point3;

use crate::{Axis, AxisAlignedBox, ChunkLimits, MeshData};

pub use cuboid::decompose;
pub use overlap::partition_by_centroid;

/// A recentered mesh and the point it must be placed at.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshChunk {
    /// Bounding-box center of the chunk before recentering.
    pub origin: Point3<f32>,
    pub mesh: MeshData,
}

impl MeshChunk {
    /// Recenters `mesh` on its bounding-box center.
    pub(crate) fn recentered(mut mesh: MeshData) -> Self {
        let origin = mesh.recenter();
        Self { origin, mesh }
    }

    /// The chunk's geometry moved back to its original placement.
    pub fn placed(&self) -> MeshData {
        let mut mesh = self.mesh.clone();
        mesh.translate(&self.origin.coords);
        mesh
    }
}

/// Why a chunk could not be split any further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The worklist reached the configured depth limit.
    DepthLimit,
    /// The box is narrower than the minimum split extent on every axis.
    TooSmall,
    /// Splitting left the larger half with at least as many faces as the
    /// chunk had.
    NoProgress,
}

/// A chunk that was kept despite breaking a budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkViolation {
    /// Index into [`Decomposition::chunks`].
    pub chunk: usize,
    pub face_count: usize,
    /// Largest axis extent of the chunk.
    pub max_extent: f32,
    pub reason: StopReason,
}

/// Output of a chunking pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decomposition {
    pub chunks: Vec<MeshChunk>,
    pub violations: Vec<ChunkViolation>,
}

impl Decomposition {
    /// `true` when every chunk fits the requested budgets.
    pub fn is_within_limits(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total faces over all chunks.
    pub fn face_count(&self) -> usize {
        self.chunks.iter().map(|c| c.mesh.face_count()).sum()
    }

    /// Drops placement and violation data, keeping the recentered meshes.
    pub fn into_meshes(self) -> Vec<MeshData> {
        self.chunks.into_iter().map(|c| c.mesh).collect()
    }

    /// Records a finished chunk, noting a violation if `stop` is set.
    pub(crate) fn push(&mut self, mesh: MeshData, stop: Option<StopReason>) {
        let chunk = MeshChunk::recentered(mesh);
        if let Some(reason) = stop {
            self.violations.push(ChunkViolation {
                chunk: self.chunks.len(),
                face_count: chunk.mesh.face_count(),
                max_extent: chunk.mesh.bounding_box().map_or(0.0, |b| b.max_extent()),
                reason,
            });
        }
        self.chunks.push(chunk);
    }
}

/// Whether a chunk with `bounds` and `face_count` breaks a budget.
///
/// Only the axes in `axes` are checked against the span limit.
pub(crate) fn over_budget(
    bounds: &AxisAlignedBox,
    face_count: usize,
    limits: &ChunkLimits,
    axes: &[Axis],
) -> bool {
    let too_many = limits.max_face_count.is_some_and(|max| face_count > max);
    let too_wide = limits
        .max_span
        .is_some_and(|span| axes.iter().any(|&axis| bounds.extent(axis) > span));
    too_many || too_wide
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MeshVertex, TriangleFace};
    use assert_approx_eq::assert_approx_eq;

    fn make_mesh() -> MeshData {
        let mut mesh = MeshData::new();
        for p in [[2.0, 2.0, 2.0], [4.0, 2.0, 2.0], [2.0, 6.0, 2.0]] {
            mesh.push_vertex(&MeshVertex::at(Point3::new(p[0], p[1], p[2])));
        }
        mesh.push_face(TriangleFace::new(0, 0, 1, 2));
        mesh
    }

    #[test]
    fn recentered_chunk_round_trips() {
        let mesh = make_mesh();
        let chunk = MeshChunk::recentered(mesh.clone());
        assert_approx_eq!(chunk.origin.x, 3.0);
        assert_approx_eq!(chunk.origin.y, 4.0);
        assert_approx_eq!(chunk.mesh.vertices[0].x, -1.0);
        assert_eq!(chunk.placed(), mesh);
    }

    #[test]
    fn push_records_violation_index() {
        let mut out = Decomposition::default();
        out.push(make_mesh(), None);
        out.push(make_mesh(), Some(StopReason::DepthLimit));

        assert_eq!(out.len(), 2);
        assert!(!out.is_within_limits());
        assert_eq!(out.violations[0].chunk, 1);
        assert_eq!(out.violations[0].face_count, 1);
        assert_approx_eq!(out.violations[0].max_extent, 4.0);
        assert_eq!(out.face_count(), 2);
        assert_eq!(out.into_meshes().len(), 2);
    }

    #[test]
    fn budget_checks() {
        let bounds = make_mesh().bounding_box().unwrap();
        let limits = ChunkLimits::new(Some(3.0), None);
        assert!(over_budget(&bounds, 1, &limits, &Axis::ALL));
        assert!(!over_budget(&bounds, 1, &limits, &[Axis::X]));

        let limits = ChunkLimits::new(None, Some(1));
        assert!(!over_budget(&bounds, 1, &limits, &Axis::ALL));
        assert!(over_budget(&bounds, 2, &limits, &Axis::ALL));
    }
}
