//! Exact-clip cuboid decomposition.

use log::{debug, trace, warn};

use super::{Decomposition, StopReason, over_budget};
use crate::{Axis, ChunkLimits, MeshData, extract};

/// Splits `mesh` into chunks within `limits` by repeatedly bisecting the
/// padded bounding box along its longest axis and exactly clipping the
/// geometry into the two halves.
///
/// Cut fragments are re-triangulated, so a bisection can leave a half with
/// more faces than the chunk it came from. A chunk that only breaks the face
/// budget stops splitting once its larger half keeps at least as many faces.
///
/// Invalid faces are removed first. Every chunk is recentered; its
/// [`origin`](super::MeshChunk::origin) holds the offset needed to put it
/// back. Chunks without faces are dropped.
pub fn decompose(mut mesh: MeshData, limits: &ChunkLimits) -> Decomposition {
    mesh.delete_invalid_triangles();

    let mut out = Decomposition::default();
    let mut stack = vec![(mesh, 0u32)];

    while let Some((current, depth)) = stack.pop() {
        if current.is_empty() {
            continue;
        }
        let Some(bounds) = current.bounding_box() else {
            continue;
        };

        if !over_budget(&bounds, current.face_count(), limits, &Axis::ALL) {
            out.push(current, None);
            continue;
        }

        if depth >= limits.max_depth {
            warn!(
                "chunk with {} faces hit depth limit {}, keeping it over budget",
                current.face_count(),
                limits.max_depth
            );
            out.push(current, Some(StopReason::DepthLimit));
            continue;
        }
        if bounds.max_extent() < limits.min_split_extent {
            warn!(
                "chunk with {} faces is too small to split (extent {})",
                current.face_count(),
                bounds.max_extent()
            );
            out.push(current, Some(StopReason::TooSmall));
            continue;
        }

        let padded = bounds.expanded(limits.boundary_epsilon);
        let halves = padded.split(padded.longest_axis());
        let (lower, upper) = extract(&current, &halves.lower);
        trace!(
            "depth {depth}: split {:?} at {} into {} + {} faces",
            halves.axis,
            halves.plane_distance,
            lower.face_count(),
            upper.face_count()
        );

        let larger = lower.face_count().max(upper.face_count());
        if larger >= current.face_count() && !over_budget(&bounds, 0, limits, &Axis::ALL) {
            warn!(
                "splitting a chunk with {} faces gave a half with {}, keeping it over budget",
                current.face_count(),
                larger
            );
            out.push(current, Some(StopReason::NoProgress));
            continue;
        }

        stack.push((upper, depth + 1));
        stack.push((lower, depth + 1));
    }

    debug!(
        "decomposed into {} chunks ({} over budget)",
        out.len(),
        out.violations.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MeshVertex, TriangleFace};
    use assert_approx_eq::assert_approx_eq;
    use nalgebra::Point3;

    /// Flat `n` by `n` grid of unit quads on z = 0, two triangles each.
    fn make_grid(n: u32) -> MeshData {
        let mut mesh = MeshData::new();
        for y in 0..=n {
            for x in 0..=n {
                mesh.push_vertex(&MeshVertex::at(Point3::new(x as f32, y as f32, 0.0)));
            }
        }
        let row = n + 1;
        for y in 0..n {
            for x in 0..n {
                let i = y * row + x;
                mesh.push_face(TriangleFace::new(0, i, i + 1, i + row + 1));
                mesh.push_face(TriangleFace::new(0, i, i + row + 1, i + row));
            }
        }
        mesh
    }

    fn total_area(meshes: &[MeshData]) -> f32 {
        meshes
            .iter()
            .flat_map(|m| m.faces.iter().filter_map(|f| m.triangle(f)))
            .map(|t| t.area())
            .sum()
    }

    #[test]
    fn within_budget_is_single_chunk() {
        let mesh = make_grid(2);
        let out = decompose(mesh, &ChunkLimits::new(Some(10.0), Some(100)));
        assert_eq!(out.len(), 1);
        assert!(out.is_within_limits());
        assert_approx_eq!(out.chunks[0].origin.x, 1.0);
        assert_approx_eq!(out.chunks[0].origin.y, 1.0);
    }

    #[test]
    fn face_budget_is_met() {
        let out = decompose(make_grid(4), &ChunkLimits::new(None, Some(10)));

        assert!(out.is_within_limits());
        assert!(out.len() > 1);
        for chunk in &out.chunks {
            assert!(chunk.mesh.face_count() <= 10);
            assert!(chunk.mesh.validate().is_ok());
        }
        let meshes = out.into_meshes();
        assert_approx_eq!(total_area(&meshes), 16.0, 1e-3);
    }

    #[test]
    fn span_budget_is_met() {
        let out = decompose(make_grid(4), &ChunkLimits::new(Some(1.5), None));

        assert!(out.is_within_limits());
        assert_eq!(out.len(), 16);
        assert_eq!(out.face_count(), 32);
        for chunk in &out.chunks {
            let bounds = chunk.mesh.bounding_box().unwrap();
            for axis in Axis::ALL {
                assert!(bounds.extent(axis) <= 1.5);
            }
        }
    }

    #[test]
    fn placed_chunks_cover_original_bounds() {
        let out = decompose(make_grid(4), &ChunkLimits::new(Some(2.5), None));
        let placed: Vec<MeshData> = out.chunks.iter().map(|c| c.placed()).collect();
        let mut all = MeshData::new();
        for mesh in &placed {
            all.append(mesh);
        }
        let bounds = all.bounding_box().unwrap();
        assert_approx_eq!(bounds.bottom().x, 0.0, 1e-4);
        assert_approx_eq!(bounds.top().y, 4.0, 1e-4);
    }

    #[test]
    fn depth_limit_keeps_chunks_over_budget() {
        let limits = ChunkLimits {
            max_depth: 2,
            ..ChunkLimits::new(None, Some(1))
        };
        let out = decompose(make_grid(4), &limits);

        assert_eq!(out.len(), 4);
        assert_eq!(out.violations.len(), 4);
        for violation in &out.violations {
            assert_eq!(violation.reason, StopReason::DepthLimit);
            assert_eq!(violation.face_count, 8);
        }
        assert_eq!(out.face_count(), 32);
    }

    #[test]
    fn stacked_triangles_stop_without_progress() {
        let mut mesh = MeshData::new();
        for _ in 0..20 {
            let a = mesh.push_vertex(&MeshVertex::at(Point3::new(0.0, 0.0, 0.0)));
            let b = mesh.push_vertex(&MeshVertex::at(Point3::new(1.0, 0.0, 0.0)));
            let c = mesh.push_vertex(&MeshVertex::at(Point3::new(0.0, 1.0, 0.0)));
            mesh.push_face(TriangleFace::new(0, a, b, c));
        }
        let limits = ChunkLimits {
            min_split_extent: 0.01,
            ..ChunkLimits::new(None, Some(5))
        };
        let out = decompose(mesh, &limits);

        assert_eq!(out.len(), 1);
        assert_eq!(out.violations.len(), 1);
        assert_eq!(out.violations[0].reason, StopReason::NoProgress);
        assert_eq!(out.violations[0].face_count, 20);
        let meshes = out.into_meshes();
        assert_approx_eq!(total_area(&meshes), 10.0, 1e-3);
    }

    #[test]
    fn single_large_triangle_stays_bounded() {
        let mut mesh = MeshData::new();
        let a = mesh.push_vertex(&MeshVertex::at(Point3::new(0.0, 0.0, 0.0)));
        let b = mesh.push_vertex(&MeshVertex::at(Point3::new(10.0, 0.0, 0.0)));
        let c = mesh.push_vertex(&MeshVertex::at(Point3::new(0.0, 10.0, 0.0)));
        mesh.push_face(TriangleFace::new(0, a, b, c));
        let out = decompose(mesh, &ChunkLimits::new(Some(5.0), Some(2)));

        assert!(out.len() < 100);
        for chunk in &out.chunks {
            let bounds = chunk.mesh.bounding_box().unwrap();
            assert!(bounds.max_extent() <= 5.0);
        }
        let meshes = out.into_meshes();
        assert_approx_eq!(total_area(&meshes), 50.0, 1e-2);
    }

    #[test]
    fn tiny_cluster_stops_too_small() {
        let mut mesh = MeshData::new();
        for i in 0..10 {
            let x = i as f32 * 0.0005;
            let a = mesh.push_vertex(&MeshVertex::at(Point3::new(x, 0.0, 0.0)));
            let b = mesh.push_vertex(&MeshVertex::at(Point3::new(x + 0.001, 0.0, 0.0)));
            let c = mesh.push_vertex(&MeshVertex::at(Point3::new(x, 0.001, 0.0)));
            mesh.push_face(TriangleFace::new(0, a, b, c));
        }
        let limits = ChunkLimits {
            min_split_extent: 0.01,
            ..ChunkLimits::new(None, Some(2))
        };
        let out = decompose(mesh, &limits);

        assert_eq!(out.len(), 1);
        assert_eq!(out.violations.len(), 1);
        assert_eq!(out.violations[0].reason, StopReason::TooSmall);
        assert_eq!(out.violations[0].face_count, 10);
    }

    #[test]
    fn empty_mesh_yields_nothing() {
        let out = decompose(MeshData::new(), &ChunkLimits::new(Some(1.0), Some(1)));
        assert!(out.is_empty());
        assert!(out.is_within_limits());
    }
}
