//! Centroid-overlap chunking.

use log::{debug, warn};
use nalgebra::Point3;

use super::{Decomposition, StopReason, over_budget};
use crate::{Axis, AxisAlignedBox, ChunkLimits, MeshData, TriangleFace};

const PLANAR_AXES: [Axis; 2] = [Axis::X, Axis::Y];

struct PendingChunk {
    bounds: AxisAlignedBox,
    faces: Vec<(TriangleFace, Point3<f32>)>,
    depth: u32,
}

/// Splits `mesh` into chunks within `limits` without cutting any triangle.
///
/// Boxes are halved along the longer of X and Y, each half reaching
/// `limits.overlap_margin` past the split plane. A triangle goes to every
/// half whose X/Y range holds its centroid, so triangles near a split may be
/// copied into both chunks. The span budget is checked against the X and Y
/// extent of the chunk's box. No vertices are created.
pub fn partition_by_centroid(mesh: &MeshData, limits: &ChunkLimits) -> Decomposition {
    let mut out = Decomposition::default();
    let Some(bounds) = mesh.padded_bounding_box(limits.boundary_epsilon) else {
        return out;
    };

    let faces: Vec<(TriangleFace, Point3<f32>)> = mesh
        .faces
        .iter()
        .filter(|f| !f.is_degenerate())
        .filter_map(|f| mesh.triangle(f).map(|t| (*f, t.centroid())))
        .collect();

    let mut stack = vec![PendingChunk {
        bounds,
        faces,
        depth: 0,
    }];

    while let Some(PendingChunk {
        bounds,
        faces,
        depth,
    }) = stack.pop()
    {
        if faces.is_empty() {
            continue;
        }

        if !over_budget(&bounds, faces.len(), limits, &PLANAR_AXES) {
            out.push(mesh.mesh_for_faces(&face_list(&faces)), None);
            continue;
        }

        let planar_extent = bounds.extent(Axis::X).max(bounds.extent(Axis::Y));
        let stop = if depth >= limits.max_depth {
            warn!(
                "chunk with {} faces hit depth limit {}",
                faces.len(),
                limits.max_depth
            );
            Some(StopReason::DepthLimit)
        } else if planar_extent < limits.min_split_extent {
            warn!("chunk with {} faces is too small to split", faces.len());
            Some(StopReason::TooSmall)
        } else {
            None
        };
        if stop.is_some() {
            out.push(mesh.mesh_for_faces(&face_list(&faces)), stop);
            continue;
        }

        let axis = if bounds.extent(Axis::X) > bounds.extent(Axis::Y) {
            Axis::X
        } else {
            Axis::Y
        };
        let halves = bounds.split_with_overlap(axis, limits.overlap_margin);

        for half in [halves.upper, halves.lower] {
            let selected: Vec<(TriangleFace, Point3<f32>)> = faces
                .iter()
                .filter(|(_, centroid)| contains_planar(&half, centroid))
                .copied()
                .collect();
            stack.push(PendingChunk {
                bounds: half,
                faces: selected,
                depth: depth + 1,
            });
        }
    }

    debug!(
        "partitioned {} faces into {} chunks ({} faces after duplication)",
        mesh.face_count(),
        out.len(),
        out.face_count()
    );
    out
}

fn face_list(faces: &[(TriangleFace, Point3<f32>)]) -> Vec<TriangleFace> {
    faces.iter().map(|(f, _)| *f).collect()
}

fn contains_planar(bounds: &AxisAlignedBox, point: &Point3<f32>) -> bool {
    PLANAR_AXES.iter().all(|axis| {
        let i = axis.index();
        point[i] >= bounds.bottom()[i] && point[i] <= bounds.top()[i]
    })
}
