//! Pulling the geometry inside a box out of a mesh.
//!
//! [`extract`] clips triangles exactly against the box faces, interpolating
//! every vertex attribute at the cut points. [`extract_by_centroid`] is the
//! cheap variant that moves whole triangles by their centroid.

use log::{debug, trace};

use crate::{AxisAlignedBox, AxisPlane, BOX_EPSILON, Cuttable, MeshData, Polygon, TriangleFace};

/// Splits a mesh by a plane into `(front, back)` meshes.
///
/// Triangles spanning the plane are cut; each piece is fan triangulated and
/// keeps its material. Triangles lying in the plane go to the back. Both
/// results are condensed.
pub fn split_by_plane(mesh: &MeshData, plane: &AxisPlane) -> (MeshData, MeshData) {
    let mut pool = mesh.clone();
    pool.faces.clear();

    let mut front_faces: Vec<TriangleFace> = Vec::new();
    let mut back_faces: Vec<TriangleFace> = Vec::new();

    for face in &mesh.faces {
        let (front, back) = Polygon::from(face).cut(plane, &mut pool);
        if let Some(f) = front {
            front_faces.extend(f.faces());
        }
        if let Some(b) = back {
            back_faces.extend(b.faces());
        }
    }

    (
        pool.mesh_for_faces(&front_faces),
        pool.mesh_for_faces(&back_faces),
    )
}

/// Clips a mesh against a box, returning `(inside, outside)`.
///
/// Triangles with every corner in the box go inside untouched. Triangles
/// that don't touch the box at all go outside untouched. The rest are clipped
/// against the six box planes in turn (max-X, min-X, max-Y, min-Y, max-Z,
/// min-Z): after each pass the part beyond the plane joins `outside` and the
/// part on the box side carries on to the next plane. What survives all six
/// planes joins `inside`.
///
/// Faces with repeated indices are skipped.
pub fn extract(mesh: &MeshData, area: &AxisAlignedBox) -> (MeshData, MeshData) {
    let mut inside_faces = Vec::new();
    let mut outside_faces = Vec::new();
    let mut crossing_faces = Vec::new();

    for face in &mesh.faces {
        if face.is_degenerate() {
            continue;
        }
        let Some(triangle) = mesh.triangle(face) else {
            continue;
        };
        let corners_inside = triangle
            .vertices()
            .iter()
            .filter(|v| area.contains_point(v))
            .count();

        match corners_inside {
            3 => inside_faces.push(*face),
            0 if !triangle.intersects_box(area, BOX_EPSILON) => outside_faces.push(*face),
            _ => crossing_faces.push(*face),
        }
    }

    trace!(
        "extract buckets: {} inside, {} outside, {} crossing",
        inside_faces.len(),
        outside_faces.len(),
        crossing_faces.len()
    );

    let mut inside = mesh.mesh_for_faces(&inside_faces);
    let mut outside = mesh.mesh_for_faces(&outside_faces);
    let mut working = mesh.mesh_for_faces(&crossing_faces);

    for plane in area.bounding_planes() {
        if working.is_empty() {
            break;
        }
        let (beyond, kept) = split_by_plane(&working, &plane);
        outside.append(&beyond);
        working = kept;
    }

    inside.append(&working);
    inside.condense();
    outside.condense();
    (inside, outside)
}

/// Moves whole triangles into `(inside, outside)` by whether their centroid
/// lies in the box. No geometry is created.
pub fn extract_by_centroid(mesh: &MeshData, area: &AxisAlignedBox) -> (MeshData, MeshData) {
    let mut inside = Vec::new();
    let mut outside = Vec::new();
    for face in mesh.faces.iter().filter(|f| !f.is_degenerate()) {
        let Some(triangle) = mesh.triangle(face) else {
            continue;
        };
        if area.contains_point(&triangle.centroid()) {
            inside.push(*face);
        } else {
            outside.push(*face);
        }
    }
    (mesh.mesh_for_faces(&inside), mesh.mesh_for_faces(&outside))
}

/// Exactly clips each area out of the mesh in order.
///
/// Geometry claimed by an earlier area is not available to later ones.
/// Returns one mesh per area plus whatever no area claimed.
pub fn carve_areas(mesh: &MeshData, areas: &[AxisAlignedBox]) -> (Vec<MeshData>, MeshData) {
    let mut remainder = mesh.clone();
    let mut carved = Vec::with_capacity(areas.len());
    for (i, area) in areas.iter().enumerate() {
        let (inside, outside) = extract(&remainder, area);
        debug!("area {i} claimed {} faces", inside.face_count());
        carved.push(inside);
        remainder = outside;
    }
    (carved, remainder)
}
