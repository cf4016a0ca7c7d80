//! Indexed triangle mesh with parallel per-vertex attribute arrays.
//!
//! [`MeshData`] stores positions alongside optional normals, texture
//! coordinates, vertex colors, bone ids and animated offset frames. Optional
//! arrays are either empty or exactly as long as `vertices`; every structural
//! operation here rebuilds all of them together so face indices stay valid.

mod face;
mod vertex;

use std::collections::HashMap;

use log::warn;
use nalgebra::{Point3, Vector3};

use crate::{AxisAlignedBox, MeshError, Triangle};

pub use face::TriangleFace;
pub use vertex::{ColorRgba, MeshVertex, TextureCoordinates};

/// An indexed triangle mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub texture_coordinates: Vec<TextureCoordinates>,
    pub vertex_colors: Vec<ColorRgba>,
    pub bone_ids: Vec<u8>,
    /// Per-vertex list of animated offsets, one entry per frame.
    pub animation_frames: Vec<Vec<Vector3<f32>>>,
    pub faces: Vec<TriangleFace>,
}

impl MeshData {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Gathers every attribute of vertex `index`.
    pub fn vertex(&self, index: usize) -> Option<MeshVertex> {
        let position = *self.vertices.get(index)?;
        let count = self.vertices.len();
        Some(MeshVertex {
            position,
            normal: attribute(&self.normals, count, index).unwrap_or_default(),
            texture_coordinates: attribute(&self.texture_coordinates, count, index)
                .unwrap_or_default(),
            color: attribute(&self.vertex_colors, count, index)
                .unwrap_or_default(),
            bone_id: attribute(&self.bone_ids, count, index),
            animation_offsets: attribute(&self.animation_frames, count, index)
                .unwrap_or_default(),
        })
    }

    /// Appends a vertex and returns its index.
    ///
    /// Normals, texture coordinates and colors are stored whenever the mesh
    /// carries them (an empty mesh starts carrying them). Bone ids and frames
    /// are stored when the mesh already carries them, or when this is the
    /// first vertex and the vertex has them.
    pub fn push_vertex(&mut self, vertex: &MeshVertex) -> u32 {
        let count = self.vertices.len();
        if self.normals.len() == count {
            self.normals.push(vertex.normal);
        }
        if self.texture_coordinates.len() == count {
            self.texture_coordinates.push(vertex.texture_coordinates);
        }
        if self.vertex_colors.len() == count {
            self.vertex_colors.push(vertex.color);
        }
        if carries(&self.bone_ids, count, vertex.bone_id.is_some()) {
            self.bone_ids.push(vertex.bone_id.unwrap_or_default());
        }
        let animated = !vertex.animation_offsets.is_empty();
        if carries(&self.animation_frames, count, animated) {
            self.animation_frames.push(vertex.animation_offsets.clone());
        }
        self.vertices.push(vertex.position);
        count as u32
    }

    #[inline]
    pub fn push_face(&mut self, face: TriangleFace) {
        self.faces.push(face);
    }

    /// Corner positions of a face, or `None` if an index is out of range.
    pub fn triangle(&self, face: &TriangleFace) -> Option<Triangle> {
        let [a, b, c] = face
            .indices()
            .map(|i| self.vertices.get(i as usize).copied());
        Some(Triangle::new(a?, b?, c?))
    }

    /// Bounding box of all vertices, or `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<AxisAlignedBox> {
        AxisAlignedBox::from_points(&self.vertices)
    }

    /// Bounding box grown by `epsilon` on every side.
    pub fn padded_bounding_box(&self, epsilon: f32) -> Option<AxisAlignedBox> {
        self.bounding_box().map(|b| b.expanded(epsilon))
    }

    /// Copies the given faces into a new mesh holding only the vertices they
    /// reference, numbered in order of first reference.
    ///
    /// Faces referencing a vertex that doesn't exist are dropped.
    pub fn mesh_for_faces(&self, faces: &[TriangleFace]) -> MeshData {
        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut order: Vec<usize> = Vec::new();
        let mut new_faces = Vec::with_capacity(faces.len());
        let mut dropped = 0usize;

        for face in faces {
            if !face.is_within(self.vertices.len()) {
                dropped += 1;
                continue;
            }
            let indices = face.indices().map(|old| {
                *remap.entry(old).or_insert_with(|| {
                    order.push(old as usize);
                    (order.len() - 1) as u32
                })
            });
            new_faces.push(face.with_indices(indices));
        }

        if dropped > 0 {
            warn!("dropped {dropped} faces referencing missing vertices");
        }

        let mut mesh = self.gather(&order);
        mesh.faces = new_faces;
        mesh
    }

    /// Extracts the faces using any of `materials`.
    pub fn mesh_for_materials(&self, materials: &[u32]) -> MeshData {
        let faces: Vec<TriangleFace> = self
            .faces
            .iter()
            .filter(|f| materials.contains(&f.material))
            .copied()
            .collect();
        self.mesh_for_faces(&faces)
    }

    /// Drops unreferenced vertices and renumbers the rest contiguously in
    /// order of first reference.
    pub fn condense(&mut self) {
        let faces = std::mem::take(&mut self.faces);
        *self = self.mesh_for_faces(&faces);
    }

    /// Removes faces with a repeated or out-of-range index, then condenses.
    ///
    /// Returns the number of faces removed.
    pub fn delete_invalid_triangles(&mut self) -> usize {
        let before = self.faces.len();
        let vertex_count = self.vertices.len();
        self.faces
            .retain(|f| !f.is_degenerate() && f.is_within(vertex_count));
        let removed = before - self.faces.len();
        if removed > 0 {
            warn!(
                "removed {removed} invalid triangles, face count {before} -> {}",
                self.faces.len()
            );
            self.condense();
        }
        removed
    }

    /// Orders faces by material (stable) and renumbers vertices to follow.
    pub fn sort_by_material(&mut self) {
        self.faces.sort_by_key(|f| f.material);
        self.condense();
    }

    /// Merges `other` into this mesh, offsetting its face indices.
    pub fn append(&mut self, other: &MeshData) {
        if other.vertices.is_empty() {
            return;
        }
        if self.vertices.is_empty() {
            let faces = std::mem::take(&mut self.faces);
            *self = other.clone();
            self.faces.extend(faces);
            return;
        }

        let offset = self.vertices.len() as u32;
        for index in 0..other.vertices.len() {
            if let Some(vertex) = other.vertex(index) {
                self.push_vertex(&vertex);
            }
        }
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| f.with_indices(f.indices().map(|i| i + offset))),
        );
    }

    /// Moves every vertex by `offset`.
    pub fn translate(&mut self, offset: &Vector3<f32>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Moves the mesh so its bounding-box center sits at the origin and
    /// returns the old center.
    pub fn recenter(&mut self) -> Point3<f32> {
        let center = self
            .bounding_box()
            .map(|b| b.center())
            .unwrap_or_else(Point3::origin);
        self.translate(&-center.coords);
        center
    }

    /// Checks the parallel-array and face-index invariants.
    pub fn validate(&self) -> Result<(), MeshError> {
        let count = self.vertices.len();
        for (attribute, len) in [
            ("normals", self.normals.len()),
            ("texture_coordinates", self.texture_coordinates.len()),
            ("vertex_colors", self.vertex_colors.len()),
            ("bone_ids", self.bone_ids.len()),
            ("animation_frames", self.animation_frames.len()),
        ] {
            check_length(attribute, len, count)?;
        }

        for (face_index, face) in self.faces.iter().enumerate() {
            if let Some(&index) = face.indices().iter().find(|&&i| i as usize >= count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: count,
                });
            }
            if face.is_degenerate() {
                return Err(MeshError::DegenerateFace { face: face_index });
            }
        }
        Ok(())
    }

    /// New mesh holding the vertices at `indices`, in that order, and no faces.
    fn gather(&self, indices: &[usize]) -> MeshData {
        let count = self.vertices.len();
        let pick = |len: usize| len == count && count > 0;

        MeshData {
            vertices: indices.iter().map(|&i| self.vertices[i]).collect(),
            normals: if pick(self.normals.len()) {
                indices.iter().map(|&i| self.normals[i]).collect()
            } else {
                Vec::new()
            },
            texture_coordinates: if pick(self.texture_coordinates.len()) {
                indices
                    .iter()
                    .map(|&i| self.texture_coordinates[i])
                    .collect()
            } else {
                Vec::new()
            },
            vertex_colors: if pick(self.vertex_colors.len()) {
                indices.iter().map(|&i| self.vertex_colors[i]).collect()
            } else {
                Vec::new()
            },
            bone_ids: if pick(self.bone_ids.len()) {
                indices.iter().map(|&i| self.bone_ids[i]).collect()
            } else {
                Vec::new()
            },
            animation_frames: if pick(self.animation_frames.len()) {
                indices
                    .iter()
                    .map(|&i| self.animation_frames[i].clone())
                    .collect()
            } else {
                Vec::new()
            },
            faces: Vec::new(),
        }
    }
}

/// Value of an optional attribute array, if the mesh carries it.
fn attribute<T: Clone>(values: &[T], vertex_count: usize, index: usize) -> Option<T> {
    if values.len() == vertex_count {
        values.get(index).cloned()
    } else {
        None
    }
}

/// Whether a push should extend an optional array that isn't stored by default.
fn carries<T>(values: &[T], vertex_count: usize, vertex_has_value: bool) -> bool {
    if vertex_count == 0 {
        vertex_has_value
    } else {
        !values.is_empty() && values.len() == vertex_count
    }
}

fn check_length(attribute: &'static str, actual: usize, expected: usize) -> Result<(), MeshError> {
    if actual == 0 || actual == expected {
        Ok(())
    } else {
        Err(MeshError::AttributeLength {
            attribute,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn make_vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex {
            position: Point3::new(x, y, z),
            normal: Vector3::new(0.0, 0.0, 1.0),
            texture_coordinates: TextureCoordinates::new(x, y),
            color: ColorRgba::new(x as u8, y as u8, z as u8, 255),
            bone_id: None,
            animation_offsets: Vec::new(),
        }
    }

    /// Two triangles sharing an edge plus an unused vertex at index 2.
    fn make_quad() -> MeshData {
        let mut mesh = MeshData::new();
        mesh.push_vertex(&make_vertex(0.0, 0.0, 0.0));
        mesh.push_vertex(&make_vertex(1.0, 0.0, 0.0));
        mesh.push_vertex(&make_vertex(9.0, 9.0, 9.0));
        mesh.push_vertex(&make_vertex(1.0, 1.0, 0.0));
        mesh.push_vertex(&make_vertex(0.0, 1.0, 0.0));
        mesh.push_face(TriangleFace::new(1, 0, 1, 3));
        mesh.push_face(TriangleFace::new(0, 0, 3, 4));
        mesh
    }

    #[test]
    fn push_vertex_fills_parallel_arrays() {
        let mesh = make_quad();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.normals.len(), 5);
        assert_eq!(mesh.texture_coordinates.len(), 5);
        assert_eq!(mesh.vertex_colors.len(), 5);
        assert!(mesh.bone_ids.is_empty());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn push_vertex_with_bones() {
        let mut mesh = MeshData::new();
        let mut v = make_vertex(0.0, 0.0, 0.0);
        v.bone_id = Some(3);
        mesh.push_vertex(&v);
        mesh.push_vertex(&make_vertex(1.0, 0.0, 0.0));
        assert_eq!(mesh.bone_ids, vec![3, 0]);
    }

    #[test]
    fn vertex_round_trips_attributes() {
        let mesh = make_quad();
        let v = mesh.vertex(3).unwrap();
        assert_eq!(v.position, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(v.color, ColorRgba::new(1, 1, 0, 255));
        assert!(mesh.vertex(5).is_none());
    }

    #[test]
    fn condense_drops_unused_vertex() {
        let mut mesh = make_quad();
        mesh.condense();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces[0].indices(), [0, 1, 2]);
        assert_eq!(mesh.faces[1].indices(), [0, 2, 3]);
        assert_eq!(mesh.vertices[2], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.vertex_colors[2], ColorRgba::new(1, 1, 0, 255));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn condense_is_idempotent() {
        let mut once = make_quad();
        once.condense();
        let mut twice = once.clone();
        twice.condense();
        assert_eq!(once, twice);
    }

    #[test]
    fn mesh_for_faces_subsets() {
        let mesh = make_quad();
        let sub = mesh.mesh_for_faces(&mesh.faces[1..]);
        assert_eq!(sub.face_count(), 1);
        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.faces[0], TriangleFace::new(0, 0, 1, 2));
        assert_eq!(sub.vertices[2], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn mesh_for_faces_skips_out_of_range() {
        let mesh = make_quad();
        let sub = mesh.mesh_for_faces(&[TriangleFace::new(0, 0, 1, 42)]);
        assert!(sub.is_empty());
        assert_eq!(sub.vertex_count(), 0);
    }

    #[test]
    fn mesh_for_materials_filters() {
        let mesh = make_quad();
        let sub = mesh.mesh_for_materials(&[1]);
        assert_eq!(sub.face_count(), 1);
        assert_eq!(sub.faces[0].material, 1);
    }

    #[test]
    fn delete_invalid_triangles_repairs() {
        let mut mesh = make_quad();
        mesh.push_face(TriangleFace::new(0, 1, 1, 3));
        mesh.push_face(TriangleFace::new(0, 0, 1, 99));
        assert!(mesh.validate().is_err());

        assert_eq!(mesh.delete_invalid_triangles(), 2);
        assert_eq!(mesh.face_count(), 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn delete_invalid_triangles_leaves_valid_mesh_alone() {
        let mut mesh = make_quad();
        let before = mesh.clone();
        assert_eq!(mesh.delete_invalid_triangles(), 0);
        assert_eq!(mesh, before);
    }

    #[test]
    fn sort_by_material_orders_faces_and_vertices() {
        let mut mesh = make_quad();
        mesh.sort_by_material();
        assert_eq!(mesh.faces[0].material, 0);
        assert_eq!(mesh.faces[1].material, 1);
        assert_eq!(mesh.faces[0].indices(), [0, 1, 2]);
        // Old vertex 1 is first referenced by the second face.
        assert_eq!(mesh.vertices[3], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn append_offsets_indices() {
        let mut a = make_quad();
        a.condense();
        let b = a.clone();
        a.append(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.face_count(), 4);
        assert_eq!(a.faces[2].indices(), [4, 5, 6]);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn append_into_empty_copies() {
        let mut a = MeshData::new();
        let b = make_quad();
        a.append(&b);
        assert_eq!(a, b);
    }

    #[test]
    fn recenter_moves_to_origin() {
        let mut mesh = make_quad();
        mesh.condense();
        let center = mesh.recenter();
        assert_approx_eq!(center.x, 0.5);
        assert_approx_eq!(center.y, 0.5);
        let bounds = mesh.bounding_box().unwrap();
        assert_approx_eq!(bounds.center().x, 0.0);
        assert_approx_eq!(bounds.center().y, 0.0);
    }

    #[test]
    fn validate_reports_length_mismatch() {
        let mut mesh = make_quad();
        mesh.normals.pop();
        assert_eq!(
            mesh.validate(),
            Err(MeshError::AttributeLength {
                attribute: "normals",
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn padded_bounding_box_grows() {
        let mesh = make_quad();
        let b = mesh.padded_bounding_box(0.5).unwrap();
        assert_approx_eq!(b.bottom().x, -0.5);
        assert_approx_eq!(b.top().z, 9.5);
        assert!(MeshData::new().bounding_box().is_none());
    }
}
