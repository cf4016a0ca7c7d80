//! BSP tree container and construction.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, trace, warn};
use nalgebra::Point3;

use crate::{AxisAlignedBox, BspLimits, MeshData, RecordError, Triangle};

use super::node::BspNode;
use super::selector::{LongestAxis, SplitSelector};
use super::visitor::BspVisitor;

/// Non-fatal conditions recorded while building a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BspDiagnostic {
    /// A node still holding more faces than the leaf threshold reached the
    /// depth limit and was made a leaf.
    ForcedLeaf {
        node: usize,
        depth: u32,
        face_count: usize,
    },
}

/// An axis-aligned BSP tree over the triangles of a mesh.
///
/// Nodes are stored flat in breadth-first order with the root at index 0, so
/// every child has a larger index than its parent. Leaves slice into a
/// single face index array; a triangle crossing a split plane is listed in
/// the leaves on both sides.
///
/// # Construction
///
/// ```ignore
/// use mesh_partition::{BspLimits, BspTree};
///
/// let tree = BspTree::build(&collision_mesh, &BspLimits::default());
/// let mut records = Vec::new();
/// tree.write_nodes(&mut records)?;
/// tree.write_face_indices_u16(&mut records)?;
/// ```
///
/// # Queries
///
/// [`visit_point`](Self::visit_point) and [`visit_box`](Self::visit_box)
/// hand every leaf a query can touch to a [`BspVisitor`].
#[derive(Debug, Clone, PartialEq)]
pub struct BspTree {
    nodes: Vec<BspNode>,
    face_indices: Vec<u32>,
    diagnostics: Vec<BspDiagnostic>,
}

/// Build-time state of a node that hasn't been finalized yet.
struct PendingNode {
    index: usize,
    bounds: AxisAlignedBox,
    faces: Vec<u32>,
    depth: u32,
}

impl BspTree {
    /// Builds a tree over `mesh` using its padded bounding box and the
    /// default split selector ([`LongestAxis`]).
    ///
    /// An empty mesh gives a single empty leaf.
    pub fn build(mesh: &MeshData, limits: &BspLimits) -> Self {
        let bounds = mesh
            .padded_bounding_box(limits.boundary_epsilon)
            .unwrap_or_else(|| AxisAlignedBox::new(Point3::origin(), Point3::origin()));
        Self::build_with(mesh, bounds, limits, &LongestAxis)
    }

    /// Builds a tree over `mesh` with the root covering `bounds`.
    ///
    /// Nodes are processed one level at a time. A node becomes a leaf when it
    /// holds at most `min_leaf_face_count` faces, when its box extents sum to
    /// less than `min_leaf_box_size_sum`, or when it sits at `max_depth`. The
    /// last case is recorded in [`diagnostics`](Self::diagnostics) if the node
    /// was still over the face threshold. Any other node is halved along the
    /// axis picked by `selector`, and each face goes to every half its
    /// triangle touches.
    ///
    /// Faces referencing missing vertices are left out.
    pub fn build_with<S: SplitSelector>(
        mesh: &MeshData,
        bounds: AxisAlignedBox,
        limits: &BspLimits,
        selector: &S,
    ) -> Self {
        let triangles: Vec<Option<Triangle>> =
            mesh.faces.iter().map(|f| mesh.triangle(f)).collect();
        let faces: Vec<u32> = (0..triangles.len())
            .filter(|&i| triangles[i].is_some())
            .map(|i| i as u32)
            .collect();
        if faces.len() < triangles.len() {
            warn!(
                "{} faces reference missing vertices and were left out of the tree",
                triangles.len() - faces.len()
            );
        }

        let mut tree = Self {
            nodes: vec![BspNode::leaf(0, 0)],
            face_indices: Vec::with_capacity(faces.len()),
            diagnostics: Vec::new(),
        };
        let mut worklist = vec![PendingNode {
            index: 0,
            bounds,
            faces,
            depth: 0,
        }];

        while !worklist.is_empty() {
            let level = std::mem::take(&mut worklist);
            for pending in level {
                tree.process(pending, &triangles, limits, selector, &mut worklist);
            }
        }

        debug!(
            "built BSP tree: {} nodes, {} face indices, depth {}",
            tree.nodes.len(),
            tree.face_indices.len(),
            tree.depth()
        );
        tree
    }

    /// Finalizes one node, queueing its children if it is split.
    fn process<S: SplitSelector>(
        &mut self,
        pending: PendingNode,
        triangles: &[Option<Triangle>],
        limits: &BspLimits,
        selector: &S,
        worklist: &mut Vec<PendingNode>,
    ) {
        let PendingNode {
            index,
            bounds,
            faces,
            depth,
        } = pending;

        let small = faces.len() <= limits.min_leaf_face_count
            || bounds.extent_sum() < limits.min_leaf_box_size_sum;
        if small || depth >= limits.max_depth {
            if !small {
                warn!(
                    "node {index} at depth {depth} still has {} faces, forcing a leaf",
                    faces.len()
                );
                self.diagnostics.push(BspDiagnostic::ForcedLeaf {
                    node: index,
                    depth,
                    face_count: faces.len(),
                });
            }
            let start = self.face_indices.len() as u32;
            self.face_indices.extend_from_slice(&faces);
            self.nodes[index] = BspNode::leaf(start, faces.len() as u32);
            return;
        }

        let axis = selector.select(&bounds);
        let halves = bounds.split(axis);
        let mut faces_a = Vec::new();
        let mut faces_b = Vec::new();
        for &face in &faces {
            let Some(triangle) = &triangles[face as usize] else {
                continue;
            };
            let in_a = triangle.intersects_box(&halves.lower, limits.boundary_epsilon);
            let in_b = triangle.intersects_box(&halves.upper, limits.boundary_epsilon);
            // Rounding can leave a face touching neither half; keep it below.
            if in_a || !in_b {
                faces_a.push(face);
            }
            if in_b {
                faces_b.push(face);
            }
        }
        trace!(
            "node {index}: split {axis:?} at {}, {} -> {} + {} faces",
            halves.plane_distance,
            faces.len(),
            faces_a.len(),
            faces_b.len()
        );

        let child_a = self.enqueue(worklist, halves.lower, faces_a, depth + 1);
        let child_b = self.enqueue(worklist, halves.upper, faces_b, depth + 1);
        self.nodes[index] = BspNode::split(axis, halves.plane_distance, child_a, child_b);
    }

    /// Reserves a node slot for a non-empty child.
    fn enqueue(
        &mut self,
        worklist: &mut Vec<PendingNode>,
        bounds: AxisAlignedBox,
        faces: Vec<u32>,
        depth: u32,
    ) -> Option<usize> {
        if faces.is_empty() {
            return None;
        }
        let index = self.nodes.len();
        self.nodes.push(BspNode::leaf(0, 0));
        worklist.push(PendingNode {
            index,
            bounds,
            faces,
            depth,
        });
        Some(index)
    }

    /// All nodes in breadth-first order. Index 0 is the root.
    #[inline]
    pub fn nodes(&self) -> &[BspNode] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, index: usize) -> Option<&BspNode> {
        self.nodes.get(index)
    }

    /// The flattened face index array that leaves slice into.
    #[inline]
    pub fn face_indices(&self) -> &[u32] {
        &self.face_indices
    }

    #[inline]
    pub fn diagnostics(&self) -> &[BspDiagnostic] {
        &self.diagnostics
    }

    /// Face indices owned by `node`. Empty for split nodes.
    pub fn leaf_faces(&self, node: &BspNode) -> &[u32] {
        let start = node.face_start() as usize;
        let end = start + node.face_count() as usize;
        self.face_indices.get(start..end).unwrap_or(&[])
    }

    /// Leaves with their node index.
    pub fn leaves(&self) -> impl Iterator<Item = (usize, &BspNode)> {
        self.nodes.iter().enumerate().filter(|(_, n)| n.is_leaf())
    }

    /// Number of levels in the tree (1 for a lone root).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 1usize)];
        while let Some((index, level)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            deepest = deepest.max(level);
            stack.extend(
                [node.child_a(), node.child_b()]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, level + 1)),
            );
        }
        deepest
    }

    /// Visits every leaf whose region contains `point`.
    ///
    /// A point lying on a split plane reaches both sides.
    pub fn visit_point<V: BspVisitor>(&self, point: &Point3<f32>, visitor: &mut V) {
        self.walk(visitor, |axis, distance| {
            let v = point[axis];
            (v <= distance, v >= distance)
        });
    }

    /// Visits every leaf whose region overlaps `query`.
    pub fn visit_box<V: BspVisitor>(&self, query: &AxisAlignedBox, visitor: &mut V) {
        self.walk(visitor, |axis, distance| {
            let below = query.bottom()[axis] <= distance;
            let above = query.top()[axis] >= distance;
            (below, above)
        });
    }

    /// Depth-first walk, descending into child A and/or child B as `sides`
    /// says for each split node's axis index and plane distance.
    fn walk<V, F>(&self, visitor: &mut V, sides: F)
    where
        V: BspVisitor,
        F: Fn(usize, f32) -> (bool, bool),
    {
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            match node.axis() {
                None => visitor.visit(index, self.leaf_faces(node)),
                Some(axis) => {
                    let (below, above) = sides(axis.index(), node.plane_distance());
                    if above {
                        stack.extend(node.child_b());
                    }
                    if below {
                        stack.extend(node.child_a());
                    }
                }
            }
        }
    }

    /// Writes every node as a 16-byte record, root first.
    pub fn write_nodes<W: Write>(&self, out: &mut W) -> Result<(), RecordError> {
        for node in &self.nodes {
            node.write_to(out)?;
        }
        Ok(())
    }

    /// Writes the face index array as little-endian `u16` values.
    ///
    /// Fails on the first index above `u16::MAX`.
    pub fn write_face_indices_u16<W: Write>(&self, out: &mut W) -> Result<(), RecordError> {
        for &index in &self.face_indices {
            let value = u16::try_from(index).map_err(|_| RecordError::OutOfRange {
                field: "face_index",
                value: i64::from(index),
            })?;
            out.write_u16::<LittleEndian>(value)?;
        }
        Ok(())
    }

    /// Writes the face index array as little-endian `u32` values.
    pub fn write_face_indices_u32<W: Write>(&self, out: &mut W) -> Result<(), RecordError> {
        for &index in &self.face_indices {
            out.write_u32::<LittleEndian>(index)?;
        }
        Ok(())
    }
}
