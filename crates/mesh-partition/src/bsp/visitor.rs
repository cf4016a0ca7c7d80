//! Visitor pattern for BSP tree queries.
//!
//! Visitors receive the leaves a query reaches without coupling the query
//! walk to what the caller does with them.

/// Visitor for processing leaves reached by a BSP tree query.
///
/// Common uses include:
/// - Gathering candidate triangles for collision tests
/// - Counting or marking leaves
pub trait BspVisitor {
    /// Called once per leaf reached. `faces` are the leaf's triangle indices
    /// into the source mesh.
    fn visit(&mut self, node: usize, faces: &[u32]);
}

/// A simple visitor that collects the face indices of every visited leaf.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    leaves: Vec<usize>,
    faces: Vec<u32>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node indices of the visited leaves, in visit order.
    pub fn leaves(&self) -> &[usize] {
        &self.leaves
    }

    /// Face indices in visit order. A face stored in several leaves appears
    /// once per leaf.
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// Returns the collected face indices, sorted and without repeats.
    pub fn into_unique_faces(self) -> Vec<u32> {
        let mut faces = self.faces;
        faces.sort_unstable();
        faces.dedup();
        faces
    }
}

impl BspVisitor for CollectingVisitor {
    fn visit(&mut self, node: usize, faces: &[u32]) {
        self.leaves.push(node);
        self.faces.extend_from_slice(faces);
    }
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F>
where
    F: FnMut(usize, &[u32]),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(usize, &[u32]),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> BspVisitor for FnVisitor<F>
where
    F: FnMut(usize, &[u32]),
{
    fn visit(&mut self, node: usize, faces: &[u32]) {
        (self.func)(node, faces);
    }
}
