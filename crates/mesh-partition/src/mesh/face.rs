//! Indexed triangle faces.

/// Three vertex indices plus a material id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TriangleFace {
    pub material: u32,
    pub v1: u32,
    pub v2: u32,
    pub v3: u32,
}

impl TriangleFace {
    pub const fn new(material: u32, v1: u32, v2: u32, v3: u32) -> Self {
        Self {
            material,
            v1,
            v2,
            v3,
        }
    }

    #[inline]
    pub fn indices(&self) -> [u32; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// Same material, new indices.
    #[inline]
    pub fn with_indices(&self, [v1, v2, v3]: [u32; 3]) -> Self {
        Self {
            v1,
            v2,
            v3,
            ..*self
        }
    }

    /// `true` when two corners share an index.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.v1 == self.v2 || self.v2 == self.v3 || self.v1 == self.v3
    }

    pub fn contains_index(&self, index: u32) -> bool {
        self.indices().contains(&index)
    }

    /// `true` when every index is below `vertex_count`.
    pub fn is_within(&self, vertex_count: usize) -> bool {
        self.indices().iter().all(|&i| (i as usize) < vertex_count)
    }
}
