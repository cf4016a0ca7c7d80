//! Partitioning thresholds.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Thresholds for BSP generation and chunk decomposition.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// A BSP node with this many faces or fewer becomes a leaf.
    pub bsp_min_leaf_face_count: usize,

    /// A BSP node whose box extents sum to less than this becomes a leaf.
    pub bsp_min_leaf_box_size_sum: f32,

    /// Deepest level a BSP node may be split at.
    pub bsp_max_depth: u32,

    /// Padding applied to computed bounding boxes and intersection tests.
    pub boundary_epsilon: f32,

    /// Face budget per chunk, if any.
    pub max_faces_per_chunk: Option<usize>,

    /// Largest allowed extent of a chunk along any axis, if any.
    pub max_chunk_span: Option<f32>,

    /// Distance each half-box reaches past the split plane in overlap chunking.
    pub chunk_overlap_margin: f32,

    /// Boxes narrower than this on every axis are not split again. Measured in
    /// world units, like the BSP box size floor.
    pub min_chunk_split_extent: f32,

    /// Deepest level a chunk may be split at.
    pub max_chunk_depth: u32,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            bsp_min_leaf_face_count: 50,
            bsp_min_leaf_box_size_sum: 1.0,
            bsp_max_depth: 32,
            boundary_epsilon: 0.01,
            max_faces_per_chunk: Some(21_000),
            max_chunk_span: Some(1_000.0),
            chunk_overlap_margin: 0.0,
            min_chunk_split_extent: 1.0,
            max_chunk_depth: 32,
        }
    }
}

impl PartitionConfig {
    /// Checks that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("bsp_min_leaf_box_size_sum", self.bsp_min_leaf_box_size_sum)?;
        non_negative("boundary_epsilon", self.boundary_epsilon)?;
        non_negative("chunk_overlap_margin", self.chunk_overlap_margin)?;
        non_negative("min_chunk_split_extent", self.min_chunk_split_extent)?;
        if let Some(span) = self.max_chunk_span {
            non_negative("max_chunk_span", span)?;
            if span == 0.0 {
                return Err(ConfigError::Zero {
                    field: "max_chunk_span",
                });
            }
        }
        if self.max_faces_per_chunk == Some(0) {
            return Err(ConfigError::Zero {
                field: "max_faces_per_chunk",
            });
        }
        if self.bsp_max_depth == 0 {
            return Err(ConfigError::Zero {
                field: "bsp_max_depth",
            });
        }
        Ok(())
    }

    /// Options for [`BspTree::build`](crate::BspTree::build).
    pub fn bsp_limits(&self) -> BspLimits {
        BspLimits {
            min_leaf_face_count: self.bsp_min_leaf_face_count,
            min_leaf_box_size_sum: self.bsp_min_leaf_box_size_sum,
            max_depth: self.bsp_max_depth,
            boundary_epsilon: self.boundary_epsilon,
        }
    }

    /// Options for [`decompose`](crate::decompose) and
    /// [`partition_by_centroid`](crate::partition_by_centroid).
    pub fn chunk_limits(&self) -> ChunkLimits {
        ChunkLimits {
            max_span: self.max_chunk_span,
            max_face_count: self.max_faces_per_chunk,
            boundary_epsilon: self.boundary_epsilon,
            overlap_margin: self.chunk_overlap_margin,
            min_split_extent: self.min_chunk_split_extent,
            max_depth: self.max_chunk_depth,
        }
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotNonNegative { field, value })
    }
}

/// Termination thresholds for BSP generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspLimits {
    pub min_leaf_face_count: usize,
    pub min_leaf_box_size_sum: f32,
    pub max_depth: u32,
    pub boundary_epsilon: f32,
}

impl Default for BspLimits {
    fn default() -> Self {
        PartitionConfig::default().bsp_limits()
    }
}

/// Budgets and termination thresholds for chunk decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkLimits {
    pub max_span: Option<f32>,
    pub max_face_count: Option<usize>,
    pub boundary_epsilon: f32,
    pub overlap_margin: f32,
    pub min_split_extent: f32,
    pub max_depth: u32,
}

impl ChunkLimits {
    /// Limits with only the given budgets and default termination thresholds.
    pub fn new(max_span: Option<f32>, max_face_count: Option<usize>) -> Self {
        Self {
            max_span,
            max_face_count,
            ..Self::default()
        }
    }
}

impl Default for ChunkLimits {
    fn default() -> Self {
        PartitionConfig::default().chunk_limits()
    }
}
