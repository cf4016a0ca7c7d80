//! Error types.

use thiserror::Error;

/// Structural problems found by [`MeshData::validate`](crate::MeshData::validate).
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("{attribute} has {actual} entries but the mesh has {expected} vertices")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("face {face} repeats a vertex index")]
    DegenerateFace { face: usize },
}

/// Invalid values in a [`PartitionConfig`](crate::PartitionConfig).
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    NotNonNegative { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Failures while writing BSP records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{field} value {value} does not fit the record field")]
    OutOfRange { field: &'static str, value: i64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
