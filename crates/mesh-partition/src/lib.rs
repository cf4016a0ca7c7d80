//! Spatial partitioning of indexed triangle meshes.
//!
//! - [`BspTree`]: axis-aligned BSP over a collision mesh, stored as flat
//!   node and face index arrays ready to serialize.
//! - [`decompose`]: exact-clip cuboid chunking under face and span budgets.
//! - [`partition_by_centroid`]: chunking that duplicates boundary triangles
//!   instead of cutting them.
//! - [`extract`]: exact clipping of a mesh against a box, interpolating every
//!   vertex attribute at the cuts.

mod aabb;
mod config;
mod cuttable;
mod error;
mod extract;
mod plane;
mod polygon;
mod triangle;

pub mod bsp;
pub mod chunk;
pub mod mesh;

pub use aabb::{Axis, AxisAlignedBox, BOX_EPSILON, SplitBox};
pub use bsp::{BspDiagnostic, BspNode, BspTree};
pub use chunk::{
    ChunkViolation, Decomposition, MeshChunk, StopReason, decompose, partition_by_centroid,
};
pub use config::{BspLimits, ChunkLimits, PartitionConfig};
pub use cuttable::Cuttable;
pub use error::{ConfigError, MeshError, RecordError};
pub use extract::{carve_areas, extract, extract_by_centroid, split_by_plane};
pub use mesh::{ColorRgba, MeshData, MeshVertex, TextureCoordinates, TriangleFace};
pub use plane::{AxisPlane, Classification, PLANE_EPSILON, PlaneSide};
pub use polygon::Polygon;
pub use triangle::Triangle;
