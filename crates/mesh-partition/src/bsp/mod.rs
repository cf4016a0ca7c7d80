//! Axis-aligned Binary Space Partitioning over mesh triangles.
//!
//! The tree is built for a collision mesh and stored in the flat layout a
//! world-model file expects: a node array in breadth-first order plus one
//! face index array that leaves slice into.
//!
//! # Example
//!
//! ```ignore
//! use mesh_partition::bsp::{BspTree, CollectingVisitor};
//! use mesh_partition::BspLimits;
//! use nalgebra::Point3;
//!
//! let tree = BspTree::build(&collision_mesh, &BspLimits::default());
//!
//! // Triangles near a point
//! let mut visitor = CollectingVisitor::new();
//! tree.visit_point(&Point3::new(0.0, 0.0, 10.0), &mut visitor);
//! let candidates = visitor.into_unique_faces();
//!
//! // Serialized records
//! let mut out = Vec::new();
//! tree.write_nodes(&mut out)?;
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: node array, face index array and build diagnostics
//! - [`BspNode`]: one finished node, leaf or split
//! - [`SplitSelector`]: strategy trait for choosing split axes
//! - [`BspVisitor`]: visitor trait for query results

mod node;
mod selector;
mod tree;
mod visitor;

// Re-export main types
pub use node::{BspNode, NO_CHILD, NODE_RECORD_SIZE, NodeFlag};
pub use selector::{LongestAxis, SplitSelector};
pub use tree::{BspDiagnostic, BspTree};
pub use visitor::{BspVisitor, CollectingVisitor, FnVisitor};
