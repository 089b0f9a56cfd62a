//! Floating-node-method mesh augmentation.
//!
//! This crate provides:
//! - **Topology builder**: one-pass discovery of shell-plane edges of a
//!   single-ply brick mesh, with two floating nodes per edge
//! - **Layup**: ply-blocks merged from a per-ply angle list
//! - **Laminate expansion**: arithmetic replication of the single-ply
//!   topology through the ply-block stack, with interface nodes
//! - **Projection**: node sets and the pre-delamination element set mapped
//!   onto the laminate numbering

pub mod error;
pub mod laminate;
pub mod layup;
pub mod projection;
pub mod topology;

pub use error::{MeshError, Result};
pub use laminate::{Laminate, LaminateElement, StackIndex};
pub use layup::{Layup, LayupSpec, PlyBlock};
pub use projection::{
    PlyMembers, PlyRange, PredelamSet, ProjectedNodeSet, project_node_set, project_predelam,
};
pub use topology::{Edge, EdgeRef, Element, Node, NodeKind, Topology, TopologyBuilder};
