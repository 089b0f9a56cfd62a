//! Error types for fnm-mesh

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeshError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("fnm part has no elements")]
    EmptyMesh,

    #[error("element {label}: {reason}")]
    InvalidElement { label: usize, reason: String },

    #[error("element {label} has {found} nodes but the fnm part uses {expected}-node elements")]
    InconsistentElement {
        label: usize,
        expected: usize,
        found: usize,
    },

    #[error("element {element} references non-existent node {node}")]
    UnknownNode { element: usize, node: usize },

    #[error("node set '{set}' references non-existent node {node}")]
    UnknownSetNode { set: String, node: usize },

    #[error("element set '{set}' references non-existent element {element}")]
    UnknownElement { set: String, element: usize },

    #[error("invalid layup: {0}")]
    InvalidLayup(String),

    #[error("pre-delamination interface {interface} out of range (laminate has {interfaces} interfaces)")]
    InvalidInterface { interface: usize, interfaces: usize },
}

impl MeshError {
    pub(crate) fn invalid_element(label: usize, reason: impl Into<String>) -> Self {
        Self::InvalidElement {
            label,
            reason: reason.into(),
        }
    }
}
