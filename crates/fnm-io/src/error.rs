//! Error types for fnm-io

use fnm_inp::ParseError;
use fnm_mesh::MeshError;
use fnm_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Input ended while waiting for: {0}")]
    InputClosed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IoError {
    pub fn invalid_parameter(details: impl Into<String>) -> Self {
        Self::InvalidParameter(details.into())
    }
}
