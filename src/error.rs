//! Error types for the ocean viewer.

use thiserror::Error;

use crate::ocean::MeshError;
use crate::rendering::ShaderError;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub type Result<T> = std::result::Result<T, Error>;
