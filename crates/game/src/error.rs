//! Load errors.
//!
//! Every asset failure ends up here. None of them are fatal: the caller logs
//! the error and the walkthrough carries on without the asset.

use walkthrough_physics::ProxyError;

/// Error type for asset and configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Missing position data for mesh: {0}")]
    MissingPositions(String),

    #[error("Invalid collision proxy: {0}")]
    Proxy(#[from] ProxyError),
}
