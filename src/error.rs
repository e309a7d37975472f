// Error types for the fallible edges of the desktop: config, storage, paint export.
// Window manager commands themselves never fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed store data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store root is not a JSON object")]
    NotAnObject,
}

#[derive(Debug, Error)]
pub enum PaintError {
    #[error("invalid color {0:?}, expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Why a window's body could not be mounted. The window keeps its chrome.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no content registered for component key {0:?}")]
    Unregistered(String),
    #[error("invalid props for {key}: {source}")]
    Props {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
