//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: String },

    #[error("No ApplicationSet found in {path}")]
    NoApplicationSet { path: String },

    #[error("Invalid ApplicationSet (document {document}): {message}")]
    InvalidApplicationSet { document: usize, message: String },

    #[error("Invalid Application: {message}")]
    InvalidApplication { message: String },

    #[error("Invalid resource manifest: {message}")]
    InvalidManifest { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
