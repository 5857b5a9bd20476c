//! Error types for credential lookup and manifest rendering

use appset_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Repository and rendering errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("Invalid repository configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid repository URL: {url} - {reason}")]
    InvalidRepositoryUrl { url: String, reason: String },

    // ============ Source Errors ============
    #[error("Source path not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read source directory {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    // ============ Tool Errors ============
    #[error("`{tool}` is not installed or not on PATH")]
    ToolNotFound { tool: String },

    #[error("`{command}` failed: {stderr}")]
    ToolFailed { command: String, stderr: String },

    // ============ Manifest Errors ============
    #[error("Invalid manifests from {origin}: {source}")]
    InvalidManifests {
        origin: String,
        #[source]
        source: CoreError,
    },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RepoError>;
