//! CLI error types with exit code handling
//!
//! Every library error surfaces through [`CliError`], which decides the
//! process exit code.

use appset_core::CoreError;
use appset_engine::EngineError;
use appset_repo::RepoError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Reported as the bare message, without diagnostic decoration
    #[error("unknown output format: {format}")]
    UnknownOutputFormat { format: String },

    /// ApplicationSet manifest could not be loaded
    #[error(transparent)]
    #[diagnostic(code(appset::cli::manifest))]
    Manifest(#[from] CoreError),

    /// Generator evaluation or template expansion failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to generate manifests for Application {app}")]
    #[diagnostic(code(appset::cli::render))]
    Render {
        app: String,
        #[source]
        source: RepoError,
    },

    #[error("failed to write output: {message}")]
    #[diagnostic(code(appset::cli::io))]
    Io { message: String },

    #[error("failed to serialize output: {message}")]
    #[diagnostic(code(appset::cli::output))]
    Serialize { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::UnknownOutputFormat { .. } => exit_codes::USAGE_ERROR,
            CliError::Manifest(err) => core_exit_code(err),
            CliError::Engine(err) => match err {
                EngineError::Core(core) => core_exit_code(core),
                EngineError::InvalidChildCount { .. }
                | EngineError::NestingTooDeep { .. }
                | EngineError::DuplicateMergeKey { .. }
                | EngineError::GoTemplateUnsupported => exit_codes::CONFIG_ERROR,
                EngineError::UnresolvedParameter { .. }
                | EngineError::DuplicateTemplateKey { .. }
                | EngineError::InvalidApplication { .. } => exit_codes::EXPANSION_ERROR,
            },
            CliError::Render { source, .. } => match source {
                RepoError::Io(_) => exit_codes::IO_ERROR,
                _ => exit_codes::RENDER_ERROR,
            },
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Serialize { .. } => exit_codes::ERROR,
        }
    }

    /// Usage mistakes are printed as a single plain line
    pub fn is_usage(&self) -> bool {
        matches!(self, CliError::UnknownOutputFormat { .. })
    }

    pub fn render(app: &str, source: RepoError) -> Self {
        Self::Render {
            app: app.to_string(),
            source,
        }
    }
}

fn core_exit_code(err: &CoreError) -> u8 {
    match err {
        CoreError::ManifestNotFound { .. } | CoreError::Io(_) => exit_codes::IO_ERROR,
        _ => exit_codes::CONFIG_ERROR,
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialize {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialize {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = CliError::UnknownOutputFormat {
            format: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "unknown output format: foo");
        assert_eq!(err.exit_code(), exit_codes::USAGE_ERROR);
        assert!(err.is_usage());
        assert!(err.help().is_none());

        let err = CliError::from(CoreError::ManifestNotFound {
            path: "missing.yaml".to_string(),
        });
        assert_eq!(err.exit_code(), exit_codes::IO_ERROR);

        let err = CliError::from(EngineError::GoTemplateUnsupported);
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);

        let err = CliError::from(EngineError::UnresolvedParameter {
            parameter: "cluster".to_string(),
            field: "metadata.name".to_string(),
            set: 1,
            suggestion: None,
        });
        assert_eq!(err.exit_code(), exit_codes::EXPANSION_ERROR);

        let err = CliError::from(EngineError::DuplicateTemplateKey {
            key: "team".to_string(),
            field: "metadata.labels".to_string(),
            set: 1,
        });
        assert_eq!(err.exit_code(), exit_codes::EXPANSION_ERROR);
        assert!(!err.is_usage());

        let err = CliError::render(
            "guestbook",
            RepoError::ToolNotFound {
                tool: "helm".to_string(),
            },
        );
        assert_eq!(err.exit_code(), exit_codes::RENDER_ERROR);
    }
}
