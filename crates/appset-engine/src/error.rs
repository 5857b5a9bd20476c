//! Engine error types

use appset_core::CoreError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while evaluating generators or expanding the template
#[derive(Error, Debug, Diagnostic)]
pub enum EngineError {
    #[error(transparent)]
    #[diagnostic(code(appset::manifest))]
    Core(#[from] CoreError),

    #[error("{generator} generator requires exactly 2 child generators, found {found}")]
    #[diagnostic(code(appset::generator::children))]
    InvalidChildCount { generator: &'static str, found: usize },

    #[error("{generator} generator at nesting depth {depth} exceeds the maximum depth of {max}")]
    #[diagnostic(
        code(appset::generator::depth),
        help("only list generators may appear below nesting depth {max}")
    )]
    NestingTooDeep {
        generator: &'static str,
        depth: usize,
        max: usize,
    },

    #[error("merge generator: child generator #{child} has more than one parameter set for merge key values {values}")]
    #[diagnostic(
        code(appset::generator::merge_keys),
        help("merge keys must identify at most one parameter set per child generator")
    )]
    DuplicateMergeKey { child: usize, values: String },

    #[error("goTemplate mode is not supported")]
    #[diagnostic(
        code(appset::template::go_template),
        help("remove `goTemplate: true`; only plain parameter placeholders can be previewed")
    )]
    GoTemplateUnsupported,

    #[error("unresolved parameter `{parameter}` in template field `{field}` (parameter set #{set})")]
    #[diagnostic(code(appset::template::unresolved))]
    UnresolvedParameter {
        parameter: String,
        field: String,
        set: usize,
        #[help]
        suggestion: Option<String>,
    },

    #[error("template field `{field}` has more than one key substituting to `{key}` (parameter set #{set})")]
    #[diagnostic(code(appset::template::duplicate_key))]
    DuplicateTemplateKey {
        key: String,
        field: String,
        set: usize,
    },

    #[error("invalid Application generated from parameter set #{set}: {source}")]
    #[diagnostic(code(appset::template::application))]
    InvalidApplication {
        set: usize,
        #[source]
        source: CoreError,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
