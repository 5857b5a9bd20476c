//! Appset Engine - generator composition and template expansion
//!
//! This crate turns an ApplicationSet into concrete Applications:
//! - List, Matrix and Merge generators with a bounded nesting depth
//! - `{{placeholder}}` substitution into every string of the template
//! - Human-readable errors with suggestions for misspelled parameters

pub mod engine;
pub mod generators;
pub mod template;
pub mod error;
pub mod suggestions;

pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, Result};
pub use generators::{GeneratorEvaluator, DEFAULT_MAX_NESTING_DEPTH};
pub use template::{expand, substitute};
