//! Appset Core - data model for offline ApplicationSet previews
//!
//! This crate provides the foundational types used throughout the workspace:
//! - `ParameterSet`: one bundle of generator output used to instantiate a template
//! - `ApplicationSet`: the declarative input (generators + template)
//! - `Application`: a concrete, fully substituted Argo CD Application
//! - `Resource`: a rendered Kubernetes object

pub mod params;
pub mod appset;
pub mod application;
pub mod resource;
pub mod error;

pub use params::{ParameterSet, render_value};
pub use appset::{
    ApplicationSet, ApplicationSetSpec, ApplicationTemplate, GeneratorSpec, ListGenerator,
    MatrixGenerator, MergeGenerator, ObjectMeta,
};
pub use application::{
    Application, ApplicationDestination, ApplicationMeta, ApplicationSource, ApplicationSpec,
    DirectorySource, HelmParameter, HelmSource, KustomizeSource,
};
pub use resource::{Resource, group_by_kind};
pub use error::{CoreError, Result};
