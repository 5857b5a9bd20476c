//! `appset` subcommands

pub mod preview_apps;
pub mod preview_resources;

use appset_core::{Application, ApplicationSet};
use appset_engine::Engine;
use std::path::Path;

use crate::error::Result;

/// Load the first ApplicationSet of `manifest` and expand it
pub fn generate(engine: &Engine, manifest: &Path) -> Result<Vec<Application>> {
    let appset = ApplicationSet::load_first(manifest)?;
    tracing::debug!(
        appset = %appset.metadata.name,
        generators = appset.spec.generators.len(),
        "loaded ApplicationSet"
    );
    Ok(engine.generate_applications(&appset)?)
}

/// Applications matching `name`, or all of them
pub fn select<'a>(apps: &'a [Application], name: Option<&str>) -> Vec<&'a Application> {
    let Some(name) = name else {
        return apps.iter().collect();
    };

    let selected: Vec<&Application> = apps.iter().filter(|app| app.name() == name).collect();
    if selected.is_empty() {
        tracing::warn!("no generated Application is named {}", name);
    }
    selected
}
