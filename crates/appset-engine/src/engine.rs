//! ApplicationSet expansion engine

use appset_core::{Application, ApplicationSet, ParameterSet};
use std::collections::HashSet;

use crate::error::{EngineError, Result};
use crate::generators::{DEFAULT_MAX_NESTING_DEPTH, GeneratorEvaluator};
use crate::template;

/// Engine builder
pub struct EngineBuilder {
    max_nesting_depth: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Maximum number of nested matrix/merge levels
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Build the engine
    pub fn build(self) -> Engine {
        Engine::new(self.max_nesting_depth)
    }
}

/// Expands ApplicationSets into Applications
pub struct Engine {
    generators: GeneratorEvaluator,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

impl Engine {
    pub fn new(max_nesting_depth: usize) -> Self {
        Self {
            generators: GeneratorEvaluator::new(max_nesting_depth),
        }
    }

    /// Create a builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.generators.max_depth()
    }

    /// Evaluate all generators in order and concatenate their output
    pub fn generate_parameters(&self, appset: &ApplicationSet) -> Result<Vec<ParameterSet>> {
        let mut sets = Vec::new();
        for generator in &appset.spec.generators {
            let generated = self.generators.generate(generator)?;
            tracing::debug!(
                generator = generator.type_name(),
                count = generated.len(),
                "generated parameter sets"
            );
            sets.extend(generated);
        }
        Ok(sets)
    }

    /// Generate every Application of an ApplicationSet, in generator order
    pub fn generate_applications(&self, appset: &ApplicationSet) -> Result<Vec<Application>> {
        if appset.spec.go_template {
            return Err(EngineError::GoTemplateUnsupported);
        }

        let sets = self.generate_parameters(appset)?;
        let apps = template::expand(&appset.spec.template, &sets)?;

        let mut seen = HashSet::new();
        for app in &apps {
            if !seen.insert(app.name()) {
                tracing::warn!(
                    "ApplicationSet {} generates more than one Application named {}",
                    appset.metadata.name,
                    app.name()
                );
            }
        }

        tracing::debug!(
            appset = %appset.metadata.name,
            count = apps.len(),
            "generated applications"
        );
        Ok(apps)
    }
}
