//! Generator evaluation
//!
//! Generators form a closed set (`list`, `matrix`, `merge`) dispatched by
//! pattern matching. Combinators (`matrix`, `merge`) may nest, but only up to
//! an explicit maximum depth: a top-level combinator is at depth 1, a
//! combinator inside it at depth 2, and so on. List generators are accepted
//! at any depth.

pub mod list;
pub mod matrix;
pub mod merge;

use appset_core::{GeneratorSpec, ParameterSet};

use crate::error::{EngineError, Result};

/// Default combinator nesting depth (matrix/merge inside matrix/merge, no deeper)
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 2;

/// Evaluates generator definitions into ordered parameter sets
#[derive(Debug, Clone, Copy)]
pub struct GeneratorEvaluator {
    max_depth: usize,
}

impl Default for GeneratorEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

impl GeneratorEvaluator {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluate a top-level generator
    pub fn generate(&self, spec: &GeneratorSpec) -> Result<Vec<ParameterSet>> {
        self.generate_at(spec, 0)
    }

    /// `depth` is the number of enclosing combinators
    fn generate_at(&self, spec: &GeneratorSpec, depth: usize) -> Result<Vec<ParameterSet>> {
        match spec {
            GeneratorSpec::List(list) => Ok(list::generate(list)),
            GeneratorSpec::Matrix(matrix) => {
                let (left, right) =
                    self.generate_children(spec.type_name(), &matrix.generators, depth)?;
                Ok(matrix::generate(&left, &right))
            }
            GeneratorSpec::Merge(merge) => {
                let (base, other) =
                    self.generate_children(spec.type_name(), &merge.generators, depth)?;
                merge::generate(&merge.merge_keys, base, other)
            }
        }
    }

    fn generate_children(
        &self,
        generator: &'static str,
        children: &[GeneratorSpec],
        depth: usize,
    ) -> Result<(Vec<ParameterSet>, Vec<ParameterSet>)> {
        let level = depth + 1;
        if level > self.max_depth {
            return Err(EngineError::NestingTooDeep {
                generator,
                depth: level,
                max: self.max_depth,
            });
        }

        let [first, second] = children else {
            return Err(EngineError::InvalidChildCount {
                generator,
                found: children.len(),
            });
        };

        let left = self.generate_at(first, level)?;
        let right = self.generate_at(second, level)?;
        tracing::debug!(
            generator,
            depth = level,
            left = left.len(),
            right = right.len(),
            "evaluated child generators"
        );
        Ok((left, right))
    }
}
