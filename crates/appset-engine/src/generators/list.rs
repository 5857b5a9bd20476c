//! List generator: literal parameter sets

use appset_core::{ListGenerator, ParameterSet};

/// The configured elements, verbatim and in declaration order
pub fn generate(list: &ListGenerator) -> Vec<ParameterSet> {
    list.elements.clone()
}
