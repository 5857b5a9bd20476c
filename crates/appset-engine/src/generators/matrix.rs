//! Matrix generator: cross product of two child generators

use appset_core::ParameterSet;
use std::collections::BTreeSet;

/// Cross product, outer loop over `left`, inner loop over `right`
///
/// Each combined set is the union of both sides; on a shared key the value
/// from `right` wins.
pub fn generate(left: &[ParameterSet], right: &[ParameterSet]) -> Vec<ParameterSet> {
    let mut combined = Vec::with_capacity(left.len() * right.len());
    let mut collisions = BTreeSet::new();

    for a in left {
        for b in right {
            let mut set = a.clone();
            collisions.extend(set.merge_from(b));
            combined.push(set);
        }
    }

    for key in collisions {
        tracing::warn!(
            "matrix generator: parameter `{}` is produced by both child generators, using the value of the second",
            key
        );
    }

    combined
}
