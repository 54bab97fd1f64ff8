//! Scope visibility: which augmentation units a use site can see.
//!
//! A unit is visible at the innermost chain level where its declaring
//! namespace is either the level's own namespace or one the level imports.
//! Units are grouped into one tier per level, inner levels first, declaration
//! order inside a tier.

use augment_core::{AugmentationUnit, TypeHash};
use augment_registry::{ScopeChain, SymbolRegistry};
use tracing::trace;

/// Visible units for one extended type, highest priority first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleUnits<'r> {
    tiers: Vec<Vec<&'r AugmentationUnit>>,
}

impl<'r> VisibleUnits<'r> {
    /// Non-empty tiers, innermost first.
    pub fn tiers(&self) -> &[Vec<&'r AugmentationUnit>] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Total number of visible units.
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    /// All visible units in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &'r AugmentationUnit> + '_ {
        self.tiers.iter().flat_map(|tier| tier.iter().copied())
    }
}

/// Compute the visible units extending `extended` from a use site's chain.
pub fn visible_units<'r>(
    registry: &'r SymbolRegistry,
    extended: TypeHash,
    chain: &ScopeChain,
) -> VisibleUnits<'r> {
    let mut buckets: Vec<Vec<&'r AugmentationUnit>> = vec![Vec::new(); chain.len()];

    for unit in registry.lookup(extended) {
        if !unit.valid {
            continue;
        }
        let Some(namespace) = registry.unit_namespace(unit) else {
            continue;
        };
        match chain.depth_of(namespace) {
            Some(depth) => buckets[depth].push(unit),
            None => trace!(unit = %unit.name, "augmentation not reachable from scope"),
        }
    }

    VisibleUnits {
        tiers: buckets.into_iter().filter(|tier| !tier.is_empty()).collect(),
    }
}
