//! SymbolRegistry - types, augmentation units and lexical scopes.
//!
//! # Storage Model
//!
//! - **Types**: every [`TypeEntry`] by [`TypeHash`], including the synthetic
//!   type each augmentation unit declares.
//! - **Units**: every [`AugmentationUnit`] in global declaration order, valid or not.
//! - **Augmentation index**: extended type -> ordered unit ids. Only units that
//!   passed validation are indexed; lookups never widen to base types.
//! - **Scopes**: the [`ScopeTable`] of every file root and namespace block.
//!
//! # Phases
//!
//! The registry is written during registration (one merge per compiled file,
//! in ascending file order) and then frozen. Resolution only ever sees
//! `&SymbolRegistry`, which is what allows call sites to be resolved on many
//! threads at once.

use rustc_hash::{FxHashMap, FxHashSet};

use augment_core::{
    AugmentationUnit, QualifiedName, RegistrationError, ScopeId, TypeEntry, TypeHash, TypeKind,
    UnitId, primitives,
};
use petgraph::graph::NodeIndex;

use crate::{NamespaceTree, ScopeChain, ScopeTable};

/// Registry of types and augmentation units.
#[derive(Default)]
pub struct SymbolRegistry {
    tree: NamespaceTree,
    scopes: ScopeTable,

    types: FxHashMap<TypeHash, TypeEntry>,

    /// Units in declaration order.
    units: Vec<AugmentationUnit>,
    unit_slots: FxHashMap<UnitId, usize>,
    /// Unit's own type hash -> unit.
    unit_types: FxHashMap<TypeHash, UnitId>,

    /// Extended type -> valid units, ordered by `UnitId`.
    augmentations: FxHashMap<TypeHash, Vec<UnitId>>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in types registered in the global namespace.
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        registry.register_all_primitives();
        registry
    }

    pub fn register_all_primitives(&mut self) {
        for (name, hash) in primitives::ALL {
            if self.types.contains_key(&hash) {
                continue;
            }
            let entry = TypeEntry::new(QualifiedName::global(name), TypeKind::Primitive);
            debug_assert_eq!(entry.hash, hash);
            let registered = self.register_type(entry);
            debug_assert!(registered.is_ok(), "primitive {} collided", name);
        }
    }

    pub fn tree(&self) -> &NamespaceTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut NamespaceTree {
        &mut self.tree
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeTable {
        &mut self.scopes
    }

    /// Scope chain seen from inside a lexical scope.
    pub fn scope_chain(&self, scope: ScopeId) -> ScopeChain {
        self.scopes.chain(scope, &self.tree)
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    /// Register a type in the namespace named by its qualified name.
    pub fn register_type(&mut self, entry: TypeEntry) -> Result<(), RegistrationError> {
        let ns = self.tree.get_or_create_path(entry.name.namespace_path());
        self.tree
            .declare_type(ns, entry.name.simple_name(), entry.hash)
            .map_err(|err| match err {
                RegistrationError::Duplicate { name, .. } => RegistrationError::Duplicate {
                    name,
                    span: entry.span,
                },
                other => other,
            })?;
        self.types.insert(entry.hash, entry);
        Ok(())
    }

    pub fn get(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }

    pub fn get_mut(&mut self, hash: TypeHash) -> Option<&mut TypeEntry> {
        self.types.get_mut(&hash)
    }

    pub fn contains_type(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// Qualified name of a registered type.
    pub fn type_name(&self, hash: TypeHash) -> Option<&QualifiedName> {
        self.types.get(&hash).map(|e| &e.name)
    }

    /// The type and its bases, derived first. Stops at a cycle or unknown base.
    pub fn base_chain(&self, hash: TypeHash) -> Vec<&TypeEntry> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(hash);
        while let Some(h) = current {
            if !seen.insert(h) {
                break;
            }
            let Some(entry) = self.types.get(&h) else {
                break;
            };
            chain.push(entry);
            current = entry.base;
        }
        chain
    }

    // ==========================================================================
    // Augmentation Units
    // ==========================================================================

    /// Register a unit and its synthetic type.
    ///
    /// Units must arrive in `UnitId` order. The unit is not visible to lookups
    /// until [`index_augmentations`](Self::index_augmentations) runs.
    pub fn register_unit(&mut self, unit: AugmentationUnit) -> Result<(), RegistrationError> {
        let own_type = TypeEntry::new(unit.name.clone(), TypeKind::Augmentation).with_span(unit.span);
        self.register_type(own_type)?;

        let ns = self
            .scopes
            .get(unit.scope)
            .map(|s| s.namespace)
            .ok_or(RegistrationError::InvalidNamespace)?;
        self.tree.declare_unit(ns, unit.id)?;

        self.unit_types.insert(unit.hash, unit.id);
        self.unit_slots.insert(unit.id, self.units.len());
        self.units.push(unit);
        Ok(())
    }

    pub fn unit(&self, id: UnitId) -> Option<&AugmentationUnit> {
        self.unit_slots.get(&id).map(|&slot| &self.units[slot])
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut AugmentationUnit> {
        let slot = *self.unit_slots.get(&id)?;
        self.units.get_mut(slot)
    }

    /// The unit whose own synthetic type has this hash.
    pub fn unit_by_type(&self, hash: TypeHash) -> Option<&AugmentationUnit> {
        self.unit_types.get(&hash).and_then(|id| self.unit(*id))
    }

    /// Every unit in declaration order, including invalid ones.
    pub fn units(&self) -> impl Iterator<Item = &AugmentationUnit> {
        self.units.iter()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Namespace node a unit was declared in.
    pub fn unit_namespace(&self, unit: &AugmentationUnit) -> Option<NodeIndex> {
        self.scopes.get(unit.scope).map(|s| s.namespace)
    }

    /// Rebuild the extended-type index from every valid unit.
    pub fn index_augmentations(&mut self) {
        self.augmentations.clear();
        let mut ordered: Vec<&AugmentationUnit> = self.units.iter().collect();
        ordered.sort_by_key(|u| u.id);
        for unit in ordered {
            if !unit.valid {
                continue;
            }
            if let Some(target) = unit.extended_hash() {
                self.augmentations.entry(target).or_default().push(unit.id);
            }
        }
    }

    /// Every valid unit extending exactly this type, in declaration order.
    pub fn lookup(&self, extended: TypeHash) -> impl Iterator<Item = &AugmentationUnit> {
        self.augmentations
            .get(&extended)
            .into_iter()
            .flatten()
            .filter_map(|id| self.unit(*id))
    }
}
