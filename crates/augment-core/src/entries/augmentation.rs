//! Augmentation units.

use std::fmt;

use crate::{FileId, MemberDecl, QualifiedName, ScopeId, Span, TypeHash, TypeRef};

/// Stable identity of an augmentation unit.
///
/// Ordering is the global declaration order: compile-unit ordinal first, then the
/// unit's position within that file. Visibility tiers are sorted by this.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    pub file: FileId,
    pub index: u32,
}

impl UnitId {
    pub fn new(file: FileId, index: u32) -> Self {
        Self { file, index }
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({}.{})", self.file.0, self.index)
    }
}

/// A declaration attaching members to an existing type.
///
/// Built during registration and immutable once the registry is frozen.
/// `extended_type` is `None` when the declaration named no type at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentationUnit {
    pub id: UnitId,
    pub name: QualifiedName,
    /// Hash of the unit's own synthetic type.
    pub hash: TypeHash,
    pub extended_type: Option<TypeRef>,
    /// Innermost lexical scope the unit was declared in.
    pub scope: ScopeId,
    pub members: Vec<MemberDecl>,
    pub is_static_only: bool,
    /// Cleared by validation; invalid units stay registered but are never visible.
    pub valid: bool,
    pub span: Span,
}

impl AugmentationUnit {
    pub fn new(id: UnitId, name: QualifiedName, scope: ScopeId) -> Self {
        let hash = name.to_type_hash();
        Self {
            id,
            name,
            hash,
            extended_type: None,
            scope,
            members: Vec::new(),
            is_static_only: false,
            valid: true,
            span: Span::default(),
        }
    }

    /// The extended type's hash when it resolved to a declared type.
    pub fn extended_hash(&self) -> Option<TypeHash> {
        self.extended_type.as_ref().and_then(TypeRef::named_hash)
    }

    /// Namespace path the unit was declared in.
    pub fn declaring_scope(&self) -> &[String] {
        self.name.namespace_path()
    }
}
