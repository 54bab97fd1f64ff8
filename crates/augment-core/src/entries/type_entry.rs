//! Registered type entries.

use std::fmt;

use crate::{MemberCategory, MemberDecl, QualifiedName, Span, TypeHash};

/// Kind of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Class,
    Struct,
    Interface,
    Enum,
    /// Static (module-like) class; only static members can be added to it.
    StaticClass,
    Delegate,
    /// Synthetic type declared by an augmentation unit.
    Augmentation,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Primitive => "primitive",
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::StaticClass => "static class",
            TypeKind::Delegate => "delegate",
            TypeKind::Augmentation => "augmentation",
        };
        f.write_str(s)
    }
}

/// A registered type with its own members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub name: QualifiedName,
    pub hash: TypeHash,
    pub kind: TypeKind,
    pub base: Option<TypeHash>,
    pub members: Vec<MemberDecl>,
    pub span: Span,
}

impl TypeEntry {
    /// Create an entry; the hash is derived from the qualified name.
    pub fn new(name: QualifiedName, kind: TypeKind) -> Self {
        let hash = name.to_type_hash();
        Self {
            name,
            hash,
            kind,
            base: None,
            members: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_members(mut self, members: Vec<MemberDecl>) -> Self {
        self.members = members;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn type_hash(&self) -> TypeHash {
        self.hash
    }

    pub fn is_static_only(&self) -> bool {
        self.kind == TypeKind::StaticClass
    }

    /// Find the first member with this name and category that accepts `arity`.
    ///
    /// `None` for arity accepts any parameter count (method-group access).
    pub fn find_member(
        &self,
        name: &str,
        category: MemberCategory,
        arity: Option<usize>,
    ) -> Option<&MemberDecl> {
        self.members.iter().find(|m| {
            m.name == name
                && m.category() == category
                && arity.is_none_or(|n| m.accepts_arity(n))
        })
    }
}
