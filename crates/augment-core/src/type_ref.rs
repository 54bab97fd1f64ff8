//! Resolved type references.

use crate::TypeHash;

/// A type reference after name resolution.
///
/// Member signatures and extended types are stored in this form. Shapes that can
/// never be extended (pointers, arrays, open type parameters, `dynamic`) are kept
/// distinct so the validator can name them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// No value (`void` return).
    Void,
    /// A declared type.
    Named(TypeHash),
    /// Pointer to another type.
    Pointer(Box<TypeRef>),
    /// Array of another type.
    Array(Box<TypeRef>),
    /// An open type parameter of the enclosing declaration.
    Param(String),
    /// The dynamic (late-bound) type.
    Dynamic,
    /// A name that did not resolve to exactly one type.
    Unresolved {
        /// Name as written.
        name: String,
        /// True when several candidates matched.
        ambiguous: bool,
    },
}

impl TypeRef {
    /// The declared type this reference names, if any.
    pub fn named_hash(&self) -> Option<TypeHash> {
        match self {
            TypeRef::Named(hash) => Some(*hash),
            _ => None,
        }
    }

    /// Whether resolution failed for this reference.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, TypeRef::Unresolved { .. })
    }
}
