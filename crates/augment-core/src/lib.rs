//! Core types for the augmentation engine.
//!
//! This crate holds the data model shared by every other crate in the workspace:
//!
//! - [`Span`], [`FileId`] - source locations
//! - [`QualifiedName`], [`TypeHash`] - identity of types and units
//! - [`TypeEntry`], [`MemberDecl`], [`AugmentationUnit`] - registry entries
//! - [`Diagnostics`] and the per-phase error enums

mod diagnostics;
mod entries;
mod error;
mod ids;
mod qualified_name;
mod span;
mod type_hash;
mod type_ref;
mod visibility;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use entries::{
    Accessors, AugmentationUnit, ConstantValue, ForeignImport, INDEXER_NAME, MemberCategory,
    MemberDecl, MemberKind, Param, ParamFlags, TypeEntry, TypeKind, UnitId,
};
pub use error::{BindingError, RegistrationError, ResolutionError, ValidationError};
pub use ids::{ExprId, ScopeId, SiteId};
pub use qualified_name::QualifiedName;
pub use span::{FileId, Span};
pub use type_hash::{TypeHash, hash_constants, primitives};
pub use type_ref::TypeRef;
pub use visibility::Visibility;
