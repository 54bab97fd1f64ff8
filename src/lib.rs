//! Augmentation resolution and lowering.
//!
//! Augmentation units add methods, properties and indexers to types their
//! author does not own. This crate decides, for each member access in a
//! program, whether a real member or an augmentation member is meant and
//! rewrites augmentation uses into explicit static calls that take the
//! receiver as their first argument.
//!
//! The work is split over the workspace crates, re-exported here:
//!
//! - [`core`]: spans, names, hashes, registry entries and diagnostics
//! - [`ast`]: the declaration tree a front end hands in
//! - [`registry`]: namespaces, lexical scopes and the symbol registry
//! - [`compiler`]: visibility, merge resolution, binding, lowering and validation
//!
//! [`Compilation`] drives the passes over a set of files.

mod compilation;
mod error;

pub use compilation::Compilation;
pub use error::{CompilationError, CompilationResult};

pub use augment_ast as ast;
pub use augment_compiler as compiler;
pub use augment_core as core;
pub use augment_registry as registry;

pub use augment_compiler::{
    Access, AccessKind, AccessShape, AccessSite, Argument, AwaitPlan, CallForm, CallTarget,
    CollectionInitPlan, CompilerOptions, IterationPlan, LoweredAccess, LoweredProtocol, Operand,
    ProtocolOutput, ProtocolPlan, ProtocolSite, ProtocolSlot, ProtocolUse, ResolutionOutput, Temp,
    TempId, TempSource,
};
pub use augment_core::{
    ConstantValue, Diagnostic, DiagnosticKind, Diagnostics, ExprId, FileId, MemberKind,
    QualifiedName, ScopeId, Severity, SiteId, Span, TypeHash,
};
