//! Augmentation compiler.
//!
//! Resolves member accesses against real members and augmentation units and
//! lowers the result into explicit call forms.
//!
//! ## Architecture
//!
//! - **Pass 1 (Registration)**: collect declarations per file
//! - **Pass 1b (Completion)**: merge into the registry, resolve signatures, validate units
//! - **Pass 2 (Resolution)**: resolve and lower use sites, optionally in parallel
//!
//! ## Modules
//!
//! - [`visibility`]: which augmentation units a scope can see, in priority tiers
//! - [`resolve`]: real-member-first merge resolution
//! - [`protocol`]: iteration and await member protocols
//! - [`binder`]: named, optional and variadic argument binding
//! - [`lower`]: receiver-explicit call forms and protocol plans
//! - [`validate`]: extended-type and member-form rules

pub mod binder;
pub mod lower;
mod options;
pub mod passes;
pub mod protocol;
pub mod resolve;
pub mod site;
pub mod validate;
pub mod visibility;

#[cfg(test)]
mod test_support;

pub use binder::{BoundArguments, BoundSlot, bind};
pub use lower::{
    AccessKind, AwaitPlan, CallForm, CallTarget, CollectionInitPlan, IterationPlan, LoweredAccess,
    LoweredProtocol, Operand, ProtocolPlan, Temp, TempId, TempSource, lower_access,
};
pub use options::CompilerOptions;
pub use passes::{
    CompletionOutput, CompletionPass, ProtocolOutput, RegistrationPass, RegistrationResult,
    ResolutionOutput, ResolutionPass, register_files,
};
pub use protocol::{Protocol, ProtocolMatch, ProtocolSlot, discover};
pub use resolve::{MemberQuery, MemberResolver, Resolution};
pub use site::{Access, AccessShape, AccessSite, Argument, ProtocolSite, ProtocolUse};
pub use validate::validate_unit;
pub use visibility::{VisibleUnits, visible_units};
