//! Registry entries: real types, members and augmentation units.

mod augmentation;
mod member;
mod type_entry;

pub use augmentation::{AugmentationUnit, UnitId};
pub use member::{
    Accessors, ConstantValue, ForeignImport, INDEXER_NAME, MemberCategory, MemberDecl, MemberKind,
    Param, ParamFlags,
};
pub use type_entry::{TypeEntry, TypeKind};
