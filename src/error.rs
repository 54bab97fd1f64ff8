use augment_core::FileId;
use thiserror::Error;

/// Misuse of the [`Compilation`](crate::Compilation) driver.
///
/// Problems in the compiled program itself are never reported this way; they
/// are collected as diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompilationError {
    #[error("file {} was added twice", .0.0)]
    DuplicateFile(FileId),

    #[error("the compilation has already been built")]
    AlreadyBuilt,

    #[error("the compilation has not been built yet")]
    NotBuilt,

    #[error("file {} has no block for namespace '{namespace}'", .file.0)]
    UnknownScope { file: FileId, namespace: String },

    #[error("no type named '{name}' is registered")]
    UnknownType { name: String },
}

pub type CompilationResult<T> = Result<T, CompilationError>;
