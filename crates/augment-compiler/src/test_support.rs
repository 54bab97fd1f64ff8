//! Shared fixtures for the unit tests in this crate.

use augment_ast::SourceFile;
use augment_core::{Diagnostics, FileId, ScopeId, TypeHash};
use augment_registry::SymbolRegistry;

use crate::CompilerOptions;
use crate::passes::register_files;

pub(crate) struct Registered {
    pub registry: SymbolRegistry,
    pub diagnostics: Diagnostics,
}

pub(crate) fn register(files: Vec<SourceFile>) -> Registered {
    register_with(files, CompilerOptions::new().with_parallel(false))
}

pub(crate) fn register_with(files: Vec<SourceFile>, options: CompilerOptions) -> Registered {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let (registry, output) = register_files(&files, options);
    Registered {
        registry,
        diagnostics: output.diagnostics,
    }
}

/// The file-level scope of `file`.
pub(crate) fn root_scope(registry: &SymbolRegistry, file: u32) -> ScopeId {
    registry
        .scopes()
        .find(FileId(file), registry.tree().root())
        .expect("file has a root scope")
}

/// The first block of `file` that opens namespace `path`.
pub(crate) fn block_scope(registry: &SymbolRegistry, file: u32, path: &[&str]) -> ScopeId {
    let node = registry.tree().get_path(path).expect("namespace exists");
    registry
        .scopes()
        .find(FileId(file), node)
        .expect("file opens the namespace")
}

pub(crate) fn type_hash(name: &str) -> TypeHash {
    TypeHash::from_name(name)
}
