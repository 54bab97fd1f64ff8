//! Compiler passes.
//!
//! - [`registration`]: Pass 1 - collect declarations per file
//! - [`completion`]: Pass 1b - merge into the registry, resolve, validate, index
//! - [`resolution`]: Pass 2 - resolve and lower use sites against the frozen registry

pub mod completion;
pub mod registration;
pub mod resolution;

pub use completion::{CompletionOutput, CompletionPass};
pub use registration::{PendingScope, PendingType, PendingUnit, RegistrationPass, RegistrationResult};
pub use resolution::{ProtocolOutput, ResolutionOutput, ResolutionPass};

use augment_ast::SourceFile;
use augment_registry::SymbolRegistry;

use crate::CompilerOptions;

/// Run passes 1 and 1b over every file and return the frozen registry.
pub fn register_files(files: &[SourceFile], options: CompilerOptions) -> (SymbolRegistry, CompletionOutput) {
    let results = map_items(options.parallel(), files, |file| RegistrationPass::new(file.id).run(file));
    let mut registry = SymbolRegistry::with_primitives();
    let output = CompletionPass::new(&mut registry, options).run(results);
    (registry, output)
}

/// Map `items` in order, on the rayon pool when `parallel` is set.
#[cfg(feature = "parallel")]
pub(crate) fn map_items<'a, T, R, F>(parallel: bool, items: &'a [T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&'a T) -> R + Sync + Send,
{
    use rayon::prelude::*;
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_items<'a, T, R, F>(_parallel: bool, items: &'a [T], f: F) -> Vec<R>
where
    F: Fn(&'a T) -> R,
{
    items.iter().map(f).collect()
}
