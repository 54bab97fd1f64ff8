//! Compiler configuration.

/// Options controlling the registration and resolution passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerOptions {
    parallel: bool,
    warn_shadowed_members: bool,
    sort_diagnostics: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
            warn_shadowed_members: true,
            sort_diagnostics: true,
        }
    }

    /// Resolve call sites on the rayon pool. Ignored without the `parallel` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Warn about augmentation members hidden by a real member of the same name and arity.
    pub fn with_shadow_warnings(mut self, warn: bool) -> Self {
        self.warn_shadowed_members = warn;
        self
    }

    /// Sort collected diagnostics by position before returning them.
    pub fn with_sorted_diagnostics(mut self, sort: bool) -> Self {
        self.sort_diagnostics = sort;
        self
    }

    pub fn parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }

    pub fn warn_shadowed_members(&self) -> bool {
        self.warn_shadowed_members
    }

    pub fn sort_diagnostics(&self) -> bool {
        self.sort_diagnostics
    }
}
