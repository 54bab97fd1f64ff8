//! Compilation driver.
//!
//! Files are added first, then [`Compilation::build`] runs registration and
//! completion once over all of them. After that the registry is frozen and
//! any number of access or protocol sites can be resolved against it.
//!
//! # Example
//!
//! ```
//! use augment::{Compilation, CompilerOptions};
//! use augment::ast::{AugmentationDecl, MemberSyntax, SourceFile, TypeDecl};
//!
//! let mut compilation = Compilation::new(CompilerOptions::new());
//! compilation
//!     .add_file(
//!         SourceFile::new(0, "point.src")
//!             .item(TypeDecl::class("Point"))
//!             .item(AugmentationDecl::extending("PointExt", "Point").member(MemberSyntax::method("Length"))),
//!     )
//!     .unwrap();
//! compilation.build().unwrap();
//! assert!(compilation.diagnostics().is_empty());
//! ```

use augment_ast::SourceFile;
use augment_compiler::{
    AccessSite, CallTarget, CompilerOptions, ProtocolOutput, ProtocolSite, ResolutionOutput,
    ResolutionPass, register_files,
};
use augment_core::{Diagnostics, QualifiedName, ScopeId, TypeHash};
use augment_registry::SymbolRegistry;
use tracing::info;

use crate::error::{CompilationError, CompilationResult};

/// A set of files compiled together.
pub struct Compilation {
    options: CompilerOptions,
    files: Vec<SourceFile>,
    registry: Option<SymbolRegistry>,
    diagnostics: Diagnostics,
}

impl Default for Compilation {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

impl Compilation {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
            registry: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Add every file and build immediately.
    pub fn from_files(files: impl IntoIterator<Item = SourceFile>, options: CompilerOptions) -> CompilationResult<Self> {
        let mut compilation = Self::new(options);
        for file in files {
            compilation.add_file(file)?;
        }
        compilation.build()?;
        Ok(compilation)
    }

    pub fn options(&self) -> CompilerOptions {
        self.options
    }

    pub fn add_file(&mut self, file: SourceFile) -> CompilationResult<()> {
        if self.registry.is_some() {
            return Err(CompilationError::AlreadyBuilt);
        }
        if self.files.iter().any(|f| f.id == file.id) {
            return Err(CompilationError::DuplicateFile(file.id));
        }
        self.files.push(file);
        Ok(())
    }

    /// Register every file and freeze the registry.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&mut self) -> CompilationResult<()> {
        if self.registry.is_some() {
            return Err(CompilationError::AlreadyBuilt);
        }

        let (registry, output) = register_files(&self.files, self.options);
        info!(
            files = self.files.len(),
            types = output.types_registered,
            units = output.units_registered,
            invalid = output.units_invalid,
            "compilation built"
        );

        self.diagnostics = output.diagnostics;
        if self.options.sort_diagnostics() {
            self.diagnostics.sort();
        }
        self.registry = Some(registry);
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.registry.is_some()
    }

    /// Diagnostics from registration and validation.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn registry(&self) -> CompilationResult<&SymbolRegistry> {
        self.registry.as_ref().ok_or(CompilationError::NotBuilt)
    }

    /// The scope of `file` that opens `namespace`; an empty path is the file root.
    pub fn scope(&self, file: u32, namespace: &[&str]) -> CompilationResult<ScopeId> {
        let registry = self.registry()?;
        let file = augment_core::FileId(file);
        let unknown = || CompilationError::UnknownScope {
            file,
            namespace: namespace.join("::"),
        };
        let node = registry.tree().get_path(namespace).ok_or_else(unknown)?;
        registry.scopes().find(file, node).ok_or_else(unknown)
    }

    /// Hash of a registered type or unit by qualified name (`"Geo::Point"`).
    pub fn type_hash(&self, name: &str) -> CompilationResult<TypeHash> {
        let registry = self.registry()?;
        let hash = QualifiedName::from_qualified_string(name).to_type_hash();
        if registry.contains_type(hash) {
            Ok(hash)
        } else {
            Err(CompilationError::UnknownType {
                name: name.to_string(),
            })
        }
    }

    /// Resolve and lower access sites, in order.
    pub fn resolve(&self, sites: &[AccessSite]) -> CompilationResult<ResolutionOutput> {
        let mut output = ResolutionPass::new(self.registry()?, self.options).run(sites);
        if self.options.sort_diagnostics() {
            output.diagnostics.sort();
        }
        Ok(output)
    }

    /// Resolve and lower protocol sites, in order.
    pub fn resolve_protocols(&self, sites: &[ProtocolSite]) -> CompilationResult<ProtocolOutput> {
        let mut output = ResolutionPass::new(self.registry()?, self.options).run_protocols(sites);
        if self.options.sort_diagnostics() {
            output.diagnostics.sort();
        }
        Ok(output)
    }

    /// Signature of a lowered call target, e.g. `PointExt.get_Norm(Point)`.
    pub fn describe(&self, target: &CallTarget) -> CompilationResult<String> {
        Ok(target.describe(self.registry()?))
    }
}
