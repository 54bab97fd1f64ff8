//! Registration Pass (Pass 1) - collect declarations from one file.
//!
//! Walks a single [`SourceFile`] and records every namespace block, `using`
//! directive, type declaration and augmentation declaration without touching
//! the registry. Each file produces an independent [`RegistrationResult`], so
//! files can be collected on several threads; the completion pass merges the
//! results in ascending file order.
//!
//! ```text
//! file 0 ──► RegistrationResult ─┐
//! file 1 ──► RegistrationResult ─┼──► CompletionPass (merge in FileId order)
//! file 2 ──► RegistrationResult ─┘
//! ```

use augment_ast::{AugmentationDecl, Item, NamespaceDecl, SourceFile, TypeDecl};
use augment_core::{FileId, QualifiedName, UnitId};

/// A file root or namespace block, local to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScope {
    /// Index of the enclosing block in [`RegistrationResult::scopes`].
    pub parent: Option<usize>,
    /// Absolute namespace path.
    pub namespace: Vec<String>,
    pub using_paths: Vec<Vec<String>>,
}

/// A type declaration awaiting base and member resolution.
#[derive(Debug, Clone)]
pub struct PendingType<'a> {
    pub name: QualifiedName,
    pub scope: usize,
    pub decl: &'a TypeDecl,
}

/// An augmentation declaration awaiting extended-type resolution and validation.
#[derive(Debug, Clone)]
pub struct PendingUnit<'a> {
    pub id: UnitId,
    pub name: QualifiedName,
    pub scope: usize,
    pub decl: &'a AugmentationDecl,
}

/// Everything one file declares, still unresolved.
#[derive(Debug, Clone)]
pub struct RegistrationResult<'a> {
    pub file: FileId,
    pub scopes: Vec<PendingScope>,
    pub types: Vec<PendingType<'a>>,
    pub units: Vec<PendingUnit<'a>>,
}

impl<'a> RegistrationResult<'a> {
    fn new(file: FileId) -> Self {
        Self {
            file,
            scopes: Vec::new(),
            types: Vec::new(),
            units: Vec::new(),
        }
    }
}

/// Pass 1: collect one file's declarations.
pub struct RegistrationPass<'a> {
    result: RegistrationResult<'a>,
}

impl<'a> RegistrationPass<'a> {
    pub fn new(file: FileId) -> Self {
        Self {
            result: RegistrationResult::new(file),
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, file: &'a SourceFile) -> RegistrationResult<'a> {
        let root = self.open_scope(None, Vec::new());
        self.visit_items(&file.items, root);
        tracing::debug!(
            file = file.id.0,
            types = self.result.types.len(),
            units = self.result.units.len(),
            "collected declarations"
        );
        self.result
    }

    fn open_scope(&mut self, parent: Option<usize>, namespace: Vec<String>) -> usize {
        self.result.scopes.push(PendingScope {
            parent,
            namespace,
            using_paths: Vec::new(),
        });
        self.result.scopes.len() - 1
    }

    fn visit_items(&mut self, items: &'a [Item], scope: usize) {
        for item in items {
            match item {
                Item::Namespace(ns) => self.visit_namespace(ns, scope),
                Item::Using(using) => {
                    let path = using.path.iter().map(|i| i.name.clone()).collect();
                    self.result.scopes[scope].using_paths.push(path);
                }
                Item::Type(decl) => self.visit_type(decl, scope),
                Item::Augmentation(decl) => self.visit_augmentation(decl, scope),
            }
        }
    }

    fn visit_namespace(&mut self, ns: &'a NamespaceDecl, parent: usize) {
        let mut namespace = self.result.scopes[parent].namespace.clone();
        namespace.extend(ns.path.iter().map(|i| i.name.clone()));
        let scope = self.open_scope(Some(parent), namespace);
        self.visit_items(&ns.items, scope);
    }

    fn qualified(&self, scope: usize, name: &str) -> QualifiedName {
        QualifiedName::new(name, self.result.scopes[scope].namespace.clone())
    }

    fn visit_type(&mut self, decl: &'a TypeDecl, scope: usize) {
        let name = self.qualified(scope, decl.name.as_str());
        self.result.types.push(PendingType { name, scope, decl });
    }

    fn visit_augmentation(&mut self, decl: &'a AugmentationDecl, scope: usize) {
        let id = UnitId::new(self.result.file, self.result.units.len() as u32);
        let name = self.qualified(scope, decl.name.as_str());
        self.result.units.push(PendingUnit {
            id,
            name,
            scope,
            decl,
        });
    }
}
