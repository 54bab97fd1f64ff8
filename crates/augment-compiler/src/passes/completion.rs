//! Completion Pass (Pass 1b) - merge, resolve and validate declarations.
//!
//! Runs once every file has been collected:
//!
//! 1. Merge each [`RegistrationResult`] into the registry in ascending file
//!    order: namespaces, lexical scopes, type names and unit names.
//! 2. Resolve `using` paths of every scope. Forward references across files
//!    work because every name is declared before anything is resolved.
//! 3. Resolve base types and member signatures of real types.
//! 4. Resolve each unit's extended type and members, then validate it.
//! 5. Optionally warn about unit members hidden by real members.
//! 6. Build the extended-type index from the valid units.
//!
//! After this pass the registry is frozen.

use augment_ast::{AugmentationDecl, Ident, MemberSyntax, MemberSyntaxKind, TypeDecl, TypeDeclKind, TypeExpr};
use augment_core::{
    Accessors, AugmentationUnit, Diagnostic, DiagnosticKind, Diagnostics, ForeignImport, MemberDecl,
    MemberKind, Param, ParamFlags, ScopeId, TypeEntry, TypeHash, TypeKind, TypeRef, UnitId,
    primitives,
};
use augment_registry::{NodeIndex, ResolutionResult, ScopeChain, SymbolRegistry};
use tracing::{debug, warn};

use crate::CompilerOptions;
use crate::passes::registration::RegistrationResult;
use crate::resolve::MemberResolver;
use crate::validate::validate_unit;

/// Output of the completion pass.
#[derive(Debug, Default)]
pub struct CompletionOutput {
    pub types_registered: usize,
    pub units_registered: usize,
    /// Units that failed validation and stay inert.
    pub units_invalid: usize,
    pub diagnostics: Diagnostics,
}

/// Pass 1b: merge per-file results into the registry and finish every entry.
pub struct CompletionPass<'reg> {
    registry: &'reg mut SymbolRegistry,
    options: CompilerOptions,
    output: CompletionOutput,
}

impl<'reg> CompletionPass<'reg> {
    pub fn new(registry: &'reg mut SymbolRegistry, options: CompilerOptions) -> Self {
        Self {
            registry,
            options,
            output: CompletionOutput::default(),
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, mut results: Vec<RegistrationResult<'_>>) -> CompletionOutput {
        results.sort_by_key(|r| r.file);

        let mut types = Vec::new();
        let mut units = Vec::new();
        for result in &results {
            self.declare_file(result, &mut types, &mut units);
        }

        self.resolve_usings();

        for (hash, scope, decl) in types {
            self.complete_type(hash, scope, decl);
        }
        for (id, decl) in units {
            self.complete_unit(id, decl);
        }

        if self.options.warn_shadowed_members() {
            self.report_shadowed();
        }

        self.registry.index_augmentations();
        debug!(
            types = self.output.types_registered,
            units = self.output.units_registered,
            invalid = self.output.units_invalid,
            "registry frozen"
        );
        self.output
    }

    // ==========================================================================
    // Declaration
    // ==========================================================================

    fn declare_file<'a>(
        &mut self,
        result: &RegistrationResult<'a>,
        types: &mut Vec<(TypeHash, ScopeId, &'a TypeDecl)>,
        units: &mut Vec<(UnitId, &'a AugmentationDecl)>,
    ) {
        let mut scope_ids: Vec<ScopeId> = Vec::with_capacity(result.scopes.len());
        for pending in &result.scopes {
            let node = self.registry.tree_mut().get_or_create_path(&pending.namespace);
            let parent = pending.parent.and_then(|p| scope_ids.get(p).copied());
            let id = self.registry.scopes_mut().add(result.file, parent, node);
            if let Some(scope) = self.registry.scopes_mut().get_mut(id) {
                scope.using_paths = pending.using_paths.clone();
            }
            scope_ids.push(id);
        }

        for pending in &result.types {
            let Some(&scope) = scope_ids.get(pending.scope) else {
                continue;
            };
            let entry = TypeEntry::new(pending.name.clone(), type_kind(pending.decl.kind)).with_span(pending.decl.span);
            let hash = entry.hash;
            match self.registry.register_type(entry) {
                Ok(()) => {
                    self.output.types_registered += 1;
                    types.push((hash, scope, pending.decl));
                }
                Err(err) => self.output.diagnostics.push(err),
            }
        }

        for pending in &result.units {
            let Some(&scope) = scope_ids.get(pending.scope) else {
                continue;
            };
            let mut unit = AugmentationUnit::new(pending.id, pending.name.clone(), scope);
            unit.span = pending.decl.span;
            match self.registry.register_unit(unit) {
                Ok(()) => {
                    self.output.units_registered += 1;
                    units.push((pending.id, pending.decl));
                }
                Err(err) => self.output.diagnostics.push(err),
            }
        }
    }

    /// Resolve each scope's `using` paths, innermost enclosing namespace first.
    /// Paths naming no namespace are ignored.
    fn resolve_usings(&mut self) {
        let mut resolved: Vec<(ScopeId, Vec<NodeIndex>)> = Vec::new();
        for (id, scope) in self.registry.scopes().iter() {
            let imports = scope
                .using_paths
                .iter()
                .filter_map(|path| {
                    let found = resolve_namespace(self.registry, scope.namespace, path);
                    if found.is_none() {
                        warn!(path = %path.join("::"), "using directive names no namespace");
                    }
                    found
                })
                .collect();
            resolved.push((id, imports));
        }
        for (id, imports) in resolved {
            if let Some(scope) = self.registry.scopes_mut().get_mut(id) {
                scope.imports = imports;
            }
        }
    }

    // ==========================================================================
    // Signatures
    // ==========================================================================

    fn complete_type(&mut self, hash: TypeHash, scope: ScopeId, decl: &TypeDecl) {
        let chain = self.registry.scope_chain(scope);
        let base = decl.base.as_ref().and_then(|expr| {
            match resolve_type_expr(self.registry, expr, &chain, &[]) {
                TypeRef::Named(base) => Some(base),
                other => {
                    warn!(ty = %decl.name.as_str(), base = ?other, "base type did not resolve");
                    None
                }
            }
        });
        let members = decl
            .members
            .iter()
            .map(|m| lower_member(self.registry, m, &chain, &[]))
            .collect();

        if let Some(entry) = self.registry.get_mut(hash) {
            entry.base = base;
            entry.members = members;
        }
    }

    fn complete_unit(&mut self, id: UnitId, decl: &AugmentationDecl) {
        let Some(scope) = self.registry.unit(id).map(|u| u.scope) else {
            return;
        };
        let chain = self.registry.scope_chain(scope);
        let type_params = &decl.type_params;

        let extended = decl
            .extended
            .as_ref()
            .map(|expr| resolve_type_expr(self.registry, expr, &chain, type_params));
        let is_static_only = extended
            .as_ref()
            .and_then(TypeRef::named_hash)
            .and_then(|h| self.registry.get(h))
            .is_some_and(TypeEntry::is_static_only);
        let members: Vec<MemberDecl> = decl
            .members
            .iter()
            .map(|m| lower_member(self.registry, m, &chain, type_params))
            .collect();

        let Some(unit) = self.registry.unit_mut(id) else {
            return;
        };
        unit.extended_type = extended;
        unit.is_static_only = is_static_only;
        unit.members = members;

        let errors = match self.registry.unit(id) {
            Some(unit) => validate_unit(unit, self.registry),
            None => return,
        };
        if errors.is_empty() {
            return;
        }

        debug!(unit = ?id, errors = errors.len(), "augmentation rejected");
        self.output.units_invalid += 1;
        for err in errors {
            self.output.diagnostics.push(err);
        }
        if let Some(unit) = self.registry.unit_mut(id) {
            unit.valid = false;
        }
    }

    fn report_shadowed(&mut self) {
        let resolver = MemberResolver::new(self.registry);
        for unit in self.registry.units().filter(|u| u.valid) {
            for member in resolver.shadowed_members(unit) {
                let message = format!(
                    "at {}: '{}' in '{}' is hidden by a member of the extended type",
                    member.span, member.name, unit.name
                );
                self.output.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::AugmentationMemberShadowed, member.span, message)
                        .with_units(vec![unit.name.clone()]),
                );
            }
        }
    }
}

fn type_kind(kind: TypeDeclKind) -> TypeKind {
    match kind {
        TypeDeclKind::Class => TypeKind::Class,
        TypeDeclKind::Struct => TypeKind::Struct,
        TypeDeclKind::Interface => TypeKind::Interface,
        TypeDeclKind::Enum => TypeKind::Enum,
        TypeDeclKind::StaticClass => TypeKind::StaticClass,
        TypeDeclKind::Delegate => TypeKind::Delegate,
    }
}

/// Find the namespace a `using` path names, trying the enclosing namespaces
/// from `from` outwards.
fn resolve_namespace(registry: &SymbolRegistry, from: NodeIndex, path: &[String]) -> Option<NodeIndex> {
    let tree = registry.tree();
    let mut current = Some(from);
    while let Some(node) = current {
        if let Some(found) = tree.get_path_from(node, path) {
            return Some(found);
        }
        current = tree.find_parent(node);
    }
    None
}

/// Resolve a written type at a scope. Names matching one of `type_params`
/// become open type parameters.
fn resolve_type_expr(registry: &SymbolRegistry, expr: &TypeExpr, chain: &ScopeChain, type_params: &[Ident]) -> TypeRef {
    match expr {
        TypeExpr::Named { path, .. } => {
            if let [single] = path.as_slice() {
                if type_params.iter().any(|p| p.name == single.name) {
                    return TypeRef::Param(single.name.clone());
                }
            }
            let names: Vec<&str> = path.iter().map(Ident::as_str).collect();
            match registry.tree().resolve_type(&names, chain) {
                ResolutionResult::Found(hash) if hash == primitives::VOID => TypeRef::Void,
                ResolutionResult::Found(hash) => TypeRef::Named(hash),
                ResolutionResult::Ambiguous(_) => TypeRef::Unresolved {
                    name: names.join("::"),
                    ambiguous: true,
                },
                ResolutionResult::NotFound => TypeRef::Unresolved {
                    name: names.join("::"),
                    ambiguous: false,
                },
            }
        }
        TypeExpr::Pointer { inner, .. } => {
            TypeRef::Pointer(Box::new(resolve_type_expr(registry, inner, chain, type_params)))
        }
        TypeExpr::Array { element, .. } => {
            TypeRef::Array(Box::new(resolve_type_expr(registry, element, chain, type_params)))
        }
        TypeExpr::Dynamic { .. } => TypeRef::Dynamic,
    }
}

fn member_kind(syntax: &MemberSyntax) -> MemberKind {
    match (syntax.kind, syntax.is_static) {
        (MemberSyntaxKind::Method, true) if syntax.foreign.is_some() => MemberKind::ForeignBinding,
        (MemberSyntaxKind::Method, true) => MemberKind::StaticMethod,
        (MemberSyntaxKind::Method, false) => MemberKind::InstanceMethod,
        (MemberSyntaxKind::Property, true) => MemberKind::StaticProperty,
        (MemberSyntaxKind::Property, false) => MemberKind::InstanceProperty,
        (MemberSyntaxKind::Indexer, _) => MemberKind::InstanceIndexer,
    }
}

fn lower_member(registry: &SymbolRegistry, syntax: &MemberSyntax, chain: &ScopeChain, type_params: &[Ident]) -> MemberDecl {
    let params = syntax
        .params
        .iter()
        .map(|p| {
            let mut param = Param::new(p.name.as_str(), resolve_type_expr(registry, &p.ty, chain, type_params));
            param.default = p.default.clone();
            if p.is_variadic {
                param.flags |= ParamFlags::VARIADIC;
            }
            if p.is_receiver {
                param.flags |= ParamFlags::RECEIVER;
            }
            param
        })
        .collect();

    let return_type = syntax
        .return_type
        .as_ref()
        .map_or(TypeRef::Void, |ty| resolve_type_expr(registry, ty, chain, type_params));

    let mut accessors = Accessors::empty();
    if syntax.kind != MemberSyntaxKind::Method {
        accessors.set(Accessors::GET, syntax.has_getter);
        accessors.set(Accessors::SET, syntax.has_setter);
    }

    let mut member = MemberDecl::new(syntax.name.as_str(), member_kind(syntax))
        .with_params(params)
        .with_return(return_type)
        .with_accessors(accessors)
        .with_span(syntax.span);
    member.visibility = syntax.visibility;
    member.foreign = syntax.foreign.as_ref().map(|f| ForeignImport {
        library: f.library.clone(),
        entry_point: f.entry_point.clone().unwrap_or_else(|| syntax.name.name.clone()),
    });
    member
}
