//! Lexical scopes and scope chains.
//!
//! Each file root and each namespace block in a file is one [`LexicalScope`]
//! carrying the `using` directives written directly inside it. A
//! [`ScopeChain`] flattens a scope and its ancestors into levels, innermost
//! first. Namespaces that enclose a block without being opened by a block of
//! their own (`A` for `namespace A::B { }`) get a level with no imports.

use augment_core::{FileId, ScopeId};
use petgraph::graph::NodeIndex;

use crate::NamespaceTree;

/// One level of a scope chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLevel {
    /// Namespace whose own declarations are visible at this level.
    pub namespace: NodeIndex,
    /// Namespaces imported at this level, in directive order.
    pub imports: Vec<NodeIndex>,
}

/// Ordered levels from innermost to outermost.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeChain {
    levels: Vec<ScopeLevel>,
}

impl ScopeChain {
    pub fn new(levels: Vec<ScopeLevel>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[ScopeLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Innermost level at which a namespace's declarations are reachable,
    /// either as the level's own namespace or through one of its imports.
    pub fn depth_of(&self, namespace: NodeIndex) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.namespace == namespace || level.imports.contains(&namespace))
    }
}

/// A file root or namespace block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalScope {
    pub file: FileId,
    pub parent: Option<ScopeId>,
    pub namespace: NodeIndex,
    /// `using` paths as written, resolved into `imports` once every file is declared.
    pub using_paths: Vec<Vec<String>>,
    pub imports: Vec<NodeIndex>,
}

/// Every lexical scope of the compilation.
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    scopes: Vec<LexicalScope>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: FileId, parent: Option<ScopeId>, namespace: NodeIndex) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(LexicalScope {
            file,
            parent,
            namespace,
            using_paths: Vec::new(),
            imports: Vec::new(),
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&LexicalScope> {
        self.scopes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut LexicalScope> {
        self.scopes.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &LexicalScope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, scope)| (ScopeId(i as u32), scope))
    }

    /// First scope of `file` whose namespace is `namespace`.
    pub fn find(&self, file: FileId, namespace: NodeIndex) -> Option<ScopeId> {
        self.iter()
            .find(|(_, scope)| scope.file == file && scope.namespace == namespace)
            .map(|(id, _)| id)
    }

    /// Build the chain seen from inside `id`.
    pub fn chain(&self, id: ScopeId, tree: &NamespaceTree) -> ScopeChain {
        let mut levels = Vec::new();
        let mut current = self.get(id);

        while let Some(scope) = current {
            levels.push(ScopeLevel {
                namespace: scope.namespace,
                imports: scope.imports.clone(),
            });

            let parent = scope.parent.and_then(|p| self.get(p));
            let stop = parent.map(|p| p.namespace);
            let mut ns = tree.find_parent(scope.namespace);
            while let Some(node) = ns {
                if Some(node) == stop {
                    break;
                }
                levels.push(ScopeLevel {
                    namespace: node,
                    imports: Vec::new(),
                });
                ns = tree.find_parent(node);
            }

            current = parent;
        }

        ScopeChain::new(levels)
    }
}
