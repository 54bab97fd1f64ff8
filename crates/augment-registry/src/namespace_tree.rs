//! Namespace tree: the hierarchy every type and augmentation unit is declared in.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: [`NamespaceData`] (types and units declared at that level)
//! - Edges: `Contains(name)` from parent to child namespace
//!
//! `using` directives are not edges here. They are lexical (per file, per
//! namespace block) and live in the [`ScopeTable`](crate::ScopeTable).

use augment_core::{QualifiedName, RegistrationError, Span, TypeHash, UnitId};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::ScopeChain;

/// Result of a lookup that may be ambiguous.
pub enum ResolutionResult<T> {
    /// Exactly one match.
    Found(T),
    /// Several matches brought in by different imports at the same level.
    /// Holds the namespace each match came from.
    Ambiguous(Vec<(NodeIndex, T)>),
    NotFound,
}

impl<T: Clone> Clone for ResolutionResult<T> {
    fn clone(&self) -> Self {
        match self {
            ResolutionResult::Found(v) => ResolutionResult::Found(v.clone()),
            ResolutionResult::Ambiguous(v) => ResolutionResult::Ambiguous(v.clone()),
            ResolutionResult::NotFound => ResolutionResult::NotFound,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ResolutionResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionResult::Found(v) => f.debug_tuple("Found").field(v).finish(),
            ResolutionResult::Ambiguous(v) => f.debug_tuple("Ambiguous").field(v).finish(),
            ResolutionResult::NotFound => write!(f, "NotFound"),
        }
    }
}

impl<T: PartialEq> PartialEq for ResolutionResult<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResolutionResult::Found(a), ResolutionResult::Found(b)) => a == b,
            (ResolutionResult::Ambiguous(a), ResolutionResult::Ambiguous(b)) => a == b,
            (ResolutionResult::NotFound, ResolutionResult::NotFound) => true,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for ResolutionResult<T> {}

impl<T> ResolutionResult<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionResult::Found(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolutionResult::Ambiguous(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolutionResult::NotFound)
    }

    /// Convert to Option, returning Some only for `Found`.
    pub fn ok(self) -> Option<T> {
        match self {
            ResolutionResult::Found(v) => Some(v),
            _ => None,
        }
    }
}

/// Edge types in the namespace graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceEdge {
    /// Parent namespace contains child namespace with this simple name.
    Contains(String),
}

/// Data stored in each namespace node.
#[derive(Debug, Default)]
pub struct NamespaceData {
    /// Types (including augmentation units' own types) by simple name.
    pub types: FxHashMap<String, TypeHash>,
    /// Augmentation units declared directly in this namespace, in declaration order.
    pub units: Vec<UnitId>,
}

/// The namespace graph.
pub struct NamespaceTree {
    graph: DiGraph<NamespaceData, NamespaceEdge>,
    root: NodeIndex,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Create a tree holding only the global namespace.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::default());
        Self { graph, root }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn get_namespace(&self, node: NodeIndex) -> Option<&NamespaceData> {
        self.graph.node_weight(node)
    }

    pub fn find_child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.graph.edges(parent).find_map(|edge| match edge.weight() {
            NamespaceEdge::Contains(child) if child == name => Some(edge.target()),
            _ => None,
        })
    }

    pub fn get_or_create_child(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        if let Some(child) = self.find_child(parent, name) {
            return child;
        }
        let child = self.graph.add_node(NamespaceData::default());
        self.graph
            .add_edge(parent, child, NamespaceEdge::Contains(name.to_string()));
        child
    }

    /// Get or create a namespace path below `start`.
    pub fn get_or_create_path_from<S: AsRef<str>>(
        &mut self,
        start: NodeIndex,
        path: &[S],
    ) -> NodeIndex {
        path.iter().fold(start, |current, segment| {
            self.get_or_create_child(current, segment.as_ref())
        })
    }

    /// Get or create a namespace path from the root.
    pub fn get_or_create_path<S: AsRef<str>>(&mut self, path: &[S]) -> NodeIndex {
        self.get_or_create_path_from(self.root, path)
    }

    /// Follow an existing path below `start`.
    pub fn get_path_from<S: AsRef<str>>(&self, start: NodeIndex, path: &[S]) -> Option<NodeIndex> {
        let mut current = start;
        for segment in path {
            current = self.find_child(current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Follow an existing path from the root.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeIndex> {
        self.get_path_from(self.root, path)
    }

    pub fn find_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| edge.source())
            .next()
    }

    /// Simple name of a namespace node; `None` for the root.
    pub fn get_namespace_name(&self, node: NodeIndex) -> Option<&str> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| match edge.weight() {
                NamespaceEdge::Contains(name) => name.as_str(),
            })
            .next()
    }

    /// Full path of a namespace node, outermost first.
    pub fn get_namespace_path(&self, node: NodeIndex) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = node;
        while let Some(parent) = self.find_parent(current) {
            if let Some(name) = self.get_namespace_name(current) {
                path.push(name.to_string());
            }
            current = parent;
        }
        path.reverse();
        path
    }

    /// Qualified name string for a symbol declared in `ns_node`.
    pub fn qualified_name(&self, ns_node: NodeIndex, simple_name: &str) -> String {
        let path = self.get_namespace_path(ns_node);
        if path.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}::{}", path.join("::"), simple_name)
        }
    }

    // ========================================================================
    // Declaration
    // ========================================================================

    /// Record a type name in a namespace; fails on a duplicate simple name.
    ///
    /// The returned duplicate error carries a default span; callers attach the
    /// declaration's own.
    pub fn declare_type(
        &mut self,
        ns_node: NodeIndex,
        simple_name: &str,
        hash: TypeHash,
    ) -> Result<(), RegistrationError> {
        if self.contains_type(ns_node, simple_name) {
            return Err(RegistrationError::Duplicate {
                name: QualifiedName::new(simple_name, self.get_namespace_path(ns_node)),
                span: Span::default(),
            });
        }
        let data = self
            .graph
            .node_weight_mut(ns_node)
            .ok_or(RegistrationError::InvalidNamespace)?;
        data.types.insert(simple_name.to_string(), hash);
        Ok(())
    }

    /// Whether a simple name is already taken in a namespace.
    pub fn contains_type(&self, ns_node: NodeIndex, simple_name: &str) -> bool {
        self.graph
            .node_weight(ns_node)
            .is_some_and(|d| d.types.contains_key(simple_name))
    }

    pub fn declare_unit(&mut self, ns_node: NodeIndex, id: UnitId) -> Result<(), RegistrationError> {
        let data = self
            .graph
            .node_weight_mut(ns_node)
            .ok_or(RegistrationError::InvalidNamespace)?;
        data.units.push(id);
        Ok(())
    }

    // ========================================================================
    // Type Resolution
    // ========================================================================

    /// Resolve a type name written at a use site.
    ///
    /// For a simple name, each chain level (innermost first) is searched: the
    /// level's own namespace wins outright, then the namespaces imported at that
    /// level. Two imports at the same level supplying the name are ambiguous.
    /// A qualified name is tried relative to each level's namespace in turn,
    /// ending with the root.
    pub fn resolve_type<S: AsRef<str>>(
        &self,
        path: &[S],
        chain: &ScopeChain,
    ) -> ResolutionResult<TypeHash> {
        let Some((simple, prefix)) = path.split_last() else {
            return ResolutionResult::NotFound;
        };
        let simple = simple.as_ref();

        if !prefix.is_empty() {
            let starts = chain.levels().iter().map(|l| l.namespace);
            for start in starts.chain(std::iter::once(self.root)) {
                if let Some(hash) = self
                    .get_path_from(start, prefix)
                    .and_then(|ns| self.lookup_in(ns, simple))
                {
                    return ResolutionResult::Found(hash);
                }
            }
            return ResolutionResult::NotFound;
        }

        for level in chain.levels() {
            if let Some(hash) = self.lookup_in(level.namespace, simple) {
                return ResolutionResult::Found(hash);
            }

            let mut matches: Vec<(NodeIndex, TypeHash)> = Vec::new();
            for &import in &level.imports {
                if let Some(hash) = self.lookup_in(import, simple) {
                    if !matches.iter().any(|(_, h)| *h == hash) {
                        matches.push((import, hash));
                    }
                }
            }
            match matches.len() {
                0 => continue,
                1 => return ResolutionResult::Found(matches[0].1),
                _ => return ResolutionResult::Ambiguous(matches),
            }
        }

        ResolutionResult::NotFound
    }

    fn lookup_in(&self, ns_node: NodeIndex, simple_name: &str) -> Option<TypeHash> {
        self.graph
            .node_weight(ns_node)?
            .types
            .get(simple_name)
            .copied()
    }
}
