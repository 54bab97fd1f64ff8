//! Registry crate: namespace hierarchy, lexical scopes and the symbol registry
//! that indexes augmentation units by the type they extend.

mod namespace_tree;
mod registry;
mod scope;

pub use namespace_tree::{NamespaceData, NamespaceEdge, NamespaceTree, ResolutionResult};
pub use registry::SymbolRegistry;
pub use scope::{LexicalScope, ScopeChain, ScopeLevel, ScopeTable};

pub use petgraph::graph::NodeIndex;
