//! Type expressions as written in source.

use augment_core::Span;
use std::fmt;

use crate::Ident;

/// A type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A possibly qualified name: `Point`, `Geometry::Point`.
    Named { path: Vec<Ident>, span: Span },
    /// `T*`
    Pointer { inner: Box<TypeExpr>, span: Span },
    /// `T[]`
    Array { element: Box<TypeExpr>, span: Span },
    /// `dynamic`
    Dynamic { span: Span },
}

impl TypeExpr {
    /// A named type from a `::`-separated string.
    pub fn named(path: &str) -> Self {
        Self::Named {
            path: path
                .split("::")
                .filter(|s| !s.is_empty())
                .map(Ident::new)
                .collect(),
            span: Span::default(),
        }
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        Self::Pointer {
            inner: Box::new(inner),
            span: Span::default(),
        }
    }

    pub fn array(element: TypeExpr) -> Self {
        Self::Array {
            element: Box::new(element),
            span: Span::default(),
        }
    }

    pub fn dynamic() -> Self {
        Self::Dynamic {
            span: Span::default(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named { span, .. }
            | TypeExpr::Pointer { span, .. }
            | TypeExpr::Array { span, .. }
            | TypeExpr::Dynamic { span } => *span,
        }
    }

    /// The single identifier of an unqualified name, if this is one.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { path, .. } if path.len() == 1 => Some(path[0].name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named { path, .. } => {
                for (i, ident) in path.iter().enumerate() {
                    if i > 0 {
                        write!(f, "::")?;
                    }
                    write!(f, "{}", ident.name)?;
                }
                Ok(())
            }
            TypeExpr::Pointer { inner, .. } => write!(f, "{}*", inner),
            TypeExpr::Array { element, .. } => write!(f, "{}[]", element),
            TypeExpr::Dynamic { .. } => write!(f, "dynamic"),
        }
    }
}
