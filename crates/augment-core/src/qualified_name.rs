use std::fmt;

/// Qualified name for type and augmentation-unit identity.
///
/// # Examples
///
/// ```
/// use augment_core::QualifiedName;
///
/// let point = QualifiedName::global("Point");
/// assert_eq!(point.to_string(), "Point");
///
/// let ext = QualifiedName::new("PointExt", vec!["Geometry".into()]);
/// assert_eq!(ext.to_string(), "Geometry::PointExt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Simple name (e.g., "Point").
    pub name: String,
    /// Namespace path (e.g., ["Geometry"]). Empty for the global namespace.
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Create from a qualified string (e.g., "Geometry::Point").
    ///
    /// A leading "::" is ignored: "::A::B" == "A::B".
    pub fn from_qualified_string(s: &str) -> Self {
        let parts: Vec<&str> = s.split("::").filter(|p| !p.is_empty()).collect();
        match parts.split_last() {
            None => Self::global(""),
            Some((name, namespace)) => Self {
                name: (*name).to_string(),
                namespace: namespace.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the namespace path.
    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    /// Get the namespace as a joined string.
    pub fn namespace_string(&self) -> String {
        self.namespace.join("::")
    }

    /// Compute the [`TypeHash`](crate::TypeHash) of this name.
    pub fn to_type_hash(&self) -> crate::TypeHash {
        crate::TypeHash::from_name(&self.to_string())
    }

    /// Dotted form used when printing lowered call targets (`Geometry.PointExt`).
    pub fn dotted(&self) -> String {
        let mut out = String::new();
        for segment in &self.namespace {
            out.push_str(segment);
            out.push('.');
        }
        out.push_str(&self.name);
        out
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}
