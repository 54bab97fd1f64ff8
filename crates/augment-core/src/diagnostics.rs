//! Collected diagnostics.
//!
//! Nothing in the engine is fatal: registration and resolution push
//! [`Diagnostic`]s into a [`Diagnostics`] collection and keep going. Kinds are a
//! closed set; the message text is informative only.

use std::fmt;

use crate::{QualifiedName, Span};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// Extended type is a pointer, array, open type parameter, dynamic, delegate,
    /// another augmentation, or does not resolve to exactly one type.
    ExtendedTypeInvalid,
    /// The augmentation declaration names no type.
    ExtendedTypeMissing,
    /// A member inside an augmentation unit uses the classic receiver parameter.
    ExtensionMethodFormInExtensionUnit,
    /// Instance member added to a static-only type.
    InstanceMemberInStaticOnlyExtension,
    /// Foreign binding declared without `static`.
    ForeignBindingOnInstanceMember,
    /// Two units at the same visibility depth supply the member.
    AmbiguousAugmentationMember,
    MemberNotFound,
    /// Arguments could not be bound to the target's parameters.
    ArgumentMismatch,
    /// The property or indexer lacks the accessor the access needs.
    AccessorMissing,
    /// Two declarations share a qualified name.
    DuplicateDeclaration,
    /// An augmentation member collides with a real member and is unreachable.
    AugmentationMemberShadowed,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::AugmentationMemberShadowed => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    /// Augmentation units involved, in declaration order.
    pub units: Vec<QualifiedName>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            units: Vec::new(),
            message: message.into(),
        }
    }

    pub fn with_units(mut self, units: Vec<QualifiedName>) -> Self {
        self.units = units;
        self
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}[{}]: {}",
            self.span.file,
            self.span,
            self.severity(),
            self.kind,
            self.message
        )
    }
}

/// A collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.items.push(diagnostic.into());
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.len() - self.error_count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics of one kind, in collection order.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Stable sort by file, line, column, then kind.
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            a.span
                .sort_key()
                .cmp(&b.span.sort_key())
                .then(a.kind.cmp(&b.kind))
        });
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.items {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}
