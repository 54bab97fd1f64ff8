//! Error types for each phase of augmentation processing.
//!
//! ```text
//! RegistrationError - duplicate declarations while building the registry
//! ValidationError   - illegal extended types and member forms
//! ResolutionError   - per-site lookup failures
//! BindingError      - arguments that cannot be bound to a parameter list
//! ```
//!
//! Every error converts into a [`Diagnostic`]; the passes collect them instead of
//! returning early.

use thiserror::Error;

use crate::{Diagnostic, DiagnosticKind, QualifiedName, Span};

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type or unit with this qualified name already exists.
    #[error("at {span}: '{name}' is already declared")]
    Duplicate { name: QualifiedName, span: Span },

    /// A namespace node was missing from the tree.
    #[error("invalid namespace")]
    InvalidNamespace,
}

impl RegistrationError {
    pub fn span(&self) -> Span {
        match self {
            RegistrationError::Duplicate { span, .. } => *span,
            RegistrationError::InvalidNamespace => Span::default(),
        }
    }
}

impl From<RegistrationError> for Diagnostic {
    fn from(err: RegistrationError) -> Self {
        Diagnostic::new(DiagnosticKind::DuplicateDeclaration, err.span(), err.to_string())
    }
}

// ============================================================================
// Validation Errors
// ============================================================================

/// Illegal shapes rejected when an augmentation unit is registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at {span}: '{unit}' cannot extend a pointer type")]
    PointerType { unit: QualifiedName, span: Span },

    #[error("at {span}: '{unit}' cannot extend an array type")]
    ArrayType { unit: QualifiedName, span: Span },

    #[error("at {span}: '{unit}' cannot extend type parameter '{param}'")]
    TypeParameter {
        unit: QualifiedName,
        param: String,
        span: Span,
    },

    #[error("at {span}: '{unit}' cannot extend the dynamic type")]
    DynamicType { unit: QualifiedName, span: Span },

    #[error("at {span}: '{unit}' cannot extend delegate type '{target}'")]
    DelegateType {
        unit: QualifiedName,
        target: QualifiedName,
        span: Span,
    },

    #[error("at {span}: '{unit}' cannot extend augmentation '{target}'")]
    AugmentationType {
        unit: QualifiedName,
        target: QualifiedName,
        span: Span,
    },

    #[error("at {span}: '{unit}' extends unknown type '{name}'")]
    UnknownType {
        unit: QualifiedName,
        name: String,
        span: Span,
    },

    #[error("at {span}: '{unit}' extends '{name}', which is ambiguous")]
    AmbiguousType {
        unit: QualifiedName,
        name: String,
        span: Span,
    },

    #[error("at {span}: '{unit}' does not name a type to extend")]
    MissingType { unit: QualifiedName, span: Span },

    #[error("at {span}: '{member}' in '{unit}' must not declare a receiver parameter")]
    ReceiverParameter {
        unit: QualifiedName,
        member: String,
        span: Span,
    },

    #[error("at {span}: '{unit}' extends a static type and cannot declare instance member '{member}'")]
    InstanceMemberInStaticOnly {
        unit: QualifiedName,
        member: String,
        span: Span,
    },

    #[error("at {span}: foreign binding '{member}' in '{unit}' must be static")]
    ForeignInstanceMember {
        unit: QualifiedName,
        member: String,
        span: Span,
    },
}

impl ValidationError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ValidationError::PointerType { .. }
            | ValidationError::ArrayType { .. }
            | ValidationError::TypeParameter { .. }
            | ValidationError::DynamicType { .. }
            | ValidationError::DelegateType { .. }
            | ValidationError::AugmentationType { .. }
            | ValidationError::UnknownType { .. }
            | ValidationError::AmbiguousType { .. } => DiagnosticKind::ExtendedTypeInvalid,
            ValidationError::MissingType { .. } => DiagnosticKind::ExtendedTypeMissing,
            ValidationError::ReceiverParameter { .. } => {
                DiagnosticKind::ExtensionMethodFormInExtensionUnit
            }
            ValidationError::InstanceMemberInStaticOnly { .. } => {
                DiagnosticKind::InstanceMemberInStaticOnlyExtension
            }
            ValidationError::ForeignInstanceMember { .. } => {
                DiagnosticKind::ForeignBindingOnInstanceMember
            }
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ValidationError::PointerType { span, .. }
            | ValidationError::ArrayType { span, .. }
            | ValidationError::TypeParameter { span, .. }
            | ValidationError::DynamicType { span, .. }
            | ValidationError::DelegateType { span, .. }
            | ValidationError::AugmentationType { span, .. }
            | ValidationError::UnknownType { span, .. }
            | ValidationError::AmbiguousType { span, .. }
            | ValidationError::MissingType { span, .. }
            | ValidationError::ReceiverParameter { span, .. }
            | ValidationError::InstanceMemberInStaticOnly { span, .. }
            | ValidationError::ForeignInstanceMember { span, .. } => *span,
        }
    }

    /// The unit the error was raised for.
    pub fn unit(&self) -> &QualifiedName {
        match self {
            ValidationError::PointerType { unit, .. }
            | ValidationError::ArrayType { unit, .. }
            | ValidationError::TypeParameter { unit, .. }
            | ValidationError::DynamicType { unit, .. }
            | ValidationError::DelegateType { unit, .. }
            | ValidationError::AugmentationType { unit, .. }
            | ValidationError::UnknownType { unit, .. }
            | ValidationError::AmbiguousType { unit, .. }
            | ValidationError::MissingType { unit, .. }
            | ValidationError::ReceiverParameter { unit, .. }
            | ValidationError::InstanceMemberInStaticOnly { unit, .. }
            | ValidationError::ForeignInstanceMember { unit, .. } => unit,
        }
    }
}

impl From<ValidationError> for Diagnostic {
    fn from(err: ValidationError) -> Self {
        let units = vec![err.unit().clone()];
        Diagnostic::new(err.kind(), err.span(), err.to_string()).with_units(units)
    }
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// Per-site lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("at {span}: '{member}' is ambiguous between {}", join_units(.units))]
    Ambiguous {
        member: String,
        units: Vec<QualifiedName>,
        span: Span,
    },

    #[error("at {span}: '{type_name}' has no member '{member}' taking {arity} argument(s)")]
    NotFound {
        type_name: QualifiedName,
        member: String,
        arity: usize,
        span: Span,
    },

    #[error("at {span}: '{member}' has no {accessor} accessor")]
    AccessorMissing {
        member: String,
        accessor: &'static str,
        span: Span,
    },
}

fn join_units(units: &[QualifiedName]) -> String {
    units
        .iter()
        .map(|u| format!("'{}'", u))
        .collect::<Vec<_>>()
        .join(" and ")
}

impl ResolutionError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ResolutionError::Ambiguous { .. } => DiagnosticKind::AmbiguousAugmentationMember,
            ResolutionError::NotFound { .. } => DiagnosticKind::MemberNotFound,
            ResolutionError::AccessorMissing { .. } => DiagnosticKind::AccessorMissing,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ResolutionError::Ambiguous { span, .. }
            | ResolutionError::NotFound { span, .. }
            | ResolutionError::AccessorMissing { span, .. } => *span,
        }
    }
}

impl From<ResolutionError> for Diagnostic {
    fn from(err: ResolutionError) -> Self {
        let units = match &err {
            ResolutionError::Ambiguous { units, .. } => units.clone(),
            _ => Vec::new(),
        };
        Diagnostic::new(err.kind(), err.span(), err.to_string()).with_units(units)
    }
}

// ============================================================================
// Binding Errors
// ============================================================================

/// Arguments that cannot be bound to a parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("at {span}: positional argument follows a named argument")]
    PositionalAfterNamed { span: Span },

    #[error("at {span}: no parameter named '{name}'")]
    UnknownParameter { name: String, span: Span },

    #[error("at {span}: parameter '{name}' is bound more than once")]
    DuplicateArgument { name: String, span: Span },

    #[error("at {span}: no argument given for required parameter '{name}'")]
    MissingArgument { name: String, span: Span },

    #[error("at {span}: expected at most {expected} argument(s), found {found}")]
    TooManyArguments {
        expected: usize,
        found: usize,
        span: Span,
    },
}

impl BindingError {
    pub fn span(&self) -> Span {
        match self {
            BindingError::PositionalAfterNamed { span }
            | BindingError::UnknownParameter { span, .. }
            | BindingError::DuplicateArgument { span, .. }
            | BindingError::MissingArgument { span, .. }
            | BindingError::TooManyArguments { span, .. } => *span,
        }
    }
}

impl From<BindingError> for Diagnostic {
    fn from(err: BindingError) -> Self {
        Diagnostic::new(DiagnosticKind::ArgumentMismatch, err.span(), err.to_string())
    }
}
