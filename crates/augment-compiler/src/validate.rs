//! Extended-type and member-form validation.
//!
//! Runs once per unit after its extended type and member signatures are
//! resolved. A unit with any error stays registered but is marked invalid and
//! never becomes visible.

use augment_core::{AugmentationUnit, TypeKind, TypeRef, ValidationError};
use augment_registry::SymbolRegistry;

/// Every rule `unit` breaks, one error per violation.
pub fn validate_unit(unit: &AugmentationUnit, registry: &SymbolRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(err) = check_extended_type(unit, registry) {
        errors.push(err);
    }
    check_members(unit, &mut errors);
    errors
}

fn check_extended_type(unit: &AugmentationUnit, registry: &SymbolRegistry) -> Option<ValidationError> {
    let name = unit.name.clone();
    let span = unit.span;
    let Some(extended) = &unit.extended_type else {
        return Some(ValidationError::MissingType { unit: name, span });
    };

    match extended {
        TypeRef::Pointer(_) => Some(ValidationError::PointerType { unit: name, span }),
        TypeRef::Array(_) => Some(ValidationError::ArrayType { unit: name, span }),
        TypeRef::Param(param) => Some(ValidationError::TypeParameter {
            unit: name,
            param: param.clone(),
            span,
        }),
        TypeRef::Dynamic => Some(ValidationError::DynamicType { unit: name, span }),
        TypeRef::Unresolved { name: written, ambiguous: true } => Some(ValidationError::AmbiguousType {
            unit: name,
            name: written.clone(),
            span,
        }),
        TypeRef::Unresolved { name: written, .. } => Some(ValidationError::UnknownType {
            unit: name,
            name: written.clone(),
            span,
        }),
        TypeRef::Void => Some(ValidationError::UnknownType {
            unit: name,
            name: "void".to_string(),
            span,
        }),
        TypeRef::Named(hash) => {
            let entry = registry.get(*hash)?;
            match entry.kind {
                TypeKind::Delegate => Some(ValidationError::DelegateType {
                    unit: name,
                    target: entry.name.clone(),
                    span,
                }),
                TypeKind::Augmentation => Some(ValidationError::AugmentationType {
                    unit: name,
                    target: entry.name.clone(),
                    span,
                }),
                _ => None,
            }
        }
    }
}

fn check_members(unit: &AugmentationUnit, errors: &mut Vec<ValidationError>) {
    for member in &unit.members {
        let span = member.span;
        if member.params.first().is_some_and(|p| p.is_receiver()) {
            errors.push(ValidationError::ReceiverParameter {
                unit: unit.name.clone(),
                member: member.name.clone(),
                span,
            });
        }

        if member.foreign.is_some() && !member.is_static() {
            errors.push(ValidationError::ForeignInstanceMember {
                unit: unit.name.clone(),
                member: member.name.clone(),
                span,
            });
        } else if unit.is_static_only && !member.is_static() {
            errors.push(ValidationError::InstanceMemberInStaticOnly {
                unit: unit.name.clone(),
                member: member.name.clone(),
                span,
            });
        }
    }
}
