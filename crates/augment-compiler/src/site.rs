//! Use sites handed in by the surrounding semantic analysis.
//!
//! Receiver and argument expressions are already type-checked by the caller;
//! the engine only sees them as [`ExprId`] handles plus the receiver's static
//! type.

use augment_core::{ExprId, INDEXER_NAME, MemberCategory, ScopeId, SiteId, Span, TypeHash};

/// One source argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: ExprId,
    pub span: Span,
}

impl Argument {
    pub fn positional(value: ExprId) -> Self {
        Self {
            name: None,
            value,
            span: Span::default(),
        }
    }

    pub fn named(name: &str, value: ExprId) -> Self {
        Self {
            name: Some(name.to_string()),
            value,
            span: Span::default(),
        }
    }
}

/// How the member is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// `receiver.Member`
    Instance {
        receiver: ExprId,
        receiver_type: TypeHash,
    },
    /// `Type.Member`; the qualifier may be an augmentation unit's own type.
    Static { qualifier: TypeHash },
}

impl Access {
    pub fn is_static(&self) -> bool {
        matches!(self, Access::Static { .. })
    }

    /// The type lookup starts from.
    pub fn target_type(&self) -> TypeHash {
        match self {
            Access::Instance { receiver_type, .. } => *receiver_type,
            Access::Static { qualifier } => *qualifier,
        }
    }
}

/// What is done with the member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessShape {
    Invoke { args: Vec<Argument> },
    Get,
    Set { value: ExprId },
    IndexGet { args: Vec<Argument> },
    IndexSet { args: Vec<Argument>, value: ExprId },
    /// Conversion to a delegate. `arity` is the delegate's parameter count when known.
    MethodGroup { arity: Option<usize> },
}

impl AccessShape {
    pub fn category(&self) -> MemberCategory {
        match self {
            AccessShape::Invoke { .. } | AccessShape::MethodGroup { .. } => MemberCategory::Method,
            AccessShape::Get | AccessShape::Set { .. } => MemberCategory::Property,
            AccessShape::IndexGet { .. } | AccessShape::IndexSet { .. } => MemberCategory::Indexer,
        }
    }

    /// Arity used for lookup; `None` matches any parameter count.
    pub fn arity(&self) -> Option<usize> {
        match self {
            AccessShape::Invoke { args }
            | AccessShape::IndexGet { args }
            | AccessShape::IndexSet { args, .. } => Some(args.len()),
            AccessShape::Get | AccessShape::Set { .. } => Some(0),
            AccessShape::MethodGroup { arity } => *arity,
        }
    }

    pub fn args(&self) -> &[Argument] {
        match self {
            AccessShape::Invoke { args }
            | AccessShape::IndexGet { args }
            | AccessShape::IndexSet { args, .. } => args,
            _ => &[],
        }
    }

    /// Value assigned by a setter access.
    pub fn assigned_value(&self) -> Option<ExprId> {
        match self {
            AccessShape::Set { value } | AccessShape::IndexSet { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// A member access or call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSite {
    pub id: SiteId,
    pub span: Span,
    pub scope: ScopeId,
    pub access: Access,
    pub member: String,
    pub shape: AccessShape,
}

impl AccessSite {
    pub fn new(id: u32, scope: ScopeId, access: Access, member: &str, shape: AccessShape) -> Self {
        Self {
            id: SiteId(id),
            span: Span::default(),
            scope,
            access,
            member: member.to_string(),
            shape,
        }
    }

    /// `receiver[args]` or `receiver[args] = value`.
    pub fn indexer(id: u32, scope: ScopeId, access: Access, shape: AccessShape) -> Self {
        Self::new(id, scope, access, INDEXER_NAME, shape)
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// A syntactic construct resolved through a member protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolUse {
    /// `foreach (x in collection)`
    Iterate {
        collection: ExprId,
        collection_type: TypeHash,
    },
    /// `await operand`
    Await {
        operand: ExprId,
        operand_type: TypeHash,
    },
    /// `new T { e1, { e2, e3 } }`: one `Add` call per element.
    CollectionInit {
        target: ExprId,
        target_type: TypeHash,
        elements: Vec<Vec<Argument>>,
    },
}

/// A protocol use site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolSite {
    pub id: SiteId,
    pub span: Span,
    pub scope: ScopeId,
    pub usage: ProtocolUse,
}

impl ProtocolSite {
    pub fn new(id: u32, scope: ScopeId, usage: ProtocolUse) -> Self {
        Self {
            id: SiteId(id),
            span: Span::default(),
            scope,
            usage,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_arity_and_category() {
        let invoke = AccessShape::Invoke {
            args: vec![Argument::positional(ExprId(1)), Argument::named("b", ExprId(2))],
        };
        assert_eq!(invoke.arity(), Some(2));
        assert_eq!(invoke.category(), MemberCategory::Method);

        let set = AccessShape::Set { value: ExprId(3) };
        assert_eq!(set.arity(), Some(0));
        assert_eq!(set.assigned_value(), Some(ExprId(3)));

        let group = AccessShape::MethodGroup { arity: None };
        assert_eq!(group.arity(), None);
    }

    #[test]
    fn indexer_site_uses_item_name() {
        let site = AccessSite::indexer(
            0,
            ScopeId(0),
            Access::Static {
                qualifier: TypeHash::from_name("T"),
            },
            AccessShape::IndexGet { args: vec![] },
        );
        assert_eq!(site.member, "Item");
        assert_eq!(site.shape.category(), MemberCategory::Indexer);
    }
}
