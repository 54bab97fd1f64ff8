//! Member declarations shared by real types and augmentation units.

use bitflags::bitflags;
use ordered_float::OrderedFloat;
use std::fmt;

use crate::{Span, TypeRef, Visibility};

/// Compile-time constant used as a parameter default.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(OrderedFloat<f64>),
    String(String),
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Null => write!(f, "null"),
            ConstantValue::Bool(b) => write!(f, "{}", b),
            ConstantValue::Int(i) => write!(f, "{}", i),
            ConstantValue::Double(d) => write!(f, "{}", d),
            ConstantValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

bitflags! {
    /// Parameter modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u8 {
        /// Trailing parameter collecting the remaining positional arguments.
        const VARIADIC = 1 << 0;
        /// Classic receiver marker (`this T self`) on the first parameter.
        const RECEIVER = 1 << 1;
    }
}

bitflags! {
    /// Accessors declared by a property or indexer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Accessors: u8 {
        const GET = 1 << 0;
        const SET = 1 << 1;
    }
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<ConstantValue>,
    pub flags: ParamFlags,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            flags: ParamFlags::empty(),
        }
    }

    pub fn with_default(mut self, value: ConstantValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn variadic(mut self) -> Self {
        self.flags |= ParamFlags::VARIADIC;
        self
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    pub fn is_variadic(&self) -> bool {
        self.flags.contains(ParamFlags::VARIADIC)
    }

    #[inline]
    pub fn is_receiver(&self) -> bool {
        self.flags.contains(ParamFlags::RECEIVER)
    }
}

/// The syntactic category a lookup is performed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberCategory {
    Method,
    Property,
    Indexer,
}

/// Member variants.
///
/// A [`MemberKind::ForeignBinding`] is always static; a foreign import declared
/// without `static` is recorded as an instance method carrying a
/// [`ForeignImport`] and rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    InstanceMethod,
    InstanceProperty,
    InstanceIndexer,
    StaticMethod,
    StaticProperty,
    ForeignBinding,
}

impl MemberKind {
    pub fn is_static(self) -> bool {
        matches!(
            self,
            MemberKind::StaticMethod | MemberKind::StaticProperty | MemberKind::ForeignBinding
        )
    }

    pub fn is_instance(self) -> bool {
        !self.is_static()
    }

    pub fn category(self) -> MemberCategory {
        match self {
            MemberKind::InstanceMethod | MemberKind::StaticMethod | MemberKind::ForeignBinding => {
                MemberCategory::Method
            }
            MemberKind::InstanceProperty | MemberKind::StaticProperty => MemberCategory::Property,
            MemberKind::InstanceIndexer => MemberCategory::Indexer,
        }
    }
}

/// Target of a foreign-function binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignImport {
    pub library: String,
    pub entry_point: String,
}

/// The name indexers are looked up and lowered under.
pub const INDEXER_NAME: &str = "Item";

/// A member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberDecl {
    pub name: String,
    pub kind: MemberKind,
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub visibility: Visibility,
    pub accessors: Accessors,
    pub foreign: Option<ForeignImport>,
    pub span: Span,
}

impl MemberDecl {
    /// Create a member with no parameters, returning `void`.
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        let accessors = match kind.category() {
            MemberCategory::Method => Accessors::empty(),
            MemberCategory::Property | MemberCategory::Indexer => Accessors::GET | Accessors::SET,
        };
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
            return_type: TypeRef::Void,
            visibility: Visibility::Public,
            accessors,
            foreign: None,
            span: Span::default(),
        }
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn with_return(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    pub fn with_accessors(mut self, accessors: Accessors) -> Self {
        self.accessors = accessors;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.kind.is_static()
    }

    #[inline]
    pub fn category(&self) -> MemberCategory {
        self.kind.category()
    }

    pub fn has_getter(&self) -> bool {
        self.accessors.contains(Accessors::GET)
    }

    pub fn has_setter(&self) -> bool {
        self.accessors.contains(Accessors::SET)
    }

    /// Number of parameters that must be supplied.
    pub fn required_count(&self) -> usize {
        self.params
            .iter()
            .filter(|p| !p.has_default() && !p.is_variadic())
            .count()
    }

    /// Whether a trailing variadic parameter is declared.
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(Param::is_variadic)
    }

    /// Whether a call with `count` source arguments can target this member.
    ///
    /// Properties only accept zero arguments.
    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.category() == MemberCategory::Property {
            return count == 0;
        }
        if count < self.required_count() {
            return false;
        }
        self.is_variadic() || count <= self.params.len()
    }
}
