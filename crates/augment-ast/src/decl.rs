//! Declarations: files, namespaces, `using` directives, types and augmentations.
//!
//! Nodes are owned so a caller can build them from any front end. The fluent
//! constructors (`TypeDecl::class("Point").member(...)`) keep hand-built trees
//! short, which is how most callers outside a real parser produce them.

use augment_core::{ConstantValue, FileId, Span, Visibility};

use crate::{Ident, TypeExpr};

/// One compiled file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: FileId,
    pub name: String,
    pub items: Vec<Item>,
}

impl SourceFile {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: FileId(id),
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn item(mut self, item: impl Into<Item>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn using(self, path: &str) -> Self {
        self.item(UsingDirective::new(path))
    }
}

/// A top-level or namespace-level item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Namespace(NamespaceDecl),
    Using(UsingDirective),
    Type(TypeDecl),
    Augmentation(AugmentationDecl),
}

impl From<NamespaceDecl> for Item {
    fn from(decl: NamespaceDecl) -> Self {
        Item::Namespace(decl)
    }
}

impl From<UsingDirective> for Item {
    fn from(decl: UsingDirective) -> Self {
        Item::Using(decl)
    }
}

impl From<TypeDecl> for Item {
    fn from(decl: TypeDecl) -> Self {
        Item::Type(decl)
    }
}

impl From<AugmentationDecl> for Item {
    fn from(decl: AugmentationDecl) -> Self {
        Item::Augmentation(decl)
    }
}

/// `namespace A::B { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub path: Vec<Ident>,
    pub items: Vec<Item>,
    pub span: Span,
}

impl NamespaceDecl {
    pub fn new(path: &str) -> Self {
        Self {
            path: path
                .split("::")
                .filter(|s| !s.is_empty())
                .map(Ident::new)
                .collect(),
            items: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn item(mut self, item: impl Into<Item>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn using(self, path: &str) -> Self {
        self.item(UsingDirective::new(path))
    }
}

/// `using A::B;` Scoped to the enclosing file or namespace block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    pub path: Vec<Ident>,
    pub span: Span,
}

impl UsingDirective {
    pub fn new(path: &str) -> Self {
        Self {
            path: path
                .split("::")
                .filter(|s| !s.is_empty())
                .map(Ident::new)
                .collect(),
            span: Span::default(),
        }
    }
}

/// Kind of a real type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Class,
    Struct,
    Interface,
    Enum,
    StaticClass,
    Delegate,
}

/// A real type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: Ident,
    pub base: Option<TypeExpr>,
    pub members: Vec<MemberSyntax>,
    pub span: Span,
}

impl TypeDecl {
    pub fn new(kind: TypeDeclKind, name: &str) -> Self {
        Self {
            kind,
            name: Ident::new(name),
            base: None,
            members: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(TypeDeclKind::Class, name)
    }

    pub fn structure(name: &str) -> Self {
        Self::new(TypeDeclKind::Struct, name)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(TypeDeclKind::Interface, name)
    }

    pub fn enumeration(name: &str) -> Self {
        Self::new(TypeDeclKind::Enum, name)
    }

    pub fn static_class(name: &str) -> Self {
        Self::new(TypeDeclKind::StaticClass, name)
    }

    pub fn delegate(name: &str) -> Self {
        Self::new(TypeDeclKind::Delegate, name)
    }

    pub fn base(mut self, base: &str) -> Self {
        self.base = Some(TypeExpr::named(base));
        self
    }

    pub fn member(mut self, member: MemberSyntax) -> Self {
        self.members.push(member);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// `augmentation Name for Type { ... }`
///
/// `extended` is `None` when the declaration names no type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentationDecl {
    pub name: Ident,
    pub extended: Option<TypeExpr>,
    pub type_params: Vec<Ident>,
    pub members: Vec<MemberSyntax>,
    pub span: Span,
}

impl AugmentationDecl {
    pub fn new(name: &str, extended: TypeExpr) -> Self {
        Self {
            name: Ident::new(name),
            extended: Some(extended),
            type_params: Vec::new(),
            members: Vec::new(),
            span: Span::default(),
        }
    }

    /// Shorthand for extending a named type.
    pub fn extending(name: &str, target: &str) -> Self {
        Self::new(name, TypeExpr::named(target))
    }

    /// A declaration that names no extended type.
    pub fn without_target(name: &str) -> Self {
        Self {
            name: Ident::new(name),
            extended: None,
            type_params: Vec::new(),
            members: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn type_param(mut self, name: &str) -> Self {
        self.type_params.push(Ident::new(name));
        self
    }

    pub fn member(mut self, member: MemberSyntax) -> Self {
        self.members.push(member);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Syntactic member form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberSyntaxKind {
    Method,
    Property,
    Indexer,
}

/// `[DllImport("lib", EntryPoint = "...")]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignAttr {
    pub library: String,
    pub entry_point: Option<String>,
}

/// A member as declared inside a type or augmentation body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSyntax {
    pub kind: MemberSyntaxKind,
    pub name: Ident,
    pub is_static: bool,
    pub params: Vec<ParamSyntax>,
    pub return_type: Option<TypeExpr>,
    pub has_getter: bool,
    pub has_setter: bool,
    pub visibility: Visibility,
    pub foreign: Option<ForeignAttr>,
    pub span: Span,
}

impl MemberSyntax {
    fn new(kind: MemberSyntaxKind, name: &str) -> Self {
        let accessors = kind != MemberSyntaxKind::Method;
        Self {
            kind,
            name: Ident::new(name),
            is_static: false,
            params: Vec::new(),
            return_type: None,
            has_getter: accessors,
            has_setter: accessors,
            visibility: Visibility::Public,
            foreign: None,
            span: Span::default(),
        }
    }

    pub fn method(name: &str) -> Self {
        Self::new(MemberSyntaxKind::Method, name)
    }

    /// A property with the given type and both accessors.
    pub fn property(name: &str, ty: &str) -> Self {
        Self::new(MemberSyntaxKind::Property, name).returns(ty)
    }

    /// An indexer (`this[...]`) with both accessors.
    pub fn indexer(ty: &str) -> Self {
        Self::new(MemberSyntaxKind::Indexer, augment_core::INDEXER_NAME).returns(ty)
    }

    pub fn make_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn param(mut self, param: ParamSyntax) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: &str) -> Self {
        self.return_type = Some(TypeExpr::named(ty));
        self
    }

    pub fn returns_type(mut self, ty: TypeExpr) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn get_only(mut self) -> Self {
        self.has_setter = false;
        self
    }

    pub fn set_only(mut self) -> Self {
        self.has_getter = false;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn foreign(mut self, library: &str, entry_point: Option<&str>) -> Self {
        self.foreign = Some(ForeignAttr {
            library: library.to_string(),
            entry_point: entry_point.map(str::to_string),
        });
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSyntax {
    pub name: Ident,
    pub ty: TypeExpr,
    pub default: Option<ConstantValue>,
    pub is_variadic: bool,
    /// Classic receiver marker (`this T self`).
    pub is_receiver: bool,
    pub span: Span,
}

impl ParamSyntax {
    pub fn new(name: &str, ty: &str) -> Self {
        Self::typed(name, TypeExpr::named(ty))
    }

    pub fn typed(name: &str, ty: TypeExpr) -> Self {
        Self {
            name: Ident::new(name),
            ty,
            default: None,
            is_variadic: false,
            is_receiver: false,
            span: Span::default(),
        }
    }

    pub fn default_value(mut self, value: ConstantValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the parameter as the variadic tail; its type becomes `ty[]`.
    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self.ty = TypeExpr::array(self.ty);
        self
    }

    pub fn receiver(mut self) -> Self {
        self.is_receiver = true;
        self
    }
}
