//! Lowering resolved accesses into explicit call forms.
//!
//! Every access becomes a [`LoweredAccess`]: a prelude of temporaries that the
//! code generator evaluates left to right (receiver, then source-order
//! arguments, then the assigned value) followed by one [`CallForm`] that only
//! refers to those temporaries. Nothing is evaluated here.
//!
//! Augmentation members are lowered to static calls on the unit's own type:
//!
//! ```text
//! p.Length()          =>  PointExt.Length(p)
//! p.Norm              =>  PointExt.get_Norm(p)
//! p.Norm = v          =>  PointExt.set_Norm(p, v)
//! grid[i, j] = v      =>  GridExt.set_Item(grid, i, j, v)
//! Action a = p.Length =>  delegate PointExt.Length bound to p
//! ```

use std::fmt;

use augment_core::{
    AugmentationUnit, ConstantValue, Diagnostics, ExprId, ForeignImport, MemberCategory, MemberDecl,
    QualifiedName, ResolutionError, SiteId, TypeHash, TypeRef,
};
use augment_registry::SymbolRegistry;

use crate::binder::{BoundSlot, bind};
use crate::protocol::{ProtocolMatch, ProtocolSlot};
use crate::resolve::{MemberQuery, Resolution};
use crate::site::{Access, AccessShape, AccessSite, Argument};

// ============================================================================
// Temporaries and operands
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TempId(pub u32);

/// Expression a temporary is initialized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempSource {
    Receiver(ExprId),
    Argument(ExprId),
    AssignedValue(ExprId),
}

impl TempSource {
    pub fn expr(&self) -> ExprId {
        match self {
            TempSource::Receiver(e) | TempSource::Argument(e) | TempSource::AssignedValue(e) => *e,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temp {
    pub id: TempId,
    pub source: TempSource,
}

/// A value passed to a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Temp(TempId),
    /// A parameter's default, filled in at the call.
    Default(ConstantValue),
    /// Temporaries packed into the variadic tail.
    Sequence(Vec<TempId>),
    /// A value produced while running a protocol (enumerator, awaiter, ...).
    Slot(ProtocolSlot),
}

#[derive(Debug, Default)]
struct PreludeBuilder {
    temps: Vec<Temp>,
}

impl PreludeBuilder {
    fn push(&mut self, source: TempSource) -> TempId {
        let id = TempId(self.temps.len() as u32);
        self.temps.push(Temp { id, source });
        id
    }

    fn arguments(&mut self, args: &[Argument]) -> Vec<TempId> {
        args.iter()
            .map(|arg| self.push(TempSource::Argument(arg.value)))
            .collect()
    }

    fn finish(self) -> Vec<Temp> {
        self.temps
    }
}

// ============================================================================
// Call forms
// ============================================================================

/// What is done with the resolved member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Invoke,
    Get,
    Set,
    IndexGet,
    IndexSet,
    MethodGroup,
}

impl AccessKind {
    pub fn from_shape(shape: &AccessShape) -> Self {
        match shape {
            AccessShape::Invoke { .. } => AccessKind::Invoke,
            AccessShape::Get => AccessKind::Get,
            AccessShape::Set { .. } => AccessKind::Set,
            AccessShape::IndexGet { .. } => AccessKind::IndexGet,
            AccessShape::IndexSet { .. } => AccessKind::IndexSet,
            AccessShape::MethodGroup { .. } => AccessKind::MethodGroup,
        }
    }

    fn is_setter(self) -> bool {
        matches!(self, AccessKind::Set | AccessKind::IndexSet)
    }

    fn is_getter(self) -> bool {
        matches!(self, AccessKind::Get | AccessKind::IndexGet)
    }

    /// Emitted symbol for a member reached this way.
    pub fn symbol(self, member: &str) -> String {
        if self.is_getter() {
            format!("get_{}", member)
        } else if self.is_setter() {
            format!("set_{}", member)
        } else {
            member.to_string()
        }
    }
}

/// A static entry point on an augmentation unit's own type, with the
/// receiver-explicit signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTarget {
    pub owner: TypeHash,
    pub owner_name: QualifiedName,
    pub symbol: String,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
}

impl CallTarget {
    fn for_member(unit: &AugmentationUnit, member: &MemberDecl, kind: AccessKind) -> Self {
        let mut params = Vec::with_capacity(member.params.len() + 2);
        if !member.is_static() {
            params.push(unit.extended_type.clone().unwrap_or(TypeRef::Void));
        }
        params.extend(member.params.iter().map(|p| p.ty.clone()));
        let return_type = if kind.is_setter() {
            params.push(member.return_type.clone());
            TypeRef::Void
        } else {
            member.return_type.clone()
        };

        Self {
            owner: unit.hash,
            owner_name: unit.name.clone(),
            symbol: kind.symbol(&member.name),
            params,
            return_type,
        }
    }

    /// Human-readable signature, e.g. `PointExt.get_Norm(Point)`.
    pub fn describe(&self, registry: &SymbolRegistry) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|ty| TypeDisplay { ty, registry }.to_string())
            .collect();
        format!("{}.{}({})", self.owner_name, self.symbol, params.join(", "))
    }
}

struct TypeDisplay<'a> {
    ty: &'a TypeRef,
    registry: &'a SymbolRegistry,
}

impl<'a> TypeDisplay<'a> {
    fn nested(&self, ty: &'a TypeRef) -> TypeDisplay<'a> {
        TypeDisplay {
            ty,
            registry: self.registry,
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Named(hash) => match self.registry.type_name(*hash) {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "{}", hash),
            },
            TypeRef::Pointer(inner) => write!(f, "{}*", self.nested(inner)),
            TypeRef::Array(inner) => write!(f, "{}[]", self.nested(inner)),
            TypeRef::Param(name) => write!(f, "{}", name),
            TypeRef::Dynamic => write!(f, "dynamic"),
            TypeRef::Unresolved { name, .. } => write!(f, "{}", name),
        }
    }
}

/// Final shape of one access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallForm {
    /// Ordinary access to a real member, unchanged apart from argument binding.
    Real {
        owner: TypeHash,
        member: String,
        access: AccessKind,
        receiver: Option<Operand>,
        args: Vec<Operand>,
    },
    /// Static call on an augmentation unit; receiver (if any) is `args[0]`.
    Static { target: CallTarget, args: Vec<Operand> },
    /// Direct call through a foreign binding.
    Foreign {
        target: CallTarget,
        import: ForeignImport,
        args: Vec<Operand>,
    },
    /// Method-group conversion. A receiver makes the callable bound.
    Delegate {
        target: CallTarget,
        receiver: Option<Operand>,
    },
    /// The access failed; a diagnostic was reported.
    Error,
}

impl CallForm {
    pub fn is_error(&self) -> bool {
        matches!(self, CallForm::Error)
    }

    pub fn target(&self) -> Option<&CallTarget> {
        match self {
            CallForm::Static { target, .. }
            | CallForm::Foreign { target, .. }
            | CallForm::Delegate { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// One lowered access site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredAccess {
    pub site: SiteId,
    pub prelude: Vec<Temp>,
    pub form: CallForm,
}

/// Build a call form for a resolved member.
///
/// `args` are already in parameter order and, for setters, end with the
/// assigned value.
fn call_form(resolution: &Resolution<'_>, kind: AccessKind, receiver: Option<Operand>, args: Vec<Operand>) -> CallForm {
    match resolution {
        Resolution::RealMember { owner, member } => CallForm::Real {
            owner: owner.hash,
            member: member.name.clone(),
            access: kind,
            receiver,
            args,
        },
        Resolution::AugmentationMember { unit, member } => {
            let target = CallTarget::for_member(unit, member, kind);
            let receiver = if member.is_static() { None } else { receiver };
            if kind == AccessKind::MethodGroup {
                return CallForm::Delegate { target, receiver };
            }
            let mut call_args = Vec::with_capacity(args.len() + 1);
            call_args.extend(receiver);
            call_args.extend(args);
            match &member.foreign {
                Some(import) => CallForm::Foreign {
                    target,
                    import: import.clone(),
                    args: call_args,
                },
                None => CallForm::Static {
                    target,
                    args: call_args,
                },
            }
        }
        Resolution::Ambiguous(_) | Resolution::NotFound => CallForm::Error,
    }
}

fn check_accessor(member: &MemberDecl, kind: AccessKind, site: &AccessSite) -> Result<(), ResolutionError> {
    if member.category() == MemberCategory::Method {
        return Ok(());
    }
    let missing = if kind.is_getter() && !member.has_getter() {
        Some("get")
    } else if kind.is_setter() && !member.has_setter() {
        Some("set")
    } else {
        None
    };
    match missing {
        Some(accessor) => Err(ResolutionError::AccessorMissing {
            member: member.name.clone(),
            accessor,
            span: site.span,
        }),
        None => Ok(()),
    }
}

/// Lower one access site. Failures are pushed to `diagnostics` and produce
/// [`CallForm::Error`] with the prelude still intact.
pub fn lower_access(
    registry: &SymbolRegistry,
    site: &AccessSite,
    resolution: &Resolution<'_>,
    diagnostics: &mut Diagnostics,
) -> LoweredAccess {
    let mut prelude = PreludeBuilder::default();
    let receiver = match site.access {
        Access::Instance { receiver, .. } => Some(prelude.push(TempSource::Receiver(receiver))),
        Access::Static { .. } => None,
    };
    let arg_temps = prelude.arguments(site.shape.args());
    let value = site
        .shape
        .assigned_value()
        .map(|v| prelude.push(TempSource::AssignedValue(v)));
    let prelude = prelude.finish();

    let kind = AccessKind::from_shape(&site.shape);
    let failed = |diagnostics: &mut Diagnostics, err: ResolutionError| {
        diagnostics.push(err);
        LoweredAccess {
            site: site.id,
            prelude: prelude.clone(),
            form: CallForm::Error,
        }
    };

    let Some(member) = resolution.member() else {
        let query = MemberQuery::for_site(site);
        if let Some(err) = resolution.to_error(registry, &query, site.span) {
            return failed(diagnostics, err);
        }
        return failed(diagnostics, ResolutionError::NotFound {
            type_name: QualifiedName::global(site.access.target_type().to_string()),
            member: site.member.clone(),
            arity: 0,
            span: site.span,
        });
    };

    if let Err(err) = check_accessor(member, kind, site) {
        return failed(diagnostics, err);
    }

    let mut args = Vec::new();
    if kind != AccessKind::MethodGroup && member.category() != MemberCategory::Property {
        match bind(&member.params, site.shape.args(), site.span) {
            Ok(bound) => args.extend(bound.slots.into_iter().map(|slot| match slot {
                BoundSlot::Arg(i) => Operand::Temp(arg_temps[i]),
                BoundSlot::Default(value) => Operand::Default(value),
                BoundSlot::Variadic(items) => Operand::Sequence(items.into_iter().map(|i| arg_temps[i]).collect()),
            })),
            Err(err) => {
                diagnostics.push(err);
                return LoweredAccess {
                    site: site.id,
                    prelude,
                    form: CallForm::Error,
                };
            }
        }
    }
    args.extend(value.map(Operand::Temp));

    let form = call_form(resolution, kind, receiver.map(Operand::Temp), args);
    LoweredAccess {
        site: site.id,
        prelude,
        form,
    }
}

// ============================================================================
// Protocol plans
// ============================================================================

/// `foreach (x in c) body`
///
/// ```text
/// e = GetEnumerator(c)
/// while MoveNext(e) { x = Current(e); body }
/// Dispose(e)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationPlan {
    pub get_enumerator: CallForm,
    pub move_next: CallForm,
    pub current: CallForm,
    pub dispose: Option<CallForm>,
    pub reset: Option<CallForm>,
}

/// `await x`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitPlan {
    pub get_awaiter: CallForm,
    pub is_completed: CallForm,
    pub get_result: CallForm,
    pub on_completed: CallForm,
}

/// `new T { a, { b, c } }`: one `Add` per element, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInitPlan {
    pub adds: Vec<CallForm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolPlan {
    Iteration(IterationPlan),
    Await(AwaitPlan),
    CollectionInit(CollectionInitPlan),
    Error,
}

/// One lowered protocol use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredProtocol {
    pub site: SiteId,
    pub prelude: Vec<Temp>,
    pub plan: ProtocolPlan,
}

fn step_form(found: &ProtocolMatch<'_>, name: &str, receiver: Operand, args: Vec<Operand>) -> Option<CallForm> {
    let step = found.step(name)?;
    let kind = match step.step.category {
        MemberCategory::Property => AccessKind::Get,
        _ => AccessKind::Invoke,
    };
    Some(call_form(&step.resolution, kind, Some(receiver), args))
}

/// Lower a discovered iteration protocol. `subject` is the collection temporary.
pub fn lower_iteration(found: &ProtocolMatch<'_>, subject: TempId) -> IterationPlan {
    let enumerator = || Operand::Slot(ProtocolSlot::Enumerator);
    IterationPlan {
        get_enumerator: step_form(found, "GetEnumerator", Operand::Temp(subject), Vec::new())
            .unwrap_or(CallForm::Error),
        move_next: step_form(found, "MoveNext", enumerator(), Vec::new()).unwrap_or(CallForm::Error),
        current: step_form(found, "Current", enumerator(), Vec::new()).unwrap_or(CallForm::Error),
        dispose: step_form(found, "Dispose", enumerator(), Vec::new()),
        reset: step_form(found, "Reset", enumerator(), Vec::new()),
    }
}

/// Lower a discovered await protocol. `subject` is the awaited temporary.
pub fn lower_await(found: &ProtocolMatch<'_>, subject: TempId) -> AwaitPlan {
    let awaiter = || Operand::Slot(ProtocolSlot::Awaiter);
    AwaitPlan {
        get_awaiter: step_form(found, "GetAwaiter", Operand::Temp(subject), Vec::new())
            .unwrap_or(CallForm::Error),
        is_completed: step_form(found, "IsCompleted", awaiter(), Vec::new()).unwrap_or(CallForm::Error),
        get_result: step_form(found, "GetResult", awaiter(), Vec::new()).unwrap_or(CallForm::Error),
        on_completed: step_form(
            found,
            "OnCompleted",
            awaiter(),
            vec![Operand::Slot(ProtocolSlot::Continuation)],
        )
        .unwrap_or(CallForm::Error),
    }
}

/// Lower one collection-initializer element into an `Add` call.
pub fn lower_collection_add(
    site: &AccessSite,
    resolution: &Resolution<'_>,
    registry: &SymbolRegistry,
    target: TempId,
    element_temps: &[TempId],
    diagnostics: &mut Diagnostics,
) -> CallForm {
    let Some(member) = resolution.member() else {
        if let Some(err) = resolution.to_error(registry, &MemberQuery::for_site(site), site.span) {
            diagnostics.push(err);
        }
        return CallForm::Error;
    };
    match bind(&member.params, site.shape.args(), site.span) {
        Ok(bound) => {
            let args = bound
                .slots
                .into_iter()
                .map(|slot| match slot {
                    BoundSlot::Arg(i) => Operand::Temp(element_temps[i]),
                    BoundSlot::Default(value) => Operand::Default(value),
                    BoundSlot::Variadic(items) => {
                        Operand::Sequence(items.into_iter().map(|i| element_temps[i]).collect())
                    }
                })
                .collect();
            call_form(resolution, AccessKind::Invoke, Some(Operand::Temp(target)), args)
        }
        Err(err) => {
            diagnostics.push(err);
            CallForm::Error
        }
    }
}

/// Temporaries for a protocol use: the subject, then element arguments in order.
pub(crate) fn protocol_prelude(subject: ExprId, elements: &[Vec<Argument>]) -> (Vec<Temp>, TempId, Vec<Vec<TempId>>) {
    let mut prelude = PreludeBuilder::default();
    let subject = prelude.push(TempSource::Receiver(subject));
    let elements = elements.iter().map(|args| prelude.arguments(args)).collect();
    (prelude.finish(), subject, elements)
}
