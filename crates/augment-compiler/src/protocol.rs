//! Structural protocols resolved through ordinary member lookup.
//!
//! `foreach` and `await` need a handful of members on the subject type and on
//! the types those members return. Each step below is resolved with the same
//! [`MemberResolver`] as any other access, so augmentation members satisfy a
//! protocol exactly like real ones. No marker interface is involved.

use augment_core::{MemberCategory, ResolutionError, Span, TypeHash, primitives};
use augment_registry::ScopeChain;
use rustc_hash::FxHashMap;

use crate::resolve::{MemberQuery, MemberResolver, Resolution};

/// Name of the collection-initializer append member.
pub const COLLECTION_ADD: &str = "Add";

/// A value a protocol step is invoked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolSlot {
    /// The collection, awaited value or initialized object itself.
    Subject,
    /// Result of `GetEnumerator`.
    Enumerator,
    /// Result of `GetAwaiter`.
    Awaiter,
    /// Continuation handed to `OnCompleted` by the runtime.
    Continuation,
}

/// One required or optional member of a protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolStep {
    pub name: &'static str,
    pub on: ProtocolSlot,
    pub category: MemberCategory,
    pub arity: usize,
    pub required: bool,
    /// Slot filled with this member's return type.
    pub yields: Option<ProtocolSlot>,
}

const fn step(
    name: &'static str,
    on: ProtocolSlot,
    category: MemberCategory,
    arity: usize,
    required: bool,
    yields: Option<ProtocolSlot>,
) -> ProtocolStep {
    ProtocolStep {
        name,
        on,
        category,
        arity,
        required,
        yields,
    }
}

pub const ITERATION_STEPS: [ProtocolStep; 5] = [
    step("GetEnumerator", ProtocolSlot::Subject, MemberCategory::Method, 0, true, Some(ProtocolSlot::Enumerator)),
    step("MoveNext", ProtocolSlot::Enumerator, MemberCategory::Method, 0, true, None),
    step("Current", ProtocolSlot::Enumerator, MemberCategory::Property, 0, true, None),
    step("Dispose", ProtocolSlot::Enumerator, MemberCategory::Method, 0, false, None),
    step("Reset", ProtocolSlot::Enumerator, MemberCategory::Method, 0, false, None),
];

pub const AWAIT_STEPS: [ProtocolStep; 4] = [
    step("GetAwaiter", ProtocolSlot::Subject, MemberCategory::Method, 0, true, Some(ProtocolSlot::Awaiter)),
    step("IsCompleted", ProtocolSlot::Awaiter, MemberCategory::Property, 0, true, None),
    step("GetResult", ProtocolSlot::Awaiter, MemberCategory::Method, 0, true, None),
    step("OnCompleted", ProtocolSlot::Awaiter, MemberCategory::Method, 1, true, None),
];

/// Protocols with a fixed step table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Iteration,
    Await,
}

impl Protocol {
    pub fn steps(self) -> &'static [ProtocolStep] {
        match self {
            Protocol::Iteration => &ITERATION_STEPS,
            Protocol::Await => &AWAIT_STEPS,
        }
    }
}

/// A step that resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredStep<'r> {
    pub step: &'static ProtocolStep,
    /// Static type the step was looked up on.
    pub receiver_type: TypeHash,
    pub resolution: Resolution<'r>,
}

/// Every resolved step of one protocol use, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolMatch<'r> {
    pub protocol: Protocol,
    pub steps: Vec<DiscoveredStep<'r>>,
}

impl<'r> ProtocolMatch<'r> {
    /// The resolved step with this member name.
    pub fn step(&self, name: &str) -> Option<&DiscoveredStep<'r>> {
        self.steps.iter().find(|s| s.step.name == name)
    }
}

/// Resolve every step of `protocol` starting from `subject`.
///
/// Fails on the first required step that is missing or ambiguous, and on any
/// property step without a getter. Optional steps that do not resolve are
/// left out of the match.
#[tracing::instrument(level = "trace", skip(resolver, chain))]
pub fn discover<'r>(
    resolver: &MemberResolver<'r>,
    protocol: Protocol,
    subject: TypeHash,
    chain: &ScopeChain,
    span: Span,
) -> Result<ProtocolMatch<'r>, ResolutionError> {
    let mut slots: FxHashMap<ProtocolSlot, TypeHash> = FxHashMap::default();
    slots.insert(ProtocolSlot::Subject, subject);
    let mut steps = Vec::new();

    for step in protocol.steps() {
        let receiver_type = slots.get(&step.on).copied().unwrap_or(primitives::VOID);
        let query = MemberQuery::instance(receiver_type, step.name, step.category, Some(step.arity));
        let resolution = resolver.resolve(&query, chain);

        if !resolution.is_found() {
            if let Resolution::NotFound = resolution {
                if !step.required {
                    continue;
                }
            }
            return Err(resolution
                .to_error(resolver.registry(), &query, span)
                .unwrap_or(ResolutionError::NotFound {
                    type_name: augment_core::QualifiedName::global("?"),
                    member: step.name.to_string(),
                    arity: step.arity,
                    span,
                }));
        }

        if let Some(member) = resolution.member() {
            if step.category == MemberCategory::Property
                && member.category() == MemberCategory::Property
                && !member.has_getter()
            {
                return Err(ResolutionError::AccessorMissing {
                    member: member.name.clone(),
                    accessor: "get",
                    span,
                });
            }
        }

        if let (Some(slot), Some(member)) = (step.yields, resolution.member()) {
            let produced = member.return_type.named_hash().unwrap_or(primitives::VOID);
            slots.insert(slot, produced);
        }

        steps.push(DiscoveredStep {
            step,
            receiver_type,
            resolution,
        });
    }

    Ok(ProtocolMatch { protocol, steps })
}
