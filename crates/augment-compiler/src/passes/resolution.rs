//! Resolution Pass (Pass 2) - resolve and lower use sites.
//!
//! Reads the frozen registry only. Every site is independent, so with the
//! `parallel` feature sites are spread over the rayon pool; results are
//! collected back in site order either way.

use augment_core::Diagnostics;
use augment_registry::SymbolRegistry;

use crate::CompilerOptions;
use crate::lower::{
    CollectionInitPlan, LoweredAccess, LoweredProtocol, ProtocolPlan, lower_access, lower_await,
    lower_collection_add, lower_iteration, protocol_prelude,
};
use crate::passes::map_items;
use crate::protocol::{COLLECTION_ADD, Protocol, discover};
use crate::resolve::{MemberQuery, MemberResolver};
use crate::site::{Access, AccessShape, AccessSite, ProtocolSite, ProtocolUse};

/// Lowered access sites, in input order.
#[derive(Debug, Default)]
pub struct ResolutionOutput {
    pub lowered: Vec<LoweredAccess>,
    pub diagnostics: Diagnostics,
}

/// Lowered protocol sites, in input order.
#[derive(Debug, Default)]
pub struct ProtocolOutput {
    pub lowered: Vec<LoweredProtocol>,
    pub diagnostics: Diagnostics,
}

/// Pass 2: resolve member accesses and protocol uses.
#[derive(Clone, Copy)]
pub struct ResolutionPass<'reg> {
    registry: &'reg SymbolRegistry,
    options: CompilerOptions,
}

impl<'reg> ResolutionPass<'reg> {
    pub fn new(registry: &'reg SymbolRegistry, options: CompilerOptions) -> Self {
        Self { registry, options }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(&self, sites: &[AccessSite]) -> ResolutionOutput {
        let results = map_items(self.options.parallel(), sites, |site| self.resolve_site(site));
        let mut output = ResolutionOutput::default();
        for (lowered, diagnostics) in results {
            output.lowered.push(lowered);
            output.diagnostics.extend(diagnostics);
        }
        output
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run_protocols(&self, sites: &[ProtocolSite]) -> ProtocolOutput {
        let results = map_items(self.options.parallel(), sites, |site| self.lower_protocol(site));
        let mut output = ProtocolOutput::default();
        for (lowered, diagnostics) in results {
            output.lowered.push(lowered);
            output.diagnostics.extend(diagnostics);
        }
        output
    }

    #[tracing::instrument(level = "trace", skip_all, fields(site = site.id.0, member = %site.member))]
    pub fn resolve_site(&self, site: &AccessSite) -> (LoweredAccess, Diagnostics) {
        let chain = self.registry.scope_chain(site.scope);
        let resolution = MemberResolver::new(self.registry).resolve(&MemberQuery::for_site(site), &chain);
        let mut diagnostics = Diagnostics::new();
        let lowered = lower_access(self.registry, site, &resolution, &mut diagnostics);
        (lowered, diagnostics)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(site = site.id.0))]
    pub fn lower_protocol(&self, site: &ProtocolSite) -> (LoweredProtocol, Diagnostics) {
        let chain = self.registry.scope_chain(site.scope);
        let resolver = MemberResolver::new(self.registry);
        let mut diagnostics = Diagnostics::new();

        let (prelude, plan) = match &site.usage {
            ProtocolUse::Iterate {
                collection,
                collection_type,
            } => {
                let (prelude, subject, _) = protocol_prelude(*collection, &[]);
                let plan = match discover(&resolver, Protocol::Iteration, *collection_type, &chain, site.span) {
                    Ok(found) => ProtocolPlan::Iteration(lower_iteration(&found, subject)),
                    Err(err) => {
                        diagnostics.push(err);
                        ProtocolPlan::Error
                    }
                };
                (prelude, plan)
            }
            ProtocolUse::Await { operand, operand_type } => {
                let (prelude, subject, _) = protocol_prelude(*operand, &[]);
                let plan = match discover(&resolver, Protocol::Await, *operand_type, &chain, site.span) {
                    Ok(found) => ProtocolPlan::Await(lower_await(&found, subject)),
                    Err(err) => {
                        diagnostics.push(err);
                        ProtocolPlan::Error
                    }
                };
                (prelude, plan)
            }
            ProtocolUse::CollectionInit {
                target,
                target_type,
                elements,
            } => {
                let (prelude, subject, element_temps) = protocol_prelude(*target, elements);
                let adds = elements
                    .iter()
                    .zip(&element_temps)
                    .map(|(args, temps)| {
                        let add = AccessSite {
                            id: site.id,
                            span: site.span,
                            scope: site.scope,
                            access: Access::Instance {
                                receiver: *target,
                                receiver_type: *target_type,
                            },
                            member: COLLECTION_ADD.to_string(),
                            shape: AccessShape::Invoke { args: args.clone() },
                        };
                        let resolution = resolver.resolve(&MemberQuery::for_site(&add), &chain);
                        lower_collection_add(&add, &resolution, self.registry, subject, temps, &mut diagnostics)
                    })
                    .collect();
                (prelude, ProtocolPlan::CollectionInit(CollectionInitPlan { adds }))
            }
        };

        (
            LoweredProtocol {
                site: site.id,
                prelude,
                plan,
            },
            diagnostics,
        )
    }
}
