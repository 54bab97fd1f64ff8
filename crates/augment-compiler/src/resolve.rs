//! Member merge resolution.
//!
//! Lookup of `receiver.Name` (or `Type.Name`) against real members first and
//! visible augmentation units second:
//!
//! 1. A real member of the receiver type or one of its bases (derived first)
//!    with matching name, category and arity always wins.
//! 2. Otherwise visibility tiers are scanned innermost first. In each tier,
//!    every unit offering a member with matching name, category, arity and
//!    static-ness is a candidate. One candidate wins; several are ambiguous.
//! 3. Nothing anywhere is `NotFound`.
//!
//! A static access whose qualifier is an augmentation unit's own type skips all
//! of that and binds to the unit's static member directly.

use augment_core::{
    AugmentationUnit, MemberCategory, MemberDecl, QualifiedName, ResolutionError, Span, TypeEntry,
    TypeHash,
};
use augment_registry::{ScopeChain, SymbolRegistry};
use tracing::trace;

use crate::site::{Access, AccessSite};
use crate::visibility::visible_units;

/// Result of resolving one member access.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'r> {
    /// A member declared on the type itself or a base.
    RealMember {
        owner: &'r TypeEntry,
        member: &'r MemberDecl,
    },
    AugmentationMember {
        unit: &'r AugmentationUnit,
        member: &'r MemberDecl,
    },
    /// Several units in the same visibility tier, in declaration order.
    Ambiguous(Vec<(&'r AugmentationUnit, &'r MemberDecl)>),
    NotFound,
}

impl<'r> Resolution<'r> {
    pub fn is_found(&self) -> bool {
        matches!(
            self,
            Resolution::RealMember { .. } | Resolution::AugmentationMember { .. }
        )
    }

    /// The resolved member declaration, if exactly one was found.
    pub fn member(&self) -> Option<&'r MemberDecl> {
        match self {
            Resolution::RealMember { member, .. } | Resolution::AugmentationMember { member, .. } => {
                Some(member)
            }
            _ => None,
        }
    }

    /// Convert a failed resolution into the error reported for it.
    pub fn to_error(
        &self,
        registry: &SymbolRegistry,
        query: &MemberQuery<'_>,
        span: Span,
    ) -> Option<ResolutionError> {
        match self {
            Resolution::Ambiguous(candidates) => Some(ResolutionError::Ambiguous {
                member: query.name.to_string(),
                units: candidates.iter().map(|(u, _)| u.name.clone()).collect(),
                span,
            }),
            Resolution::NotFound => Some(ResolutionError::NotFound {
                type_name: registry
                    .type_name(query.receiver)
                    .cloned()
                    .unwrap_or_else(|| QualifiedName::global(query.receiver.to_string())),
                member: query.name.to_string(),
                arity: query.arity.unwrap_or(0),
                span,
            }),
            _ => None,
        }
    }
}

/// What is being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberQuery<'q> {
    /// Receiver's static type, or the qualifying type for static access.
    pub receiver: TypeHash,
    pub is_static: bool,
    pub name: &'q str,
    pub category: MemberCategory,
    /// Source argument count; `None` accepts any.
    pub arity: Option<usize>,
}

impl<'q> MemberQuery<'q> {
    pub fn instance(receiver: TypeHash, name: &'q str, category: MemberCategory, arity: Option<usize>) -> Self {
        Self {
            receiver,
            is_static: false,
            name,
            category,
            arity,
        }
    }

    pub fn qualified(qualifier: TypeHash, name: &'q str, category: MemberCategory, arity: Option<usize>) -> Self {
        Self {
            receiver: qualifier,
            is_static: true,
            name,
            category,
            arity,
        }
    }

    /// The query an access site performs.
    pub fn for_site(site: &'q AccessSite) -> Self {
        let category = site.shape.category();
        let arity = site.shape.arity();
        match site.access {
            Access::Instance { receiver_type, .. } => Self::instance(receiver_type, &site.member, category, arity),
            Access::Static { qualifier } => Self::qualified(qualifier, &site.member, category, arity),
        }
    }

    fn matches(&self, member: &MemberDecl) -> bool {
        self.collides(member) && member.category() == self.category
    }

    /// Name and arity only. A real member of any category that collides
    /// this way hides every augmentation member of that name.
    fn collides(&self, member: &MemberDecl) -> bool {
        member.name == self.name && self.arity.is_none_or(|n| member.accepts_arity(n))
    }
}

/// Resolves member accesses against a frozen registry.
#[derive(Clone, Copy)]
pub struct MemberResolver<'r> {
    registry: &'r SymbolRegistry,
}

impl<'r> MemberResolver<'r> {
    pub fn new(registry: &'r SymbolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r SymbolRegistry {
        self.registry
    }

    #[tracing::instrument(level = "trace", skip_all, fields(member = query.name, is_static = query.is_static))]
    pub fn resolve(&self, query: &MemberQuery<'_>, chain: &ScopeChain) -> Resolution<'r> {
        if query.is_static {
            if let Some(unit) = self.registry.unit_by_type(query.receiver) {
                return self.resolve_in_unit(unit, query);
            }
        }

        if let Some((owner, member)) = self.find_real(query) {
            trace!(owner = %owner.name, "real member");
            return Resolution::RealMember { owner, member };
        }

        let visible = visible_units(self.registry, query.receiver, chain);
        for tier in visible.tiers() {
            let candidates: Vec<_> = tier
                .iter()
                .filter_map(|&unit| find_augmentation_member(unit, query).map(|m| (unit, m)))
                .collect();
            match candidates.len() {
                0 => continue,
                1 => {
                    let (unit, member) = candidates[0];
                    trace!(unit = %unit.name, "augmentation member");
                    return Resolution::AugmentationMember { unit, member };
                }
                _ => {
                    tracing::debug!(count = candidates.len(), "ambiguous augmentation member");
                    return Resolution::Ambiguous(candidates);
                }
            }
        }

        Resolution::NotFound
    }

    /// Static member lookup qualified by an augmentation unit's own type.
    fn resolve_in_unit(&self, unit: &'r AugmentationUnit, query: &MemberQuery<'_>) -> Resolution<'r> {
        if !unit.valid {
            return Resolution::NotFound;
        }
        match find_augmentation_member(unit, query) {
            Some(member) => Resolution::AugmentationMember { unit, member },
            None => Resolution::NotFound,
        }
    }

    /// Real member on the type or its bases, matched on name and arity.
    /// Category and static-ness are not checked here.
    pub fn find_real(&self, query: &MemberQuery<'_>) -> Option<(&'r TypeEntry, &'r MemberDecl)> {
        self.registry
            .base_chain(query.receiver)
            .into_iter()
            .find_map(|owner| {
                owner
                    .members
                    .iter()
                    .find(|m| query.collides(m))
                    .map(|m| (owner, m))
            })
    }

    /// Members of a unit that a real member of the extended type hides.
    pub fn shadowed_members(&self, unit: &'r AugmentationUnit) -> Vec<&'r MemberDecl> {
        let Some(target) = unit.extended_hash() else {
            return Vec::new();
        };
        unit.members
            .iter()
            .filter(|member| {
                let query = MemberQuery {
                    receiver: target,
                    is_static: member.is_static(),
                    name: &member.name,
                    category: member.category(),
                    arity: Some(member.required_count()),
                };
                self.find_real(&query).is_some()
            })
            .collect()
    }
}

fn find_augmentation_member<'r>(unit: &'r AugmentationUnit, query: &MemberQuery<'_>) -> Option<&'r MemberDecl> {
    unit.members
        .iter()
        .find(|m| m.is_static() == query.is_static && query.matches(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use augment_ast::*;
    use augment_core::ConstantValue;

    fn resolve_in<'r>(
        out: &'r Registered,
        file: u32,
        query: MemberQuery<'_>,
    ) -> Resolution<'r> {
        let chain = out.registry.scope_chain(root_scope(&out.registry, file));
        MemberResolver::new(&out.registry).resolve(&query, &chain)
    }

    fn unit_name(resolution: &Resolution<'_>) -> Option<String> {
        match resolution {
            Resolution::AugmentationMember { unit, .. } => Some(unit.name.to_string()),
            _ => None,
        }
    }

    #[test]
    fn without_augmentations_real_lookup_is_unchanged() {
        let out = register(vec![SourceFile::new(0, "a").item(
            TypeDecl::class("Point").member(MemberSyntax::method("Length").returns("double")),
        )]);
        let hit = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Length", MemberCategory::Method, Some(0)));
        assert!(matches!(hit, Resolution::RealMember { .. }));
        let miss = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Area", MemberCategory::Method, Some(0)));
        assert_eq!(miss, Resolution::NotFound);
    }

    #[test]
    fn real_member_beats_augmentation_member() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Point").member(MemberSyntax::method("Describe").returns("string")))
            .item(
                AugmentationDecl::extending("PointExt", "Point")
                    .member(MemberSyntax::method("Describe").returns("string")),
            )]);
        let res = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Describe", MemberCategory::Method, Some(0)));
        match res {
            Resolution::RealMember { owner, .. } => assert_eq!(owner.name.to_string(), "Point"),
            other => panic!("expected real member, got {:?}", other),
        }
    }

    #[test]
    fn real_method_hides_augmentation_property_of_same_name() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Point").member(MemberSyntax::method("Describe").returns("string")))
            .item(
                AugmentationDecl::extending("PointExt", "Point")
                    .member(MemberSyntax::property("Describe", "string")),
            )]);
        let res = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Describe", MemberCategory::Property, Some(0)));
        match res {
            Resolution::RealMember { owner, member } => {
                assert_eq!(owner.name.to_string(), "Point");
                assert_eq!(member.category(), MemberCategory::Method);
            }
            other => panic!("expected real member, got {:?}", other),
        }

        let unit = out.registry.units().next().unwrap();
        let shadowed = MemberResolver::new(&out.registry).shadowed_members(unit);
        assert_eq!(shadowed.len(), 1);
        assert_eq!(shadowed[0].category(), MemberCategory::Property);
        assert_eq!(out.diagnostics.count_of(augment_core::DiagnosticKind::AugmentationMemberShadowed), 1);
    }

    #[test]
    fn real_property_does_not_hide_augmentation_method_of_other_arity() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Point").member(MemberSyntax::property("Size", "int")))
            .item(
                AugmentationDecl::extending("PointExt", "Point")
                    .member(MemberSyntax::method("Size").param(ParamSyntax::new("scale", "int"))),
            )]);
        let res = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Size", MemberCategory::Method, Some(1)));
        assert_eq!(unit_name(&res).as_deref(), Some("PointExt"));
    }

    #[test]
    fn base_member_beats_augmentation_of_derived() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Base").member(MemberSyntax::method("Run")))
            .item(TypeDecl::class("Derived").base("Base"))
            .item(AugmentationDecl::extending("DerivedExt", "Derived").member(MemberSyntax::method("Run")))]);
        let res = resolve_in(&out, 0, MemberQuery::instance(type_hash("Derived"), "Run", MemberCategory::Method, Some(0)));
        match res {
            Resolution::RealMember { owner, .. } => assert_eq!(owner.name.to_string(), "Base"),
            other => panic!("expected base member, got {:?}", other),
        }
    }

    #[test]
    fn augmentation_of_base_does_not_apply_to_derived() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Base"))
            .item(TypeDecl::class("Derived").base("Base"))
            .item(AugmentationDecl::extending("BaseExt", "Base").member(MemberSyntax::method("Extra")))]);
        let on_base = resolve_in(&out, 0, MemberQuery::instance(type_hash("Base"), "Extra", MemberCategory::Method, Some(0)));
        assert_eq!(unit_name(&on_base).as_deref(), Some("BaseExt"));
        let on_derived = resolve_in(&out, 0, MemberQuery::instance(type_hash("Derived"), "Extra", MemberCategory::Method, Some(0)));
        assert_eq!(on_derived, Resolution::NotFound);
    }

    #[test]
    fn same_tier_conflict_is_ambiguous_in_any_order() {
        for swap in [false, true] {
            let u1 = NamespaceDecl::new("N1").item(
                AugmentationDecl::extending("U1", "Point").member(MemberSyntax::method("M")),
            );
            let u2 = NamespaceDecl::new("N2").item(
                AugmentationDecl::extending("U2", "Point").member(MemberSyntax::method("M")),
            );
            let (first, second) = if swap { (u2, u1) } else { (u1, u2) };
            let out = register(vec![
                SourceFile::new(0, "types").item(TypeDecl::class("Point")),
                SourceFile::new(1, "first").item(first),
                SourceFile::new(2, "second").item(second),
                SourceFile::new(3, "use").using("N1").using("N2"),
            ]);
            let res = resolve_in(&out, 3, MemberQuery::instance(type_hash("Point"), "M", MemberCategory::Method, Some(0)));
            match res {
                Resolution::Ambiguous(candidates) => {
                    let mut names: Vec<_> = candidates.iter().map(|(u, _)| u.name.to_string()).collect();
                    names.sort();
                    assert_eq!(names, vec!["N1::U1", "N2::U2"]);
                }
                other => panic!("expected ambiguity, got {:?}", other),
            }
        }
    }

    #[test]
    fn inner_tier_wins_over_outer_conflict() {
        let out = register(vec![
            SourceFile::new(0, "a")
                .item(TypeDecl::class("Point"))
                .item(AugmentationDecl::extending("Outer", "Point").member(MemberSyntax::method("M")))
                .item(NamespaceDecl::new("Inner").item(
                    AugmentationDecl::extending("InnerExt", "Point").member(MemberSyntax::method("M")),
                )),
            SourceFile::new(1, "use").item(NamespaceDecl::new("Inner")),
        ]);
        let chain = out.registry.scope_chain(block_scope(&out.registry, 1, &["Inner"]));
        let res = MemberResolver::new(&out.registry).resolve(
            &MemberQuery::instance(type_hash("Point"), "M", MemberCategory::Method, Some(0)),
            &chain,
        );
        assert_eq!(unit_name(&res).as_deref(), Some("Inner::InnerExt"));
    }

    #[test]
    fn static_ness_must_match_for_augmentations() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Point"))
            .item(
                AugmentationDecl::extending("PointExt", "Point")
                    .member(MemberSyntax::method("Create").make_static().returns("Point")),
            )]);
        let as_static = resolve_in(&out, 0, MemberQuery::qualified(type_hash("Point"), "Create", MemberCategory::Method, Some(0)));
        assert_eq!(unit_name(&as_static).as_deref(), Some("PointExt"));
        let as_instance = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Create", MemberCategory::Method, Some(0)));
        assert_eq!(as_instance, Resolution::NotFound);
    }

    #[test]
    fn unit_qualified_access_bypasses_real_members() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Point").member(MemberSyntax::property("StaticProperty", "int").make_static()))
            .item(
                AugmentationDecl::extending("PointExt", "Point")
                    .member(MemberSyntax::property("StaticProperty", "int").make_static()),
            )]);
        let via_type = resolve_in(&out, 0, MemberQuery::qualified(type_hash("Point"), "StaticProperty", MemberCategory::Property, Some(0)));
        assert!(matches!(via_type, Resolution::RealMember { .. }));
        let via_unit = resolve_in(&out, 0, MemberQuery::qualified(type_hash("PointExt"), "StaticProperty", MemberCategory::Property, Some(0)));
        assert_eq!(unit_name(&via_unit).as_deref(), Some("PointExt"));
    }

    #[test]
    fn arity_selects_between_overloads() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Point"))
            .item(
                AugmentationDecl::extending("PointExt", "Point")
                    .member(MemberSyntax::method("Scale").param(ParamSyntax::new("f", "int")))
                    .member(
                        MemberSyntax::method("Scale")
                            .param(ParamSyntax::new("x", "int"))
                            .param(ParamSyntax::new("y", "int").default_value(ConstantValue::Int(1))),
                    ),
            )]);
        let res = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Scale", MemberCategory::Method, Some(2)));
        assert_eq!(res.member().map(|m| m.params.len()), Some(2));
        let res = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Scale", MemberCategory::Method, Some(1)));
        assert_eq!(res.member().map(|m| m.params.len()), Some(1));
        let res = resolve_in(&out, 0, MemberQuery::instance(type_hash("Point"), "Scale", MemberCategory::Method, Some(3)));
        assert_eq!(res, Resolution::NotFound);
    }

    #[test]
    fn shadowed_members_are_reported() {
        let out = register(vec![SourceFile::new(0, "a")
            .item(TypeDecl::class("Point").member(MemberSyntax::method("Describe")))
            .item(
                AugmentationDecl::extending("PointExt", "Point")
                    .member(MemberSyntax::method("Describe"))
                    .member(MemberSyntax::method("Other")),
            )]);
        let unit = out.registry.units().next().unwrap();
        let shadowed = MemberResolver::new(&out.registry).shadowed_members(unit);
        assert_eq!(shadowed.len(), 1);
        assert_eq!(shadowed[0].name, "Describe");
    }

    #[test]
    fn not_found_error_names_the_type() {
        let out = register(vec![SourceFile::new(0, "a").item(TypeDecl::class("Point"))]);
        let query = MemberQuery::instance(type_hash("Point"), "Nope", MemberCategory::Method, Some(1));
        let res = resolve_in(&out, 0, query);
        let err = res.to_error(&out.registry, &query, Span::default()).unwrap();
        assert_eq!(err.kind(), augment_core::DiagnosticKind::MemberNotFound);
        assert!(err.to_string().contains("'Point' has no member 'Nope'"));
    }
}
