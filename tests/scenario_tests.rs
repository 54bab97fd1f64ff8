//! End-to-end scenarios: declarations in, lowered calls out, evaluated by the
//! test harness.


use augment::ast::*;
use augment::{
    Access, AccessShape, AccessSite, Argument, CallForm, Compilation, CompilerOptions,
    ConstantValue, DiagnosticKind, ExprId, ProtocolSite, ProtocolUse, QualifiedName, ScopeId,
    TypeHash,
};
use pretty_assertions::assert_eq;
use test_harness::{Machine, Sites, Value, compile, compile_with, lower_one};

fn invoke(id: u32, scope: ScopeId, receiver: u32, ty: TypeHash, member: &str, args: Vec<Argument>) -> AccessSite {
    AccessSite::new(
        id,
        scope,
        Access::Instance {
            receiver: ExprId(receiver),
            receiver_type: ty,
        },
        member,
        AccessShape::Invoke { args },
    )
}

fn invoke_static(id: u32, scope: ScopeId, qualifier: TypeHash, member: &str, args: Vec<Argument>) -> AccessSite {
    AccessSite::new(id, scope, Access::Static { qualifier }, member, AccessShape::Invoke { args })
}

fn get(id: u32, scope: ScopeId, access: Access, member: &str) -> AccessSite {
    AccessSite::new(id, scope, access, member, AccessShape::Get)
}

fn writes(text: &'static str) -> impl FnMut(&[Value], &mut String) -> Value {
    move |_, out| {
        out.push_str(text);
        Value::Void
    }
}

fn returns(value: Value) -> impl FnMut(&[Value], &mut String) -> Value {
    move |_, _| value.clone()
}

// ============================================================================
// Lookup across kinds, namespaces and files
// ============================================================================

#[test]
fn members_and_statics_on_every_type_kind() {
    let kinds = [
        ("BaseClass", "ExtClass", TypeDecl::class("BaseClass")),
        ("BaseStruct", "ExtStruct", TypeDecl::structure("BaseStruct")),
        ("IBaseInterface", "ExtInterface", TypeDecl::interface("IBaseInterface")),
        ("BaseEnum", "ExtEnum", TypeDecl::enumeration("BaseEnum")),
    ];

    let mut file = SourceFile::new(0, "kinds.src")
        .item(TypeDecl::static_class("BaseStaticClass"))
        .item(
            AugmentationDecl::extending("ExtStaticClass", "BaseStaticClass")
                .member(MemberSyntax::method("StaticMember").make_static())
                .member(MemberSyntax::method("DirectCall").make_static()),
        );
    for (base, ext, decl) in &kinds {
        file = file.item(decl.clone()).item(
            AugmentationDecl::extending(ext, base)
                .member(MemberSyntax::method("Member"))
                .member(MemberSyntax::method("StaticMember").make_static())
                .member(MemberSyntax::method("DirectCall").make_static()),
        );
    }
    let c = compile(vec![file]);
    assert!(c.diagnostics().is_empty(), "{}", c.diagnostics());

    let s = Sites::new(&c, 0, &[]);
    let mut sites = Vec::new();
    for (i, (base, ..)) in kinds.iter().enumerate() {
        sites.push(invoke(sites.len() as u32, s.scope(), i as u32, s.ty(base), "Member", vec![]));
    }
    for base in ["BaseClass", "BaseStaticClass", "BaseStruct", "IBaseInterface", "BaseEnum"] {
        sites.push(invoke_static(sites.len() as u32, s.scope(), s.ty(base), "StaticMember", vec![]));
    }
    for ext in ["ExtClass", "ExtStaticClass", "ExtStruct", "ExtInterface", "ExtEnum"] {
        sites.push(invoke_static(sites.len() as u32, s.scope(), s.ty(ext), "DirectCall", vec![]));
    }
    let output = c.resolve(&sites).unwrap();
    assert!(output.diagnostics.is_empty(), "{}", output.diagnostics);

    let mut m = Machine::new(&c);
    for (i, (base, ..)) in kinds.iter().enumerate() {
        m.expr(i as u32, Value::Object(base.to_string()));
    }
    let texts: &[(&str, &str, &'static str)] = &[
        ("ExtClass", "Member", "1"),
        ("ExtStruct", "Member", "2"),
        ("ExtInterface", "Member", "3"),
        ("ExtEnum", "Member", "4"),
        ("ExtClass", "StaticMember", "5"),
        ("ExtStaticClass", "StaticMember", "6"),
        ("ExtStruct", "StaticMember", "7"),
        ("ExtInterface", "StaticMember", "8"),
        ("ExtEnum", "StaticMember", "9"),
        ("ExtClass", "DirectCall", "a"),
        ("ExtStaticClass", "DirectCall", "b"),
        ("ExtStruct", "DirectCall", "c"),
        ("ExtInterface", "DirectCall", "d"),
        ("ExtEnum", "DirectCall", "e"),
    ];
    for &(owner, symbol, text) in texts {
        m.native(&format!("{}.{}", owner, symbol), writes(text));
    }
    m.run_all(&output.lowered);
    assert_eq!(m.output, "123456789abcde");
}

#[test]
fn using_directives_are_isolated_per_file() {
    let first = SourceFile::new(0, "first.src")
        .item(NamespaceDecl::new("One").item(TypeDecl::class("BaseClass")))
        .item(
            AugmentationDecl::extending("ExtGlobal", "One::BaseClass")
                .member(MemberSyntax::property("Global", "int").get_only()),
        )
        .item(
            NamespaceDecl::new("Two")
                .using("One")
                .item(AugmentationDecl::extending("ExtClass", "BaseClass").member(MemberSyntax::method("Method"))),
        )
        .item(
            NamespaceDecl::new("Prog")
                .using("Two")
                .item(TypeDecl::class("Program")),
        );
    let second = SourceFile::new(1, "second.src")
        .item(
            NamespaceDecl::new("Three")
                .using("One")
                .item(AugmentationDecl::extending("ExtClass", "BaseClass").member(MemberSyntax::method("Method"))),
        )
        .item(
            NamespaceDecl::new("Four")
                .using("Three")
                .item(TypeDecl::class("FourClass")),
        );
    let c = compile(vec![first, second]);
    assert!(c.diagnostics().is_empty(), "{}", c.diagnostics());

    let base = c.type_hash("One::BaseClass").unwrap();
    let prog = c.scope(0, &["Prog"]).unwrap();
    let four = c.scope(1, &["Four"]).unwrap();
    let thing = Access::Instance {
        receiver: ExprId(0),
        receiver_type: base,
    };

    let mut m = Machine::new(&c);
    m.expr(0, Value::Object("One::BaseClass".into()))
        .native("Two::ExtClass.Method", writes("1"))
        .native("Three::ExtClass.Method", writes("2"))
        .native("ExtGlobal.get_Global", returns(Value::Int(3)));

    // Main: thing.Method(); FourClass.Test(); Write(thing.Global + 1)
    m.run(&lower_one(&c, invoke(0, prog, 0, base, "Method", vec![])));
    m.run(&lower_one(&c, invoke(1, four, 0, base, "Method", vec![])));
    let global = m.run(&lower_one(&c, get(2, four, thing, "Global")));
    m.output.push_str(&global.to_string());
    let global = m.run(&lower_one(&c, get(3, prog, thing, "Global")));
    m.output.push_str(&(global.int() + 1).to_string());

    assert_eq!(m.output, "1234");
}

#[test]
fn qualifying_by_the_unit_reaches_its_static() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::class("Widget").member(MemberSyntax::property("StaticProperty", "int").make_static().get_only()))
        .item(
            AugmentationDecl::extending("WidgetExt", "Widget")
                .member(MemberSyntax::property("StaticProperty", "int").make_static().get_only()),
        )]);
    assert!(!c.diagnostics().has_errors());
    assert_eq!(c.diagnostics().count_of(DiagnosticKind::AugmentationMemberShadowed), 1);

    let s = Sites::new(&c, 0, &[]);
    let on_type = Access::Static {
        qualifier: s.ty("Widget"),
    };
    let on_unit = Access::Static {
        qualifier: s.ty("WidgetExt"),
    };

    let mut m = Machine::new(&c);
    m.native("Widget.get_StaticProperty", returns(Value::Int(5)))
        .native("WidgetExt.get_StaticProperty", returns(Value::Int(6)));
    assert_eq!(m.run(&lower_one(&c, get(0, s.scope(), on_type, "StaticProperty"))), Value::Int(5));
    assert_eq!(m.run(&lower_one(&c, get(1, s.scope(), on_unit, "StaticProperty"))), Value::Int(6));
}

#[test]
fn real_member_wins_over_augmentation() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::class("Point").member(MemberSyntax::method("Length").returns("int")))
        .item(AugmentationDecl::extending("PointExt", "Point").member(MemberSyntax::method("Length").returns("int")))]);
    let s = Sites::new(&c, 0, &[]);

    let lowered = lower_one(&c, invoke(0, s.scope(), 0, s.ty("Point"), "Length", vec![]));
    assert!(matches!(lowered.form, CallForm::Real { .. }));

    let mut m = Machine::new(&c);
    m.expr(0, Value::Object("Point".into()))
        .native("Point.Length", returns(Value::Int(1)))
        .native("PointExt.Length", returns(Value::Int(2)));
    assert_eq!(m.run(&lowered), Value::Int(1));
}

#[test]
fn no_units_is_plain_member_lookup() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::class("Base").member(MemberSyntax::method("Hello")))
        .item(TypeDecl::class("Derived").base("Base"))]);
    let s = Sites::new(&c, 0, &[]);

    let lowered = lower_one(&c, invoke(0, s.scope(), 0, s.ty("Derived"), "Hello", vec![]));
    match &lowered.form {
        CallForm::Real { owner, member, .. } => {
            assert_eq!(*owner, s.ty("Base"));
            assert_eq!(member, "Hello");
        }
        other => panic!("expected a real member, got {:?}", other),
    }

    let missing = c
        .resolve(&[invoke(1, s.scope(), 0, s.ty("Derived"), "Goodbye", vec![])])
        .unwrap();
    assert!(missing.lowered[0].form.is_error());
    assert_eq!(missing.diagnostics.count_of(DiagnosticKind::MemberNotFound), 1);
}

#[test]
fn augmenting_a_base_does_not_reach_derived() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::class("Base"))
        .item(TypeDecl::class("Derived").base("Base"))
        .item(AugmentationDecl::extending("BaseExt", "Base").member(MemberSyntax::method("Extra")))]);
    let s = Sites::new(&c, 0, &[]);

    let output = c
        .resolve(&[
            invoke(0, s.scope(), 0, s.ty("Base"), "Extra", vec![]),
            invoke(1, s.scope(), 0, s.ty("Derived"), "Extra", vec![]),
        ])
        .unwrap();
    assert!(!output.lowered[0].form.is_error());
    assert!(output.lowered[1].form.is_error());
    assert_eq!(output.diagnostics.count_of(DiagnosticKind::MemberNotFound), 1);
}

// ============================================================================
// Conflicts
// ============================================================================

fn conflicting_files() -> Vec<SourceFile> {
    vec![
        SourceFile::new(0, "main").item(TypeDecl::class("Point")),
        SourceFile::new(1, "u1").item(AugmentationDecl::extending("U1", "Point").member(MemberSyntax::method("Length"))),
        SourceFile::new(2, "u2").item(AugmentationDecl::extending("U2", "Point").member(MemberSyntax::method("Length"))),
    ]
}

fn ambiguity_of(files: Vec<SourceFile>) -> Vec<QualifiedName> {
    let c = compile(files);
    let s = Sites::new(&c, 0, &[]);
    let output = c
        .resolve(&[invoke(0, s.scope(), 0, s.ty("Point"), "Length", vec![])])
        .unwrap();
    assert!(output.lowered[0].form.is_error());
    let diagnostic = output
        .diagnostics
        .of_kind(DiagnosticKind::AmbiguousAugmentationMember)
        .next()
        .expect("ambiguity reported");
    diagnostic.units.clone()
}

#[test]
fn same_tier_units_are_ambiguous_in_any_order() {
    let forward = ambiguity_of(conflicting_files());
    let mut reversed = conflicting_files();
    reversed.reverse();
    let backward = ambiguity_of(reversed);

    assert_eq!(forward, vec![QualifiedName::global("U1"), QualifiedName::global("U2")]);
    assert_eq!(forward, backward);
}

#[test]
fn inner_import_beats_outer_declaration() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::class("Point"))
        .item(AugmentationDecl::extending("OuterExt", "Point").member(MemberSyntax::method("Length")))
        .item(NamespaceDecl::new("Lib").item(AugmentationDecl::extending("InnerExt", "Point").member(MemberSyntax::method("Length"))))
        .item(NamespaceDecl::new("App").using("Lib").item(TypeDecl::class("Program")))]);
    assert!(c.diagnostics().is_empty(), "{}", c.diagnostics());
    let app = c.scope(0, &["App"]).unwrap();
    let point = c.type_hash("Point").unwrap();

    let lowered = lower_one(&c, invoke(0, app, 0, point, "Length", vec![]));
    let target = lowered.form.target().expect("augmentation call");
    assert_eq!(target.owner_name.to_string(), "Lib::InnerExt");
}

// ============================================================================
// Binding and evaluation order
// ============================================================================

fn scale_program() -> Compilation {
    compile(vec![SourceFile::new(0, "a").item(TypeDecl::class("Point")).item(
        AugmentationDecl::extending("PointExt", "Point")
            .member(
                MemberSyntax::method("F")
                    .param(ParamSyntax::new("a", "int"))
                    .param(ParamSyntax::new("b", "int").default_value(ConstantValue::Int(10)))
                    .param(ParamSyntax::new("c", "int")),
            )
            .member(MemberSyntax::method("Sum").returns("int").param(ParamSyntax::new("values", "int").variadic()))
            .member(
                MemberSyntax::indexer("int")
                    .param(ParamSyntax::new("row", "int"))
                    .param(ParamSyntax::new("col", "int")),
            ),
    )])
}

#[test]
fn named_arguments_evaluate_in_source_order() {
    let c = scale_program();
    let s = Sites::new(&c, 0, &[]);
    let site = invoke(
        0,
        s.scope(),
        0,
        s.ty("Point"),
        "F",
        vec![Argument::named("c", ExprId(1)), Argument::named("a", ExprId(2))],
    );
    let lowered = lower_one(&c, site);
    assert_eq!(
        c.describe(lowered.form.target().unwrap()).unwrap(),
        "PointExt.F(Point, int, int, int)"
    );

    let mut m = Machine::new(&c);
    m.expr(0, Value::Object("Point".into()))
        .logged(1, Value::Int(1))
        .logged(2, Value::Int(2))
        .native("PointExt.F", |args, out| {
            let parts: Vec<String> = args[1..].iter().map(|v| v.to_string()).collect();
            out.push_str(&format!("|f({})", parts.join(",")));
            Value::Void
        });
    m.run(&lowered);
    assert_eq!(m.output, "12|f(2,10,1)");
}

#[test]
fn variadic_tail_collects_arguments() {
    let c = scale_program();
    let s = Sites::new(&c, 0, &[]);
    let args = (1..=3).map(|i| Argument::positional(ExprId(i))).collect();
    let lowered = lower_one(&c, invoke(0, s.scope(), 0, s.ty("Point"), "Sum", args));

    let mut m = Machine::new(&c);
    m.expr(0, Value::Object("Point".into()))
        .expr(1, Value::Int(1))
        .expr(2, Value::Int(2))
        .expr(3, Value::Int(3))
        .native("PointExt.Sum", |args, _| match &args[1] {
            Value::List(items) => Value::Int(items.iter().map(Value::int).sum()),
            other => panic!("expected a sequence, got {:?}", other),
        });
    assert_eq!(m.run(&lowered), Value::Int(6));

    let empty = lower_one(&c, invoke(1, s.scope(), 0, s.ty("Point"), "Sum", vec![]));
    assert_eq!(m.run(&empty), Value::Int(0));
}

#[test]
fn indexer_set_passes_indices_then_value() {
    let c = scale_program();
    let s = Sites::new(&c, 0, &[]);
    let receiver = Access::Instance {
        receiver: ExprId(0),
        receiver_type: s.ty("Point"),
    };
    let set = AccessSite::indexer(
        0,
        s.scope(),
        receiver,
        AccessShape::IndexSet {
            args: vec![Argument::positional(ExprId(1)), Argument::positional(ExprId(2))],
            value: ExprId(3),
        },
    );
    let lowered = lower_one(&c, set);
    assert_eq!(
        c.describe(lowered.form.target().unwrap()).unwrap(),
        "PointExt.set_Item(Point, int, int, int)"
    );

    let mut m = Machine::new(&c);
    m.logged(0, Value::Text("p".into()))
        .logged(1, Value::Int(1))
        .logged(2, Value::Int(2))
        .logged(3, Value::Int(9))
        .native("PointExt.set_Item", |args, out| {
            let parts: Vec<String> = args.iter().map(|v| v.to_string()).collect();
            out.push_str(&format!("|{}", parts.join(",")));
            Value::Void
        });
    m.run(&lowered);
    assert_eq!(m.output, "p129|p,1,2,9");
}

#[test]
fn bad_arguments_are_reported() {
    let c = scale_program();
    let s = Sites::new(&c, 0, &[]);
    let output = c
        .resolve(&[invoke(
            0,
            s.scope(),
            0,
            s.ty("Point"),
            "F",
            vec![Argument::named("a", ExprId(1)), Argument::named("zz", ExprId(2))],
        )])
        .unwrap();
    assert!(output.lowered[0].form.is_error());
    assert_eq!(output.diagnostics.count_of(DiagnosticKind::ArgumentMismatch), 1);
}

// ============================================================================
// Delegates and foreign bindings
// ============================================================================

#[test]
fn method_groups_bind_receivers_of_instance_members_only() {
    let c = compile(vec![SourceFile::new(0, "a").item(TypeDecl::class("Point")).item(
        AugmentationDecl::extending("PointExt", "Point")
            .member(MemberSyntax::method("Length").returns("int"))
            .member(MemberSyntax::method("Origin").make_static().returns("Point")),
    )]);
    let s = Sites::new(&c, 0, &[]);
    let instance = AccessSite::new(
        0,
        s.scope(),
        Access::Instance {
            receiver: ExprId(0),
            receiver_type: s.ty("Point"),
        },
        "Length",
        AccessShape::MethodGroup { arity: Some(0) },
    );
    let statik = AccessSite::new(
        1,
        s.scope(),
        Access::Static {
            qualifier: s.ty("Point"),
        },
        "Origin",
        AccessShape::MethodGroup { arity: None },
    );

    let mut m = Machine::new(&c);
    m.expr(0, Value::Int(7))
        .native("PointExt.Length", |args, _| Value::Int(args[0].int() * 2))
        .native("PointExt.Origin", |args, _| {
            assert!(args.is_empty());
            Value::Object("Point".into())
        });

    let bound = m.run(&lower_one(&c, instance));
    assert!(matches!(&bound, Value::Delegate { bound: Some(_), .. }));
    assert_eq!(m.invoke(&bound, vec![]), Value::Int(14));

    let unbound = m.run(&lower_one(&c, statik));
    assert!(matches!(&unbound, Value::Delegate { bound: None, .. }));
    assert_eq!(m.invoke(&unbound, vec![]), Value::Object("Point".into()));
}

#[test]
fn foreign_bindings_call_the_import_directly() {
    let c = compile(vec![SourceFile::new(0, "a").item(TypeDecl::static_class("Sound")).item(
        AugmentationDecl::extending("SoundExt", "Sound")
            .member(
                MemberSyntax::method("Beep")
                    .make_static()
                    .returns("bool")
                    .param(ParamSyntax::new("kind", "int"))
                    .foreign("user32", Some("MessageBeep")),
            )
            .member(
                MemberSyntax::method("Tick")
                    .make_static()
                    .foreign("kernel32", None),
            ),
    )]);
    assert!(c.diagnostics().is_empty(), "{}", c.diagnostics());
    let s = Sites::new(&c, 0, &[]);
    let sound = s.ty("Sound");

    let output = c
        .resolve(&[
            invoke_static(0, s.scope(), sound, "Beep", vec![Argument::positional(ExprId(1))]),
            invoke_static(1, s.scope(), sound, "Tick", vec![]),
        ])
        .unwrap();
    assert!(output.diagnostics.is_empty());
    assert!(matches!(output.lowered[0].form, CallForm::Foreign { .. }));

    let mut m = Machine::new(&c);
    m.expr(1, Value::Int(48))
        .native("user32!MessageBeep", |args, out| {
            out.push_str(&format!("beep{}", args[0]));
            Value::Bool(true)
        })
        .native("kernel32!Tick", writes(";tick"));
    assert_eq!(m.run_all(&output.lowered), vec![Value::Bool(true), Value::Void]);
    assert_eq!(m.output, "beep48;tick");
}

// ============================================================================
// Protocols
// ============================================================================

#[test]
fn augmented_enumerator_iterates_once() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::class("Bag"))
        .item(TypeDecl::class("Cursor"))
        .item(AugmentationDecl::extending("BagExt", "Bag").member(MemberSyntax::method("GetEnumerator").returns("Cursor")))
        .item(
            AugmentationDecl::extending("CursorExt", "Cursor")
                .member(MemberSyntax::method("MoveNext").returns("bool"))
                .member(MemberSyntax::property("Current", "int").get_only()),
        )]);
    let s = Sites::new(&c, 0, &[]);
    let output = c
        .resolve_protocols(&[ProtocolSite::new(
            0,
            s.scope(),
            ProtocolUse::Iterate {
                collection: ExprId(0),
                collection_type: s.ty("Bag"),
            },
        )])
        .unwrap();
    assert!(output.diagnostics.is_empty(), "{}", output.diagnostics);

    let mut moved = false;
    let mut m = Machine::new(&c);
    m.expr(0, Value::Object("Bag".into()))
        .native("BagExt.GetEnumerator", returns(Value::Object("Cursor".into())))
        .native("CursorExt.MoveNext", move |_, _| Value::Bool(!std::mem::replace(&mut moved, true)))
        .native("CursorExt.get_Current", returns(Value::Int(4)));
    assert_eq!(m.iterate(&output.lowered[0]), vec![Value::Int(4)]);
}

#[test]
fn augmented_awaiter_and_collection_initializer() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::delegate("Action"))
        .item(TypeDecl::class("Job"))
        .item(TypeDecl::class("JobAwaiter"))
        .item(TypeDecl::class("Bag"))
        .item(AugmentationDecl::extending("JobExt", "Job").member(MemberSyntax::method("GetAwaiter").returns("JobAwaiter")))
        .item(
            AugmentationDecl::extending("JobAwaiterExt", "JobAwaiter")
                .member(MemberSyntax::property("IsCompleted", "bool").get_only())
                .member(MemberSyntax::method("GetResult").returns("int"))
                .member(MemberSyntax::method("OnCompleted").param(ParamSyntax::new("continuation", "Action"))),
        )
        .item(
            AugmentationDecl::extending("BagExt", "Bag")
                .member(MemberSyntax::method("Add").param(ParamSyntax::new("x", "int")))
                .member(
                    MemberSyntax::method("Add")
                        .param(ParamSyntax::new("k", "string"))
                        .param(ParamSyntax::new("v", "int")),
                ),
        )]);
    assert!(c.diagnostics().is_empty(), "{}", c.diagnostics());
    let s = Sites::new(&c, 0, &[]);
    let output = c
        .resolve_protocols(&[
            ProtocolSite::new(
                0,
                s.scope(),
                ProtocolUse::Await {
                    operand: ExprId(0),
                    operand_type: s.ty("Job"),
                },
            ),
            ProtocolSite::new(
                1,
                s.scope(),
                ProtocolUse::CollectionInit {
                    target: ExprId(1),
                    target_type: s.ty("Bag"),
                    elements: vec![
                        vec![Argument::positional(ExprId(2))],
                        vec![Argument::positional(ExprId(3)), Argument::positional(ExprId(4))],
                    ],
                },
            ),
        ])
        .unwrap();
    assert!(output.diagnostics.is_empty(), "{}", output.diagnostics);

    let mut m = Machine::new(&c);
    m.expr(0, Value::Object("Job".into()))
        .expr(1, Value::Object("Bag".into()))
        .expr(2, Value::Int(1))
        .expr(3, Value::Text("k".into()))
        .expr(4, Value::Int(2))
        .native("JobExt.GetAwaiter", returns(Value::Object("JobAwaiter".into())))
        .native("JobAwaiterExt.get_IsCompleted", returns(Value::Bool(false)))
        .native("JobAwaiterExt.OnCompleted", |args, out| {
            out.push_str(&format!("[{}]", args[1]));
            Value::Void
        })
        .native("JobAwaiterExt.GetResult", returns(Value::Int(42)))
        .native("BagExt.Add", |args, out| {
            let parts: Vec<String> = args[1..].iter().map(|v| v.to_string()).collect();
            out.push_str(&format!("add({})", parts.join("=")));
            Value::Void
        });

    assert_eq!(m.await_value(&output.lowered[0]), Value::Int(42));
    m.initialize(&output.lowered[1]);
    assert_eq!(m.output, "[continuation]add(1)add(k=2)");
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn each_illegal_extended_type_is_reported_once() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::class("Point"))
        .item(AugmentationDecl::new("PtrExt", TypeExpr::pointer(TypeExpr::named("Point"))))
        .item(AugmentationDecl::new("ArrExt", TypeExpr::array(TypeExpr::named("Point"))))
        .item(AugmentationDecl::extending("GenExt", "T").type_param("T"))
        .item(AugmentationDecl::new("DynExt", TypeExpr::dynamic()))
        .item(AugmentationDecl::extending("OkExt", "Point"))]);

    let invalid: Vec<String> = c
        .diagnostics()
        .of_kind(DiagnosticKind::ExtendedTypeInvalid)
        .flat_map(|d| d.units.iter().map(|u| u.to_string()))
        .collect();
    assert_eq!(invalid, vec!["PtrExt", "ArrExt", "GenExt", "DynExt"]);
    assert_eq!(c.diagnostics().len(), 4);
}

#[test]
fn illegal_member_forms_leave_the_unit_inert() {
    let c = compile(vec![SourceFile::new(0, "a")
        .item(TypeDecl::class("Point"))
        .item(TypeDecl::static_class("Console"))
        .item(
            AugmentationDecl::extending("ConsoleExt", "Console")
                .member(MemberSyntax::method("Instance"))
                .member(MemberSyntax::method("Shared").make_static()),
        )
        .item(
            AugmentationDecl::extending("ClassicExt", "Point")
                .member(MemberSyntax::method("Old").param(ParamSyntax::new("self", "Point").receiver()))
                .member(MemberSyntax::method("Fine")),
        )]);
    let diagnostics = c.diagnostics();
    assert_eq!(diagnostics.count_of(DiagnosticKind::InstanceMemberInStaticOnlyExtension), 1);
    assert_eq!(diagnostics.count_of(DiagnosticKind::ExtensionMethodFormInExtensionUnit), 1);
    assert_eq!(diagnostics.error_count(), 2);

    let s = Sites::new(&c, 0, &[]);
    let output = c
        .resolve(&[
            invoke_static(0, s.scope(), s.ty("Console"), "Shared", vec![]),
            invoke(1, s.scope(), 0, s.ty("Point"), "Fine", vec![]),
        ])
        .unwrap();
    assert!(output.lowered.iter().all(|l| l.form.is_error()));
    assert_eq!(output.diagnostics.count_of(DiagnosticKind::MemberNotFound), 2);
}

// ============================================================================
// Determinism
// ============================================================================

fn mixed_files() -> Vec<SourceFile> {
    let mut files = conflicting_files();
    files.push(
        SourceFile::new(3, "more")
            .item(TypeDecl::class("Grid"))
            .item(AugmentationDecl::new("BadExt", TypeExpr::dynamic()))
            .item(
                AugmentationDecl::extending("GridExt", "Grid")
                    .member(MemberSyntax::property("Size", "int"))
                    .member(MemberSyntax::method("Fill").param(ParamSyntax::new("v", "int").default_value(ConstantValue::Int(0)))),
            ),
    );
    files
}

fn mixed_sites(c: &Compilation) -> Vec<AccessSite> {
    let s = Sites::new(c, 0, &[]);
    let grid = s.ty("Grid");
    let point = s.ty("Point");
    (0..40)
        .map(|i| match i % 4 {
            0 => invoke(i, s.scope(), i, point, "Length", vec![]),
            1 => get(
                i,
                s.scope(),
                Access::Instance {
                    receiver: ExprId(i),
                    receiver_type: grid,
                },
                "Size",
            ),
            2 => invoke(i, s.scope(), i, grid, "Fill", vec![]),
            _ => invoke(i, s.scope(), i, grid, "Missing", vec![Argument::positional(ExprId(100))]),
        })
        .collect()
}

#[test]
fn repeated_runs_are_identical() {
    let first = compile(mixed_files());
    let second = compile(mixed_files());
    assert_eq!(first.diagnostics(), second.diagnostics());

    let a = first.resolve(&mixed_sites(&first)).unwrap();
    let b = second.resolve(&mixed_sites(&second)).unwrap();
    assert_eq!(a.lowered, b.lowered);
    assert_eq!(a.diagnostics, b.diagnostics);
}

#[test]
fn parallel_and_sequential_pipelines_agree() {
    let sequential = compile_with(mixed_files(), CompilerOptions::new().with_parallel(false));
    let parallel = compile_with(mixed_files(), CompilerOptions::new().with_parallel(true));
    assert_eq!(sequential.diagnostics(), parallel.diagnostics());

    let a = sequential.resolve(&mixed_sites(&sequential)).unwrap();
    let b = parallel.resolve(&mixed_sites(&parallel)).unwrap();
    assert_eq!(a.lowered, b.lowered);
    assert_eq!(a.diagnostics, b.diagnostics);
}
