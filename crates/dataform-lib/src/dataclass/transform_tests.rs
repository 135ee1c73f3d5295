use dataform_core::{ClassId, Position, Statement, SymbolNode, SymbolTableNode, Type, TypeBinding, TypeVarExpr};

use super::{DeferReason, Outcome};
use crate::shot_class;
use crate::test_utils::{ClassBuilder, Program};

fn synthesized(outcome: Outcome) -> super::Synthesis {
    match outcome {
        Outcome::Synthesized(synthesis) => synthesis,
        Outcome::Deferred(reason) => panic!("unexpected defer: {reason}"),
    }
}

fn generated_funcs(program: &Program, id: ClassId, name: &str) -> usize {
    program
        .info(id)
        .defn
        .body
        .iter()
        .filter(|stmt| matches!(stmt, Statement::Func(func) if func.name == name))
        .count()
}

#[test]
fn point() {
    let mut program = Program::new();
    let point = program.add(
        ClassBuilder::new("Point")
            .field("x", "int")
            .field_default("y", "int"),
    );

    shot_class!(program, point, @r"
    class m.Point
      x: builtins.int
      y: builtins.int
      def __init__(self, x: builtins.int, y: builtins.int = ...) -> None [generated]
      _DT = TypeVar(bound=m.Point) [generated]
      def __eq__[_DT <: m.Point](self: _DT, other: _DT) -> builtins.bool [generated]
      def __ne__[_DT <: m.Point](self: _DT, other: _DT) -> builtins.bool [generated]
    dataclass: frozen=false
      x @2:4 init
      y @3:4 init, default
    ---
    ");
}

#[test]
fn generated_members_are_listed() {
    let mut program = Program::new();
    let point = program.add(ClassBuilder::new("Point").field("x", "int"));

    let (outcome, diag) = program.transform(point);
    let synthesis = synthesized(outcome);

    assert_eq!(synthesis.generated, ["__init__", "_DT", "__eq__", "__ne__"]);
    assert!(synthesis.dependencies.is_empty());
    assert!(diag.is_empty());
}

#[test]
fn second_run_is_identical() {
    let mut program = Program::new();
    let base = program.add(
        ClassBuilder::new("Base")
            .field("x", "int")
            .init_var("seed", "int"),
    );
    program.transform(base);
    let sub = program.add_derived(
        ClassBuilder::new("Sub")
            .flag("order", true)
            .flag("frozen", true)
            .field_default("y", "str"),
        base,
    );

    let first = program.render(sub);
    let second = program.render(sub);
    let base_again = program.render(base);
    let base_third = program.render(base);

    assert_eq!(first, second);
    assert_eq!(base_again, base_third);
    assert_eq!(generated_funcs(&program, sub, "__init__"), 1);
    assert_eq!(generated_funcs(&program, sub, "__lt__"), 1);
    assert_eq!(generated_funcs(&program, base, "__init__"), 1);
}

#[test]
fn order_without_eq() {
    let mut program = Program::new();
    let id = program.add(
        ClassBuilder::new("C")
            .flag("order", true)
            .flag("eq", false)
            .field("x", "int"),
    );

    shot_class!(program, id, @r"
    class m.C
      x: builtins.int
      def __init__(self, x: builtins.int) -> None [generated]
      _DT = TypeVar(bound=m.C) [generated]
    dataclass: frozen=false
      x @2:4 init
    ---
    error at 1:0: eq must be True if order is True
    ");
}

#[test]
fn custom_ordering_method_is_kept_and_reported() {
    let mut program = Program::new();
    let id = program.add(
        ClassBuilder::new("C")
            .flag("order", true)
            .field("x", "int")
            .method("__lt__"),
    );

    shot_class!(program, id, @r"
    class m.C
      x: builtins.int
      def __lt__(self) -> None
      def __init__(self, x: builtins.int) -> None [generated]
      _DT = TypeVar(bound=m.C) [generated]
      def __eq__[_DT <: m.C](self: _DT, other: _DT) -> builtins.bool [generated]
      def __ne__[_DT <: m.C](self: _DT, other: _DT) -> builtins.bool [generated]
      def __gt__[_DT <: m.C](self: _DT, other: _DT) -> builtins.bool [generated]
      def __le__[_DT <: m.C](self: _DT, other: _DT) -> builtins.bool [generated]
      def __ge__[_DT <: m.C](self: _DT, other: _DT) -> builtins.bool [generated]
    dataclass: frozen=false
      x @2:4 init
    ---
    error at 3:4: You may not have a custom __lt__ method when order=True (related: order=True requested here at 1:0) (hint: remove the method, or drop `order=True`)
    ");
}

#[test]
fn frozen_subclass_freezes_inherited_fields() {
    let mut program = Program::new();
    let base = program.add(ClassBuilder::new("Base").field("z", "int"));
    program.transform(base);
    let sub = program.add_derived(
        ClassBuilder::new("Sub")
            .flag("frozen", true)
            .field("w", "str"),
        base,
    );

    shot_class!(program, sub, @r"
    class m.Sub
      w: builtins.str [property]
      def __init__(self, z: builtins.int, w: builtins.str) -> None [generated]
      _DT = TypeVar(bound=m.Sub) [generated]
      def __eq__[_DT <: m.Sub](self: _DT, other: _DT) -> builtins.bool [generated]
      def __ne__[_DT <: m.Sub](self: _DT, other: _DT) -> builtins.bool [generated]
      z: builtins.int [property, generated]
    dataclass: frozen=true
      z @2:4 init
      w @2:4 init
    ---
    ");

    let base_z = program.info(base).names.get("z").and_then(|n| n.node.as_var());
    assert!(base_z.is_some_and(|var| !var.is_property));
}

#[test]
fn init_only_fields_are_parameters_not_attributes() {
    let mut program = Program::new();
    let base = program.add(
        ClassBuilder::new("Base")
            .field("x", "int")
            .init_var("seed", "int"),
    );

    shot_class!(program, base, @r"
    class m.Base
      x: builtins.int
      def __init__(self, x: builtins.int, seed: builtins.int) -> None [generated]
      _DT = TypeVar(bound=m.Base) [generated]
      def __eq__[_DT <: m.Base](self: _DT, other: _DT) -> builtins.bool [generated]
      def __ne__[_DT <: m.Base](self: _DT, other: _DT) -> builtins.bool [generated]
    dataclass: frozen=false
      x @2:4 init
      seed @3:4 init, init-only
    ---
    ");

    // A subclass with no fields of its own still takes the parameter.
    let sub = program.add_derived(ClassBuilder::new("Sub"), base);
    let (outcome, _) = program.transform(sub);
    synthesized(outcome);

    assert!(program.registry.lookup(sub, "seed").is_none());
    let init = program.info(sub).method("__init__").expect("generated constructor");
    let params: Vec<&str> = init.arguments.iter().map(|arg| arg.name()).collect();
    assert_eq!(params, ["x", "seed"]);
    assert_eq!(
        init.argument("seed").and_then(|arg| arg.annotation.clone()),
        Some(Type::instance("builtins.int"))
    );
}

#[test]
fn equality_rejects_unrelated_classes() {
    let mut program = Program::new();
    let a = program.add(ClassBuilder::new("A").field("x", "int"));
    let b = program.add(ClassBuilder::new("B").field("x", "int"));
    let c = program.add(ClassBuilder::new("C").flag("order", true).field("y", "str"));
    for id in [a, b, c] {
        program.transform(id);
    }

    for owner in [a, b, c] {
        for method in ["__eq__", "__ne__"] {
            let func = program.info(owner).method(method).expect("generated");
            let bound = func.arguments[0].annotation.as_ref().expect("annotated");
            for other in [a, b, c] {
                let accepted = program
                    .registry
                    .satisfies_bound(&program.info(other).instance_type(), bound);
                assert_eq!(accepted, owner == other, "{method} on {owner:?} vs {other:?}");
            }
        }
    }

    let lt = program.info(c).method("__lt__").expect("generated");
    assert_eq!(lt.self_type, lt.arguments[0].annotation);
    assert_eq!(lt.return_type, Type::instance("builtins.bool"));
}

#[test]
fn equality_accepts_subclasses() {
    let mut program = Program::new();
    let base = program.add(ClassBuilder::new("Base").field("x", "int"));
    program.transform(base);
    let sub = program.add_derived(ClassBuilder::new("Sub"), base);
    program.transform(sub);

    let eq = program.info(base).method("__eq__").expect("generated");
    let bound = eq.arguments[0].annotation.as_ref().expect("annotated");
    assert!(
        program
            .registry
            .satisfies_bound(&program.info(sub).instance_type(), bound)
    );
}

#[test]
fn pending_type_defers_silently() {
    let mut program = Program::new();
    let id = program.add(
        ClassBuilder::new("C")
            .field_default("a", "int")
            .field("b", "int")
            .pending("c"),
    );

    let (outcome, diag) = program.transform(id);

    assert!(matches!(
        outcome,
        Outcome::Deferred(DeferReason::PendingType(ref name)) if name == "c"
    ));
    assert!(diag.is_empty());
    assert!(program.info(id).metadata.is_empty());
    assert!(program.info(id).method("__init__").is_none());

    // Once the analyzer resolves the type, the next run completes and reports.
    let info = program.registry.get_mut(id).expect("registered");
    if let Some(var) = info.names.get_mut("c").and_then(|n| n.node.as_var_mut()) {
        var.ty = TypeBinding::Resolved(Type::instance("builtins.str"));
    }
    let (outcome, diag) = program.transform(id);

    assert!(!outcome.is_deferred());
    assert_eq!(diag.len(), 2);
}

#[test]
fn deferred_render() {
    let mut program = Program::new();
    let base = program.add(ClassBuilder::new("Base").field("a", "int"));
    let sub = program.add_derived(ClassBuilder::new("Sub"), base);

    shot_class!(program, sub, @"deferred: ancestor `m.Base` has not been synthesized yet");
}

#[test]
fn dependencies_become_triggers() {
    let mut program = Program::new();
    let base = program.add(ClassBuilder::new("Base").field("a", "int"));
    program.transform(base);
    let sub = program.add_derived(ClassBuilder::new("Sub").field("b", "int"), base);

    let synthesis = synthesized(program.transform(sub).0);
    let triggers: Vec<String> = synthesis.triggers().collect();

    assert_eq!(triggers, ["<m.Base.*>"]);
}

#[test]
fn user_methods_are_not_replaced() {
    let mut program = Program::new();
    let id = program.add(
        ClassBuilder::new("C")
            .field("x", "int")
            .method("__init__")
            .method("__eq__"),
    );

    let synthesis = synthesized(program.transform(id).0);

    // No generated equality means no self type variable either.
    assert!(synthesis.generated.is_empty());
    let info = program.info(id);
    assert!(info.names.get("__init__").is_some_and(|n| !n.plugin_generated));
    assert!(info.method("__init__").is_some_and(|f| f.arguments.is_empty()));
    assert!(!info.names.contains("__ne__"));
    assert!(!info.names.contains("_DT"));
}

#[test]
fn init_flag_off_skips_constructor() {
    let mut program = Program::new();
    let id = program.add(ClassBuilder::new("C").flag("init", false).field("x", "int"));

    let synthesis = synthesized(program.transform(id).0);

    assert!(!synthesis.generated.iter().any(|name| name == "__init__"));
    assert!(program.info(id).method("__init__").is_none());
}

#[test]
fn empty_class_gets_no_constructor() {
    let mut program = Program::new();
    let id = program.add(ClassBuilder::new("Empty"));

    shot_class!(program, id, @r"
    class m.Empty
      _DT = TypeVar(bound=m.Empty) [generated]
      def __eq__[_DT <: m.Empty](self: _DT, other: _DT) -> builtins.bool [generated]
      def __ne__[_DT <: m.Empty](self: _DT, other: _DT) -> builtins.bool [generated]
    dataclass: frozen=false
    ---
    ");
}

#[test]
fn ordering_violation_still_generates_constructor() {
    let mut program = Program::new();
    let id = program.add(
        ClassBuilder::new("C")
            .field_default("a", "int")
            .field("b", "int"),
    );

    let (outcome, diag) = program.transform(id);
    synthesized(outcome);

    assert_eq!(diag.len(), 1);
    let init = program.info(id).method("__init__").expect("generated constructor");
    assert_eq!(init.arguments.len(), 2);
}

#[test]
fn frozen_subclass_follows_ancestor_retype() {
    let mut program = Program::new();
    let base = program.add(ClassBuilder::new("Base").field("z", "int"));
    program.transform(base);
    let sub = program.add_derived(
        ClassBuilder::new("Sub")
            .flag("frozen", true)
            .field("w", "str"),
        base,
    );
    program.transform(sub);

    program.retype(base, "z", TypeBinding::Resolved(Type::instance("builtins.str")));
    program.transform(base);
    program.transform(sub);

    let init = program.info(sub).method("__init__").expect("generated constructor");
    assert_eq!(
        init.argument("z").and_then(|arg| arg.annotation.clone()),
        Some(Type::instance("builtins.str"))
    );
    assert!(program.dump(sub).contains("  z: builtins.str [property, generated]\n"));

    // The materialized property does not hide a declaration that became pending.
    program.retype(base, "z", TypeBinding::Pending);
    let (outcome, _) = program.transform(sub);
    assert!(matches!(
        outcome,
        Outcome::Deferred(DeferReason::PendingType(ref name)) if name == "z"
    ));
}

#[test]
fn dropped_flags_remove_their_members() {
    let mut program = Program::new();
    let base = program.add(ClassBuilder::new("Base").field("z", "int"));
    program.transform(base);
    let sub = program.add_derived(
        ClassBuilder::new("Sub")
            .flag("order", true)
            .flag("frozen", true)
            .field("w", "str"),
        base,
    );
    program.transform(sub);
    assert_eq!(generated_funcs(&program, sub, "__lt__"), 1);

    program.redecorate(sub, ClassBuilder::new("Sub"));

    shot_class!(program, sub, @r"
    class m.Sub
      w: builtins.str
      def __init__(self, z: builtins.int, w: builtins.str) -> None [generated]
      _DT = TypeVar(bound=m.Sub) [generated]
      def __eq__[_DT <: m.Sub](self: _DT, other: _DT) -> builtins.bool [generated]
      def __ne__[_DT <: m.Sub](self: _DT, other: _DT) -> builtins.bool [generated]
    dataclass: frozen=false
      z @2:4 init
      w @2:4 init
    ---
    ");
    for name in ["__lt__", "__gt__", "__le__", "__ge__"] {
        assert_eq!(generated_funcs(&program, sub, name), 0, "{name}");
    }
    assert_eq!(generated_funcs(&program, sub, "__init__"), 1);
}

#[test]
fn dropping_eq_removes_equality_members() {
    let mut program = Program::new();
    let id = program.add(ClassBuilder::new("C").field("x", "int"));
    program.transform(id);

    program.redecorate(id, ClassBuilder::new("C").flag("eq", false));
    let synthesis = synthesized(program.transform(id).0);

    assert_eq!(synthesis.generated, ["__init__"]);
    let info = program.info(id);
    for name in ["_DT", "__eq__", "__ne__"] {
        assert!(!info.names.contains(name), "{name}");
    }
    assert_eq!(generated_funcs(&program, id, "__eq__"), 0);
}

#[test]
fn deferred_run_keeps_init_only_fields_hidden() {
    let mut program = Program::new();
    let base = program.add(
        ClassBuilder::new("Base")
            .field("x", "int")
            .init_var("seed", "int"),
    );
    program.transform(base);
    let sub = program.add_derived(ClassBuilder::new("Sub").pending("later"), base);

    let (outcome, diag) = program.transform(sub);

    assert!(outcome.is_deferred());
    assert!(diag.is_empty());
    assert!(program.registry.lookup(sub, "seed").is_none());
    assert!(program.info(sub).metadata.is_empty());
}

#[test]
fn ordering_name_without_position_is_reported_at_class() {
    let mut program = Program::new();
    let id = program.add(
        ClassBuilder::new("C")
            .flag("order", true)
            .field("x", "int"),
    );
    let info = program.registry.get_mut(id).expect("registered");
    let tvar = TypeVarExpr {
        name: "__le__".to_owned(),
        fullname: "m.C.__le__".to_owned(),
        upper_bound: Type::instance("builtins.object"),
    };
    info.names
        .insert("__le__", SymbolTableNode::new(SymbolNode::TypeVarExpr(tvar)));

    let (_, diag) = program.transform(id);

    assert_eq!(diag.positions().collect::<Vec<_>>(), [Position::new(1, 0)]);
    assert!(program.info(id).method("__le__").is_none());
}
