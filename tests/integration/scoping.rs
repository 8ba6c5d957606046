use crate::common::{analyze_err, analyze_in, analyze_ok, local_refs, original, originals, ref_binding, runtime};
use thicket::{ErrorKind, ExprKind, FrameKind, Position, Symbol};

fn var_name(kind: &ExprKind) -> String {
    match kind {
        ExprKind::VarDeref { var } | ExprKind::VarRef { var } => var.name.to_string(),
        other => panic!("expected var, got {:?}", other),
    }
}

// === Lexical shadowing ===

#[test]
fn test_local_shadows_var() {
    let mut rt = runtime();
    rt.define_var(&Symbol::simple("x"));
    let analysis = analyze_in(&mut rt, "(let* [x 1] x)").unwrap();
    let refs = local_refs(&analysis.expr, "x");
    assert_eq!(refs.len(), 1);
    assert!(analysis.frames.root().lifted_vars.is_empty());
}

#[test]
fn test_local_shadows_core_fn() {
    let analysis = analyze_ok("(let* [inc 1] inc)");
    assert_eq!(local_refs(&analysis.expr, "inc").len(), 1);
}

#[test]
fn test_inner_let_shadows_outer_let() {
    let analysis = analyze_ok("(let* [x 1] (let* [x 2] x))");
    let bindings = originals(&analysis.frames, "x");
    assert_eq!(bindings.len(), 2);
    let refs = local_refs(&analysis.expr, "x");
    assert_eq!(refs.len(), 1);
    assert_eq!(ref_binding(refs[0]), bindings[1].0);
}

#[test]
fn test_shadowing_is_scoped() {
    let analysis = analyze_ok("(let* [x 1] (do (let* [x 2] x) x))");
    let bindings = originals(&analysis.frames, "x");
    let refs = local_refs(&analysis.expr, "x");
    assert_eq!(refs.len(), 2);
    assert_eq!(ref_binding(refs[0]), bindings[1].0);
    assert_eq!(ref_binding(refs[1]), bindings[0].0);
}

#[test]
fn test_fn_name_shadows_outer_local_in_call() {
    let analysis = analyze_ok("(let* [foo 1] (fn* foo [] (foo)))");
    let recursions = crate::common::collect(&analysis.expr, |e| {
        matches!(e.kind, ExprKind::NamedRecursion { .. })
    });
    assert_eq!(recursions.len(), 1);
    assert!(local_refs(&analysis.expr, "foo").is_empty());
    assert!(analysis.frames.frames().all(|(_, frame)| frame.captures.is_empty()));
}

#[test]
fn test_fn_name_shadows_outer_local_in_reference() {
    let analysis = analyze_ok("(let* [foo 1] (fn* foo [] foo))");
    let refs = crate::common::collect(&analysis.expr, |e| {
        matches!(e.kind, ExprKind::RecursionReference { .. })
    });
    assert_eq!(refs.len(), 1);
    assert!(local_refs(&analysis.expr, "foo").is_empty());
}

#[test]
fn test_fn_name_shadows_outer_local_across_inner_fn() {
    let analysis = analyze_ok("(let* [foo 1] (fn* foo [] (fn* [] (foo))))");
    let recursions = crate::common::collect(&analysis.expr, |e| {
        matches!(e.kind, ExprKind::NamedRecursion { .. })
    });
    assert_eq!(recursions.len(), 1);
}

#[test]
fn test_outer_local_visible_beside_named_fn() {
    let analysis = analyze_ok("(let* [foo 1] (do (fn* foo [] nil) foo))");
    assert_eq!(local_refs(&analysis.expr, "foo").len(), 1);
}

#[test]
fn test_param_shadows_outer_let_without_capture() {
    let analysis = analyze_ok("(let* [x 1] (fn* [x] x))");
    let refs = local_refs(&analysis.expr, "x");
    let binding = analysis.frames.binding(ref_binding(refs[0]));
    assert!(!binding.is_capture());
    assert_eq!(analysis.frames.frame(binding.frame).kind, FrameKind::Fn);
    assert!(analysis
        .frames
        .frames()
        .all(|(_, frame)| frame.captures.is_empty()));
}

#[test]
fn test_let_bindings_are_sequential() {
    let analysis = analyze_ok("(let* [x 1 y x] y)");
    let (x, _) = original(&analysis.frames, "x");
    let refs = local_refs(&analysis.expr, "x");
    assert_eq!(refs.len(), 1);
    assert_eq!(ref_binding(refs[0]), x);
}

#[test]
fn test_initializer_does_not_see_its_own_binding() {
    let err = analyze_err("(let* [x x] x)");
    assert_eq!(err.kind, ErrorKind::AnalyzeUnresolvedSymbol);
}

#[test]
fn test_qualified_symbol_never_names_a_local() {
    let err = analyze_err("(let* [x 1] user/x)");
    assert_eq!(err.kind, ErrorKind::AnalyzeUnresolvedVar);
}

// === Var resolution ===

#[test]
fn test_core_fn_resolves_to_core_var() {
    let analysis = analyze_ok("inc");
    assert_eq!(var_name(&analysis.expr.kind), "clojure.core/inc");
}

#[test]
fn test_current_ns_var_shadows_core() {
    let mut rt = runtime();
    rt.define_var(&Symbol::simple("inc"));
    let analysis = analyze_in(&mut rt, "inc").unwrap();
    assert_eq!(var_name(&analysis.expr.kind), "user/inc");
}

#[test]
fn test_alias_resolves_to_target_namespace() {
    let mut rt = runtime();
    rt.add_alias("c", "clojure.core");
    let analysis = analyze_in(&mut rt, "c/inc").unwrap();
    assert_eq!(var_name(&analysis.expr.kind), "clojure.core/inc");
}

#[test]
fn test_var_special_form_refers_to_var_object() {
    let analysis = analyze_ok("(var inc)");
    assert!(matches!(analysis.expr.kind, ExprKind::VarRef { .. }));
    assert_eq!(var_name(&analysis.expr.kind), "clojure.core/inc");
}

// === Positions ===

#[test]
fn test_top_level_is_value_position() {
    let analysis = analyze_ok("42");
    assert_eq!(analysis.expr.position, Position::Value);
}

#[test]
fn test_do_positions() {
    let analysis = analyze_ok("(fn* [] (do (inc 1) 2))");
    let ExprKind::Function { arities, .. } = &analysis.expr.kind else {
        panic!("expected fn");
    };
    let ExprKind::Do(exprs) = &arities[0].body.kind else {
        panic!("expected do body");
    };
    assert_eq!(exprs[0].position, Position::Statement);
    assert_eq!(exprs[1].position, Position::Tail);
}

#[test]
fn test_if_branches_inherit_and_condition_is_value() {
    let analysis = analyze_ok("(fn* [x] (if x 1 2))");
    let ExprKind::Function { arities, .. } = &analysis.expr.kind else {
        panic!("expected fn");
    };
    let ExprKind::If { cond, then, else_ } = &arities[0].body.kind else {
        panic!("expected if body");
    };
    assert_eq!(cond.position, Position::Value);
    assert_eq!(then.position, Position::Tail);
    assert_eq!(else_.as_ref().map(|e| e.position), Some(Position::Tail));
}

#[test]
fn test_let_body_takes_let_position() {
    let analysis = analyze_ok("(fn* [] (let* [a 1] (inc a) a))");
    let refs = local_refs(&analysis.expr, "a");
    assert_eq!(refs.last().map(|r| r.position), Some(Position::Tail));
}
