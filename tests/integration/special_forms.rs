use crate::common::{analyze_err, analyze_in, analyze_ok, analyze_with_config, runtime};
use thicket::hir::NativeChunk;
use thicket::{AnalyzerConfig, ErrorKind, ExprKind, Position, Symbol, Value};

fn assert_error(source: &str, kind: ErrorKind) {
    let err = analyze_err(source);
    assert_eq!(err.kind, kind, "{} failed with {}", source, err);
}

// === def ===

#[test]
fn test_def_without_value() {
    let analysis = analyze_ok("(def counter)");
    assert!(matches!(analysis.expr.kind, ExprKind::Def { value: None, .. }));
}

#[test]
fn test_def_with_doc_string() {
    let analysis = analyze_ok("(def pi \"The circle constant\" 3.14)");
    match &analysis.expr.kind {
        ExprKind::Def { value: Some(value), .. } => assert!(matches!(
            value.kind,
            ExprKind::PrimitiveLiteral { value: Value::Float(_), .. }
        )),
        other => panic!("expected def, got {:?}", other),
    }
}

#[test]
fn test_def_value_can_refer_to_itself() {
    let analysis = analyze_ok("(def f (fn* [] f))");
    let ExprKind::Def { value: Some(value), .. } = &analysis.expr.kind else {
        panic!("expected def");
    };
    let ExprKind::Function { arities, .. } = &value.kind else {
        panic!("expected fn");
    };
    assert!(matches!(
        &arities[0].body.kind,
        ExprKind::VarDeref { var } if var.name == Symbol::qualified("user", "f")
    ));
}

#[test]
fn test_def_qualified_with_current_ns() {
    analyze_ok("(def user/x 1)");
}

#[test]
fn test_def_shadows_core_var() {
    let mut rt = runtime();
    let analysis = analyze_in(&mut rt, "(def inc 1)").unwrap();
    assert!(matches!(
        &analysis.expr.kind,
        ExprKind::Def { var, .. } if var.name == Symbol::qualified("user", "inc")
    ));
}

#[test]
fn test_invalid_defs() {
    assert_error("(def)", ErrorKind::AnalyzeInvalidDef);
    assert_error("(def 1 2)", ErrorKind::AnalyzeInvalidDef);
    assert_error("(def other/x 1)", ErrorKind::AnalyzeInvalidDef);
    assert_error("(def x 1 2)", ErrorKind::AnalyzeInvalidDef);
    assert_error("(def x 1 2 3)", ErrorKind::AnalyzeInvalidDef);
}

// === fn* ===

#[test]
fn test_fn_single_arity() {
    let analysis = analyze_ok("(fn* add [a b] (+ a b))");
    match &analysis.expr.kind {
        ExprKind::Function {
            name,
            unique_name,
            arities,
        } => {
            assert_eq!(name.as_ref().map(|n| n.name()), Some("add"));
            assert!(unique_name.starts_with("add_"));
            assert_eq!(arities.len(), 1);
            assert_eq!(arities[0].params.len(), 2);
            assert!(!arities[0].is_variadic);
            assert_eq!(arities[0].body.position, Position::Tail);
        }
        other => panic!("expected fn, got {:?}", other),
    }
}

#[test]
fn test_fn_multi_arity_and_variadic() {
    let analysis = analyze_ok("(fn* ([] 0) ([x] x) ([x y & more] y))");
    let ExprKind::Function { arities, name, .. } = &analysis.expr.kind else {
        panic!("expected fn");
    };
    assert!(name.is_none());
    assert_eq!(arities.len(), 3);
    assert!(arities[2].is_variadic);
    assert_eq!(arities[2].fixed_count(), 2);
    assert_eq!(arities[2].params.len(), 3);
    let ctx = analysis.frames.frame(arities[2].frame).fn_ctx.as_ref().unwrap();
    assert_eq!(ctx.param_count, 3);
    assert!(ctx.is_variadic);
}

#[test]
fn test_empty_fn_body_is_nil() {
    let analysis = analyze_ok("(fn* [])");
    let ExprKind::Function { arities, .. } = &analysis.expr.kind else {
        panic!("expected fn");
    };
    assert!(matches!(
        arities[0].body.kind,
        ExprKind::PrimitiveLiteral { value: Value::Nil, constant: None }
    ));
}

#[test]
fn test_invalid_fns() {
    assert_error("(fn*)", ErrorKind::AnalyzeInvalidFn);
    assert_error("(fn* f)", ErrorKind::AnalyzeInvalidFn);
    assert_error("(fn* user/f [] 1)", ErrorKind::AnalyzeInvalidFn);
    assert_error("(fn* (x) 1)", ErrorKind::AnalyzeInvalidFn);
    assert_error("(fn* ([x] 1) ([y] 2))", ErrorKind::AnalyzeInvalidFn);
    assert_error("(fn* ([& a] 1) ([& b] 2))", ErrorKind::AnalyzeInvalidFn);
    assert_error("(fn* ([a & b] 1) ([x y z] 2))", ErrorKind::AnalyzeInvalidFn);
}

#[test]
fn test_invalid_params() {
    assert_error("(fn* [1] 1)", ErrorKind::AnalyzeInvalidFnParameters);
    assert_error("(fn* [user/x] 1)", ErrorKind::AnalyzeInvalidFnParameters);
    assert_error("(fn* [&] 1)", ErrorKind::AnalyzeInvalidFnParameters);
    assert_error("(fn* [& a b] 1)", ErrorKind::AnalyzeInvalidFnParameters);
    assert_error("(fn* [a & &] 1)", ErrorKind::AnalyzeInvalidFnParameters);
}

#[test]
fn test_param_limit_comes_from_config() {
    let config = AnalyzerConfig::default().with_max_fn_params(2);
    assert!(analyze_with_config("(fn* [a b] 1)", config.clone()).is_ok());
    let err = analyze_with_config("(fn* [a b c] 1)", config.clone()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AnalyzeInvalidFnParameters);
    let err = analyze_with_config("(fn* [a b & c] 1)", config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AnalyzeInvalidFnParameters);
}

// === let*, loop*, letfn* ===

#[test]
fn test_let_shares_initializers_with_bindings() {
    let analysis = analyze_ok("(let* [a (str 1)] a)");
    let ExprKind::Let { pairs, is_loop, .. } = &analysis.expr.kind else {
        panic!("expected let");
    };
    assert!(!is_loop);
    let (binding, init) = &pairs[0];
    let value = analysis.frames.binding(*binding).value.as_ref().unwrap();
    assert!(std::rc::Rc::ptr_eq(value, init));
}

#[test]
fn test_loop_bindings_have_no_value() {
    let analysis = analyze_ok("(loop* [i 0] i)");
    let ExprKind::Let { pairs, is_loop, frame, .. } = &analysis.expr.kind else {
        panic!("expected loop");
    };
    assert!(*is_loop);
    assert!(analysis.frames.binding(pairs[0].0).value.is_none());
    assert_eq!(analysis.frames.frame(*frame).recur_arity, Some(1));
}

#[test]
fn test_invalid_lets() {
    assert_error("(let* x 1)", ErrorKind::AnalyzeInvalidLet);
    assert_error("(let* [x] x)", ErrorKind::AnalyzeInvalidLet);
    assert_error("(let* [1 2] 1)", ErrorKind::AnalyzeInvalidLet);
    assert_error("(let* [user/x 2] 1)", ErrorKind::AnalyzeInvalidLet);
    assert_error("(loop* [i] i)", ErrorKind::AnalyzeInvalidLoop);
    assert_error("(loop*)", ErrorKind::AnalyzeInvalidLoop);
}

#[test]
fn test_invalid_letfns() {
    assert_error("(letfn* f 1)", ErrorKind::AnalyzeInvalidLetfn);
    assert_error("(letfn* [f] 1)", ErrorKind::AnalyzeInvalidLetfn);
    assert_error("(letfn* [f 1] 1)", ErrorKind::AnalyzeInvalidLetfn);
    assert_error("(letfn* [1 (fn* [] 1)] 1)", ErrorKind::AnalyzeInvalidLetfn);
}

// === do, if, quote, var, throw ===

#[test]
fn test_empty_do_is_nil() {
    let analysis = analyze_ok("(do)");
    assert!(matches!(
        analysis.expr.kind,
        ExprKind::PrimitiveLiteral { value: Value::Nil, .. }
    ));
}

#[test]
fn test_if_without_else() {
    let analysis = analyze_ok("(if true 1)");
    assert!(matches!(analysis.expr.kind, ExprKind::If { else_: None, .. }));
}

#[test]
fn test_invalid_simple_forms() {
    assert_error("(if)", ErrorKind::AnalyzeInvalidIf);
    assert_error("(if true)", ErrorKind::AnalyzeInvalidIf);
    assert_error("(if true 1 2 3)", ErrorKind::AnalyzeInvalidIf);
    assert_error("(quote)", ErrorKind::AnalyzeInvalidQuote);
    assert_error("(quote a b)", ErrorKind::AnalyzeInvalidQuote);
    assert_error("(var)", ErrorKind::AnalyzeInvalidVarReference);
    assert_error("(var 1)", ErrorKind::AnalyzeInvalidVarReference);
    assert_error("(var nope)", ErrorKind::AnalyzeUnresolvedVar);
    assert_error("(throw)", ErrorKind::AnalyzeInvalidThrow);
    assert_error("(throw 1 2)", ErrorKind::AnalyzeInvalidThrow);
}

#[test]
fn test_quoted_symbol_is_data() {
    let analysis = analyze_ok("'undefined-thing");
    assert!(matches!(
        &analysis.expr.kind,
        ExprKind::PrimitiveLiteral { value: Value::Symbol(s), .. } if s.name() == "undefined-thing"
    ));
}

#[test]
fn test_throw_value_is_boxed() {
    let analysis = analyze_ok("(let* [e 1] (throw e))");
    let (_, e) = crate::common::original(&analysis.frames, "e");
    assert!(e.has_boxed_usage);
}

// === try ===

#[test]
fn test_try_with_catch_and_finally() {
    let analysis = analyze_ok("(fn* [] (try (str 1) 2 (catch Exception e e) (finally (str 3))))");
    let ExprKind::Function { arities, .. } = &analysis.expr.kind else {
        panic!("expected fn");
    };
    let ExprKind::Try {
        body,
        catch,
        finally,
        ..
    } = &arities[0].body.kind
    else {
        panic!("expected try");
    };
    assert!(matches!(body.kind, ExprKind::Do(ref items) if items.len() == 2));
    assert_eq!(body.position, Position::Tail);

    let catch = catch.as_ref().unwrap();
    assert_eq!(catch.exception_type, Symbol::simple("Exception"));
    assert_eq!(catch.body.position, Position::Tail);
    assert_eq!(analysis.frames.binding(catch.binding).name, Symbol::simple("e"));

    assert_eq!(finally.as_ref().map(|f| f.position), Some(Position::Statement));
}

#[test]
fn test_try_without_clauses() {
    let analysis = analyze_ok("(try)");
    assert!(matches!(
        analysis.expr.kind,
        ExprKind::Try { catch: None, finally: None, .. }
    ));
}

#[test]
fn test_invalid_trys() {
    assert_error("(try (catch Exception e 1) 2)", ErrorKind::AnalyzeInvalidTry);
    assert_error("(try (finally 1) (catch Exception e 1))", ErrorKind::AnalyzeInvalidTry);
    assert_error("(try (catch A a 1) (catch B b 2))", ErrorKind::AnalyzeInvalidTry);
    assert_error("(try (catch Exception))", ErrorKind::AnalyzeInvalidTry);
    assert_error("(try (catch 1 e e))", ErrorKind::AnalyzeInvalidTry);
}

#[test]
fn test_catch_binding_does_not_leak() {
    assert_error("(do (try 1 (catch Exception e 2)) e)", ErrorKind::AnalyzeUnresolvedSymbol);
}

// === case* ===

#[test]
fn test_case() {
    let analysis = analyze_ok("(fn* [x] (case* x 0 3 :default {1 :one 2 :two}))");
    let ExprKind::Function { arities, .. } = &analysis.expr.kind else {
        panic!("expected fn");
    };
    match &arities[0].body.kind {
        ExprKind::Case {
            value,
            shift,
            mask,
            default,
            keys,
            exprs,
        } => {
            assert_eq!(value.position, Position::Value);
            assert_eq!((*shift, *mask), (0, 3));
            assert_eq!(keys, &vec![1, 2]);
            assert_eq!(exprs.len(), 2);
            assert!(exprs.iter().all(|e| e.position == Position::Tail));
            assert_eq!(default.position, Position::Tail);
        }
        other => panic!("expected case, got {:?}", other),
    }
}

#[test]
fn test_invalid_cases() {
    assert_error("(case* 1 0 0 nil)", ErrorKind::AnalyzeInvalidCase);
    assert_error("(case* 1 a 0 nil {})", ErrorKind::AnalyzeInvalidCase);
    assert_error("(case* 1 0 0 nil [1 2])", ErrorKind::AnalyzeInvalidCase);
    assert_error("(case* 1 0 0 nil {:a 1})", ErrorKind::AnalyzeInvalidCase);
}

// === native/raw ===

#[test]
fn test_native_raw_interpolation() {
    let analysis = analyze_ok("(let* [x 1] (native/raw \"return ~{ (inc x) } + 1;\"))");
    let ExprKind::Let { body, .. } = &analysis.expr.kind else {
        panic!("expected let");
    };
    let ExprKind::NativeRaw { chunks } = &body.kind else {
        panic!("expected native/raw, got {:?}", body.kind);
    };
    assert_eq!(chunks.len(), 3);
    assert!(matches!(&chunks[0], NativeChunk::Code(code) if code == "return "));
    assert!(matches!(&chunks[1], NativeChunk::Expr(e) if matches!(e.kind, ExprKind::Call { .. })));
    assert!(matches!(&chunks[2], NativeChunk::Code(code) if code == " + 1;"));
}

#[test]
fn test_native_raw_plain_code() {
    let analysis = analyze_ok("(native/raw \"return 0;\")");
    assert!(matches!(
        &analysis.expr.kind,
        ExprKind::NativeRaw { chunks } if chunks.len() == 1
    ));
}

#[test]
fn test_invalid_native_raws() {
    assert_error("(native/raw)", ErrorKind::AnalyzeInvalidNativeRaw);
    assert_error("(native/raw 1)", ErrorKind::AnalyzeInvalidNativeRaw);
    assert_error("(native/raw \"a\" \"b\")", ErrorKind::AnalyzeInvalidNativeRaw);
    assert_error("(native/raw \"~{ 1 2 }\")", ErrorKind::AnalyzeInvalidNativeRaw);
    assert_error("(native/raw \"~{ 1\")", ErrorKind::AnalyzeInvalidNativeRaw);
}

#[test]
fn test_native_raw_without_fragment_reader() {
    let mut rt = thicket::Namespaces::new("user");
    let err = analyze_in(&mut rt, "(native/raw \"~{ 1 }\")").unwrap_err();
    assert_eq!(err.kind, ErrorKind::RuntimeFailure);
}
