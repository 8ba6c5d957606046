use crate::common::{read, reader::read_all, runtime};
use thicket::runtime::Runtime;
use thicket::{Analyzer, AnalyzerConfig, ErrorKind, ExprKind, FrameId, Symbol};

fn forms(source: &str) -> Vec<thicket::Syntax> {
    match read_all(source) {
        Ok(forms) => forms,
        Err(msg) => panic!("failed to read {:?}: {}", source, msg),
    }
}

#[test]
fn test_one_result_per_form() {
    let mut rt = runtime();
    let mut analyzer = Analyzer::new(&mut rt);
    let results: Vec<_> = analyzer.analyze_forms(forms("1 (if) 2 missing 3")).collect();
    assert_eq!(results.len(), 5);
    let ok: Vec<bool> = results.iter().map(Result::is_ok).collect();
    assert_eq!(ok, vec![true, false, true, false, true]);
}

#[test]
fn test_defs_are_visible_to_later_forms() {
    let mut rt = runtime();
    let mut analyzer = Analyzer::new(&mut rt);
    let results: Vec<_> = analyzer
        .analyze_forms(forms("(def pi 3) (defn area [r] (* pi r r)) (area 2)"))
        .collect();
    assert!(results.iter().all(Result::is_ok));

    let last = results[2].as_ref().unwrap();
    match &last.expr.kind {
        ExprKind::Call { source, .. } => assert!(matches!(
            &source.kind,
            ExprKind::VarDeref { var } if var.name == Symbol::qualified("user", "area")
        )),
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn test_failed_form_does_not_leak_locals() {
    let mut rt = runtime();
    let mut analyzer = Analyzer::new(&mut rt);
    let results: Vec<_> = analyzer
        .analyze_forms(forms("(let* [x 1] (if)) x"))
        .collect();
    assert_eq!(results[0].as_ref().unwrap_err().kind, ErrorKind::AnalyzeInvalidIf);
    assert_eq!(results[1].as_ref().unwrap_err().kind, ErrorKind::AnalyzeUnresolvedSymbol);
}

#[test]
fn test_each_form_has_its_own_frame_tree() {
    let mut rt = runtime();
    let mut analyzer = Analyzer::new(&mut rt);
    let first = analyzer.analyze(&read("(fn* [a] (fn* [] a))")).unwrap();
    let second = analyzer.analyze(&read("42")).unwrap();
    assert_eq!(first.frames.frame_count(), 3);
    assert_eq!(second.frames.frame_count(), 1);
    assert_eq!(second.frames.bindings().count(), 0);
    assert!(second.frames.root().lifted_vars.is_empty());
    assert_eq!(second.frames.closest_fn_frame(FrameId::ROOT), FrameId::ROOT);
}

#[test]
fn test_failed_def_keeps_interned_var() {
    let mut rt = runtime();
    {
        let mut analyzer = Analyzer::new(&mut rt);
        assert!(analyzer.analyze(&read("(def half (if))")).is_err());
    }
    assert!(rt.find_var(&Symbol::qualified("user", "half")).is_some());
}

#[test]
fn test_namespace_switch_between_forms() {
    let mut rt = runtime();
    {
        let mut analyzer = Analyzer::new(&mut rt);
        analyzer.analyze(&read("(def helper 1)")).unwrap();
    }
    rt.set_current_ns("other");
    rt.add_alias("u", "user");
    let mut analyzer = Analyzer::new(&mut rt);
    assert!(analyzer.analyze(&read("u/helper")).is_ok());
    assert_eq!(
        analyzer.analyze(&read("helper")).unwrap_err().kind,
        ErrorKind::AnalyzeUnresolvedSymbol
    );
    let analysis = analyzer.analyze(&read("(def helper 2)")).unwrap();
    assert!(matches!(
        &analysis.expr.kind,
        ExprKind::Def { var, .. } if var.name == Symbol::qualified("other", "helper")
    ));
}

#[test]
fn test_analyzer_exposes_its_config() {
    let mut rt = runtime();
    let analyzer = Analyzer::with_config(&mut rt, AnalyzerConfig::default().with_max_fn_params(4));
    assert_eq!(analyzer.config().max_fn_params, 4);
    assert!(analyzer
        .config()
        .is_unboxed_op(&Symbol::qualified("clojure.core", "+")));
}
