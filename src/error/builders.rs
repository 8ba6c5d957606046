//! Builder methods for constructing Error instances

use super::types::{Error, ErrorKind, Note, Severity};
use crate::symbol::Symbol;
use crate::syntax::{Span, Syntax};

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Error {
            kind,
            message: message.into(),
            span,
            notes: Vec::new(),
            cause: None,
            expansions: Vec::new(),
        }
    }

    pub fn with_note(mut self, message: impl Into<String>, span: Span, severity: Severity) -> Self {
        self.notes.push(Note {
            message: message.into(),
            span,
            severity,
        });
        self
    }

    pub fn with_cause(mut self, cause: Error) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn with_expansions(mut self, expansions: Vec<Syntax>) -> Self {
        self.expansions = expansions;
        self
    }

    /// Walk this error and its causes, outermost first
    pub fn chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |e| e.cause.as_deref())
    }

    // Special forms
    pub fn invalid_def(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidDef, message, span)
    }

    pub fn invalid_fn(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidFn, message, span)
    }

    pub fn invalid_fn_parameters(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidFnParameters, message, span)
    }

    pub fn invalid_let(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidLet, message, span)
    }

    pub fn invalid_letfn(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidLetfn, message, span)
    }

    pub fn invalid_loop(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidLoop, message, span)
    }

    pub fn invalid_if(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidIf, message, span)
    }

    pub fn invalid_quote(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidQuote, message, span)
    }

    pub fn invalid_var_reference(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidVarReference, message, span)
    }

    pub fn invalid_throw(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidThrow, message, span)
    }

    pub fn invalid_try(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidTry, message, span)
    }

    pub fn invalid_case(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidCase, message, span)
    }

    pub fn invalid_native_raw(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidNativeRaw, message, span)
    }

    // Recur
    pub fn invalid_recur_position(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::AnalyzeInvalidRecurPosition, message, span)
    }

    pub fn invalid_recur_from_try(span: Span) -> Self {
        Error::new(
            ErrorKind::AnalyzeInvalidRecurFromTry,
            "cannot recur across a try boundary",
            span,
        )
    }

    pub fn invalid_recur_args(expected: usize, got: usize, span: Span) -> Self {
        Error::new(
            ErrorKind::AnalyzeInvalidRecurArgs,
            format!(
                "recur expects {} argument{}, got {}",
                expected,
                if expected == 1 { "" } else { "s" },
                got
            ),
            span,
        )
    }

    // Resolution
    pub fn unresolved_symbol(sym: &Symbol, span: Span) -> Self {
        Error::new(
            ErrorKind::AnalyzeUnresolvedSymbol,
            format!("unable to resolve symbol '{}'", sym),
            span,
        )
    }

    pub fn unresolved_var(sym: &Symbol, span: Span) -> Self {
        Error::new(
            ErrorKind::AnalyzeUnresolvedVar,
            format!("unable to resolve var '{}'", sym),
            span,
        )
    }

    pub fn macro_expansion_exception(form: &Syntax, cause: Error) -> Self {
        Error::new(
            ErrorKind::AnalyzeMacroExpansionException,
            format!("exception while expanding macro call {}", form),
            form.span.clone(),
        )
        .with_cause(cause)
    }

    pub fn runtime_failure(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::RuntimeFailure, message, span)
    }

    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        Error::new(ErrorKind::InternalAnalyzeFailure, message, span)
    }
}
