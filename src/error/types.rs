//! Error type definitions

use crate::syntax::{Span, Syntax};
use std::fmt;

/// Which compilation stage an error kind belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorFamily {
    Lex,
    Parse,
    Analyze,
    Codegen,
    Runtime,
    Internal,
}

/// Closed enumeration of error kinds.
///
/// Each kind has a stable string identifier (see [`ErrorKind::id`]) of the
/// form `family/kind`, suitable for machine consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Reader collaborators
    LexUnexpectedCharacter,
    ParseUnexpectedEof,
    ParseUnbalancedCollection,
    ParseOddMapEntries,

    // Malformed special forms
    AnalyzeInvalidDef,
    AnalyzeInvalidFn,
    AnalyzeInvalidFnParameters,
    AnalyzeInvalidRecurPosition,
    AnalyzeInvalidRecurFromTry,
    AnalyzeInvalidRecurArgs,
    AnalyzeInvalidLet,
    AnalyzeInvalidLetfn,
    AnalyzeInvalidLoop,
    AnalyzeInvalidIf,
    AnalyzeInvalidQuote,
    AnalyzeInvalidVarReference,
    AnalyzeInvalidThrow,
    AnalyzeInvalidTry,
    AnalyzeInvalidCase,
    AnalyzeInvalidNativeRaw,

    // Resolution
    AnalyzeUnresolvedVar,
    AnalyzeUnresolvedSymbol,
    AnalyzeMacroExpansionException,

    CodegenFailure,
    RuntimeFailure,

    /// The analyzer broke one of its own invariants
    InternalAnalyzeFailure,
}

impl ErrorKind {
    pub fn id(self) -> &'static str {
        match self {
            ErrorKind::LexUnexpectedCharacter => "lex/unexpected-character",
            ErrorKind::ParseUnexpectedEof => "parse/unexpected-eof",
            ErrorKind::ParseUnbalancedCollection => "parse/unbalanced-collection",
            ErrorKind::ParseOddMapEntries => "parse/odd-map-entries",
            ErrorKind::AnalyzeInvalidDef => "analyze/invalid-def",
            ErrorKind::AnalyzeInvalidFn => "analyze/invalid-fn",
            ErrorKind::AnalyzeInvalidFnParameters => "analyze/invalid-fn-parameters",
            ErrorKind::AnalyzeInvalidRecurPosition => "analyze/invalid-recur-position",
            ErrorKind::AnalyzeInvalidRecurFromTry => "analyze/invalid-recur-from-try",
            ErrorKind::AnalyzeInvalidRecurArgs => "analyze/invalid-recur-args",
            ErrorKind::AnalyzeInvalidLet => "analyze/invalid-let",
            ErrorKind::AnalyzeInvalidLetfn => "analyze/invalid-letfn",
            ErrorKind::AnalyzeInvalidLoop => "analyze/invalid-loop",
            ErrorKind::AnalyzeInvalidIf => "analyze/invalid-if",
            ErrorKind::AnalyzeInvalidQuote => "analyze/invalid-quote",
            ErrorKind::AnalyzeInvalidVarReference => "analyze/invalid-var-reference",
            ErrorKind::AnalyzeInvalidThrow => "analyze/invalid-throw",
            ErrorKind::AnalyzeInvalidTry => "analyze/invalid-try",
            ErrorKind::AnalyzeInvalidCase => "analyze/invalid-case",
            ErrorKind::AnalyzeInvalidNativeRaw => "analyze/invalid-native-raw",
            ErrorKind::AnalyzeUnresolvedVar => "analyze/unresolved-var",
            ErrorKind::AnalyzeUnresolvedSymbol => "analyze/unresolved-symbol",
            ErrorKind::AnalyzeMacroExpansionException => "analyze/macro-expansion-exception",
            ErrorKind::CodegenFailure => "codegen/failure",
            ErrorKind::RuntimeFailure => "runtime/failure",
            ErrorKind::InternalAnalyzeFailure => "internal/analyze-failure",
        }
    }

    pub fn family(self) -> ErrorFamily {
        match self {
            ErrorKind::LexUnexpectedCharacter => ErrorFamily::Lex,
            ErrorKind::ParseUnexpectedEof
            | ErrorKind::ParseUnbalancedCollection
            | ErrorKind::ParseOddMapEntries => ErrorFamily::Parse,
            ErrorKind::CodegenFailure => ErrorFamily::Codegen,
            ErrorKind::RuntimeFailure => ErrorFamily::Runtime,
            ErrorKind::InternalAnalyzeFailure => ErrorFamily::Internal,
            _ => ErrorFamily::Analyze,
        }
    }

    /// Whether this kind indicates a compiler bug rather than bad input
    pub fn is_internal(self) -> bool {
        self.family() == ErrorFamily::Internal
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Secondary message attached to an error, pointing at its own location
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub message: String,
    pub span: Span,
    pub severity: Severity,
}

/// A diagnostic. Errors are values: analyzer functions return them through
/// `Result` and the driver reports them per top-level form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub notes: Vec<Note>,
    #[source]
    pub cause: Option<Box<Error>>,
    /// Macro calls being expanded when the error happened, outermost first
    pub expansions: Vec<Syntax>,
}

/// Result alias used throughout the analyzer
pub type AnalyzeResult<T> = Result<T, Error>;
