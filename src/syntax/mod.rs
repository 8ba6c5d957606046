//! Read forms
//!
//! `Syntax` is what the reader hands the analyzer: data plus a source span
//! on every node. The reader has already desugared `'x` into `(quote x)`,
//! so there is no dedicated quote node here.
//!
//! ```text
//! Source → Reader → Syntax → Analyze → HIR → Codegen
//! ```

mod convert;
mod display;
mod span;

pub use span::Span;

use crate::symbol::Symbol;

/// Pre-analysis syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Syntax {
    pub kind: SyntaxKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxKind {
    // Atoms
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    /// Keyword text as read; interned by the runtime during analysis
    Keyword(Symbol),
    Symbol(Symbol),

    // Compounds
    List(Vec<Syntax>),
    Vector(Vec<Syntax>),
    Map(Vec<(Syntax, Syntax)>),
    Set(Vec<Syntax>),
}

impl Syntax {
    pub fn new(kind: SyntaxKind, span: Span) -> Self {
        Syntax { kind, span }
    }

    /// Check if this is an unqualified symbol with the given name
    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(&self.kind, SyntaxKind::Symbol(s) if !s.is_qualified() && s.name() == name)
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match &self.kind {
            SyntaxKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Syntax]> {
        match &self.kind {
            SyntaxKind::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[Syntax]> {
        match &self.kind {
            SyntaxKind::Vector(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            SyntaxKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match &self.kind {
            SyntaxKind::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The head symbol of a non-empty list form, e.g. `fn*` in `(fn* [] 1)`
    pub fn head_symbol(&self) -> Option<&Symbol> {
        self.as_list()?.first()?.as_symbol()
    }

    /// Human-readable name of the node's kind, for error messages
    pub fn kind_label(&self) -> &'static str {
        match &self.kind {
            SyntaxKind::Nil => "nil",
            SyntaxKind::Bool(_) => "boolean",
            SyntaxKind::Int(_) => "integer",
            SyntaxKind::Float(_) => "float",
            SyntaxKind::Char(_) => "character",
            SyntaxKind::String(_) => "string",
            SyntaxKind::Keyword(_) => "keyword",
            SyntaxKind::Symbol(_) => "symbol",
            SyntaxKind::List(_) => "list",
            SyntaxKind::Vector(_) => "vector",
            SyntaxKind::Map(_) => "map",
            SyntaxKind::Set(_) => "set",
        }
    }
}
