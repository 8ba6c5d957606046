//! Lifted vars and constants
//!
//! Var lookups and constant construction are hoisted out of function bodies
//! so codegen can build them once per function object. Each entry carries a
//! generated identifier that is unique across everything one analyzer emits.

use crate::symbol::Symbol;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// A var referenced from a function body, keyed by its qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiftedVar {
    pub name: Symbol,
    pub native_name: Rc<str>,
}

/// A constant value built once, keyed by structural equality
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiftedConstant {
    pub value: Value,
    pub native_name: Rc<str>,
}

impl fmt::Display for LiftedVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#'{} ({})", self.name, self.native_name)
    }
}

/// Generator for identifiers that stay unique for the analyzer's lifetime
#[derive(Debug, Default)]
pub struct UniqueNames {
    counter: u64,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// `munge(prefix)` followed by a fresh number
    pub fn next(&mut self, prefix: &str) -> Rc<str> {
        self.counter += 1;
        Rc::from(format!("{}_{}", munge(prefix), self.counter))
    }

    pub fn constant(&mut self) -> Rc<str> {
        self.next("const")
    }
}

/// Turn a Lisp name into a valid C-family identifier.
///
/// `clojure.core/+` becomes `clojure_DOT_core_SLASH__PLUS_`.
pub fn munge(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => out.push(ch),
            '-' => out.push('_'),
            '.' => out.push_str("_DOT_"),
            '/' => out.push_str("_SLASH_"),
            '+' => out.push_str("_PLUS_"),
            '*' => out.push_str("_STAR_"),
            '?' => out.push_str("_QMARK_"),
            '!' => out.push_str("_BANG_"),
            '<' => out.push_str("_LT_"),
            '>' => out.push_str("_GT_"),
            '=' => out.push_str("_EQ_"),
            '&' => out.push_str("_AMP_"),
            '%' => out.push_str("_PCT_"),
            '\'' => out.push_str("_SINGLEQUOTE_"),
            ':' => out.push_str("_COLON_"),
            '$' => out.push_str("_DOLLAR_"),
            _ => out.push_str(&format!("_U{:X}_", ch as u32)),
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
