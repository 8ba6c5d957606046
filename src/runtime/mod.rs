//! Runtime context
//!
//! The analyzer never owns global state. Namespaces, vars, keywords and macro
//! expansion live behind the [`Runtime`] trait, which is threaded through
//! analysis as `&mut dyn Runtime`.

mod namespaces;

pub use namespaces::{FragmentReader, MacroExpander, Namespaces, CORE_NS};

use crate::error::Error;
use crate::symbol::{Keyword, Symbol};
use crate::syntax::{Span, Syntax};

/// A resolved var
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    /// Fully qualified name
    pub name: Symbol,
    pub is_macro: bool,
}

pub trait Runtime {
    fn current_ns(&self) -> &str;

    /// Qualify `sym` against the current namespace, its refers and aliases.
    /// Always returns a qualified symbol.
    fn qualify_symbol(&self, sym: &Symbol) -> Symbol;

    fn find_var(&self, sym: &Symbol) -> Option<Var>;

    /// Create the var if it does not exist yet. Used by `def`.
    fn intern_var(&mut self, sym: &Symbol) -> Var;

    fn intern_keyword(&mut self, ns: Option<&str>, name: &str) -> Keyword;

    /// Expand a macro call once. Non-macro forms come back unchanged.
    fn macroexpand1(&mut self, form: &Syntax) -> Result<Syntax, Error>;

    /// Read source text embedded in a `native/raw` interpolation.
    fn read_fragment(&mut self, _text: &str, span: &Span) -> Result<Vec<Syntax>, Error> {
        Err(Error::runtime_failure(
            "this runtime cannot read source fragments",
            span.clone(),
        ))
    }
}
