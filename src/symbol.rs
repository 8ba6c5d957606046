//! Symbols and keywords
//!
//! Names are `Rc<str>` so that a symbol read once can be cloned into frame
//! tables, bindings and lift entries without reallocating.

use std::fmt;
use std::rc::Rc;

/// A possibly namespace-qualified symbol such as `x`, `clojure.core/+` or `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    ns: Option<Rc<str>>,
    name: Rc<str>,
}

impl Symbol {
    pub fn new(ns: Option<&str>, name: &str) -> Self {
        Symbol {
            ns: ns.map(Rc::from),
            name: Rc::from(name),
        }
    }

    /// An unqualified symbol
    pub fn simple(name: &str) -> Self {
        Symbol::new(None, name)
    }

    pub fn qualified(ns: &str, name: &str) -> Self {
        Symbol::new(Some(ns), name)
    }

    /// Split reader text into namespace and name on the first `/`.
    ///
    /// A lone `/` (the division function) and names starting or ending with
    /// `/` stay unqualified.
    pub fn parse(text: &str) -> Self {
        match text.find('/') {
            Some(idx) if idx > 0 && idx + 1 < text.len() => {
                Symbol::new(Some(&text[..idx]), &text[idx + 1..])
            }
            _ => Symbol::simple(text),
        }
    }

    pub fn ns(&self) -> Option<&str> {
        self.ns.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_qualified(&self) -> bool {
        self.ns.is_some()
    }

    /// The same name in another namespace
    pub fn with_ns(&self, ns: &str) -> Self {
        Symbol {
            ns: Some(Rc::from(ns)),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ns {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An interned keyword. Runtimes hand these out through
/// [`crate::runtime::Runtime::intern_keyword`]; the analyzer never builds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(Symbol);

impl Keyword {
    pub fn from_symbol(sym: Symbol) -> Self {
        Keyword(sym)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.0
    }

    pub fn ns(&self) -> Option<&str> {
        self.0.ns()
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}
