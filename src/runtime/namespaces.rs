//! In-memory namespace table

use super::{Runtime, Var};
use crate::error::Error;
use crate::symbol::{Keyword, Symbol};
use crate::syntax::{Span, Syntax};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Namespace referred into every other namespace
pub const CORE_NS: &str = "clojure.core";

/// Expands one macro call. Receives the whole call form.
pub type MacroExpander = Rc<dyn Fn(&Syntax) -> Result<Syntax, Error>>;

/// Reads `native/raw` interpolation text into forms.
pub type FragmentReader = Rc<dyn Fn(&str, &Span) -> Result<Vec<Syntax>, Error>>;

#[derive(Default)]
struct Namespace {
    /// Var name → macro expander, if the var is a macro
    vars: FxHashMap<Rc<str>, Option<MacroExpander>>,
    /// Alias → namespace name
    aliases: FxHashMap<Rc<str>, Rc<str>>,
}

/// Keyword interning table
///
/// Each distinct keyword is allocated once and shared from then on.
#[derive(Debug, Default)]
struct KeywordTable {
    map: FxHashMap<Symbol, Keyword>,
}

impl KeywordTable {
    fn intern(&mut self, ns: Option<&str>, name: &str) -> Keyword {
        let sym = Symbol::new(ns, name);
        if let Some(kw) = self.map.get(&sym) {
            return kw.clone();
        }
        let kw = Keyword::from_symbol(sym.clone());
        self.map.insert(sym, kw.clone());
        kw
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// A self-contained [`Runtime`]: namespaces of vars, macros defined as Rust
/// closures, aliases, keywords and an optional fragment reader.
pub struct Namespaces {
    current: Rc<str>,
    namespaces: FxHashMap<Rc<str>, Namespace>,
    keywords: KeywordTable,
    reader: Option<FragmentReader>,
}

impl Namespaces {
    /// Create a runtime whose current namespace is `current_ns`
    pub fn new(current_ns: &str) -> Self {
        let mut namespaces = FxHashMap::default();
        namespaces.insert(Rc::from(CORE_NS), Namespace::default());
        namespaces.insert(Rc::from(current_ns), Namespace::default());
        Namespaces {
            current: Rc::from(current_ns),
            namespaces,
            keywords: KeywordTable::default(),
            reader: None,
        }
    }

    /// Switch namespaces, creating the target if needed
    pub fn set_current_ns(&mut self, name: &str) {
        self.current = Rc::from(name);
        self.namespaces.entry(Rc::from(name)).or_default();
    }

    fn ns_mut(&mut self, name: &str) -> &mut Namespace {
        self.namespaces.entry(Rc::from(name)).or_default()
    }

    fn owning_ns(&self, sym: &Symbol) -> Rc<str> {
        match sym.ns() {
            Some(ns) => Rc::from(ns),
            None => self.current.clone(),
        }
    }

    /// Define a plain var. Unqualified names land in the current namespace.
    pub fn define_var(&mut self, sym: &Symbol) -> Var {
        let ns = self.owning_ns(sym);
        self.ns_mut(&ns)
            .vars
            .insert(Rc::from(sym.name()), None);
        Var {
            name: sym.with_ns(&ns),
            is_macro: false,
        }
    }

    /// Define vars in `clojure.core`
    pub fn define_core_fns(&mut self, names: &[&str]) {
        for name in names {
            self.define_var(&Symbol::qualified(CORE_NS, name));
        }
    }

    pub fn define_macro(&mut self, sym: &Symbol, expander: MacroExpander) -> Var {
        let ns = self.owning_ns(sym);
        self.ns_mut(&ns)
            .vars
            .insert(Rc::from(sym.name()), Some(expander));
        Var {
            name: sym.with_ns(&ns),
            is_macro: true,
        }
    }

    /// Make `alias/x` mean `target/x` within the current namespace
    pub fn add_alias(&mut self, alias: &str, target: &str) {
        let current = self.current.clone();
        self.ns_mut(&current)
            .aliases
            .insert(Rc::from(alias), Rc::from(target));
    }

    pub fn set_fragment_reader(&mut self, reader: FragmentReader) {
        self.reader = Some(reader);
    }

    pub fn interned_keyword_count(&self) -> usize {
        self.keywords.len()
    }

    fn has_var(&self, ns: &str, name: &str) -> bool {
        self.namespaces
            .get(ns)
            .is_some_and(|n| n.vars.contains_key(name))
    }

    fn lookup(&self, sym: &Symbol) -> Option<&Option<MacroExpander>> {
        let qualified = self.qualify_symbol(sym);
        let ns = qualified.ns()?;
        self.namespaces.get(ns)?.vars.get(qualified.name())
    }
}

impl Runtime for Namespaces {
    fn current_ns(&self) -> &str {
        &self.current
    }

    fn qualify_symbol(&self, sym: &Symbol) -> Symbol {
        match sym.ns() {
            Some(ns) => {
                let target = self
                    .namespaces
                    .get(&*self.current)
                    .and_then(|current| current.aliases.get(ns));
                match target {
                    Some(target) => sym.with_ns(target),
                    None => sym.clone(),
                }
            }
            None => {
                if !self.has_var(&self.current, sym.name()) && self.has_var(CORE_NS, sym.name()) {
                    sym.with_ns(CORE_NS)
                } else {
                    sym.with_ns(&self.current)
                }
            }
        }
    }

    fn find_var(&self, sym: &Symbol) -> Option<Var> {
        let entry = self.lookup(sym)?;
        Some(Var {
            name: self.qualify_symbol(sym),
            is_macro: entry.is_some(),
        })
    }

    fn intern_var(&mut self, sym: &Symbol) -> Var {
        if let Some(var) = self.find_var(sym) {
            // Only an existing var in the target namespace counts; a referred
            // core var is shadowed by a fresh definition.
            if var.name.ns() == Some(&*self.owning_ns(sym)) {
                return var;
            }
        }
        self.define_var(sym)
    }

    fn intern_keyword(&mut self, ns: Option<&str>, name: &str) -> Keyword {
        self.keywords.intern(ns, name)
    }

    fn macroexpand1(&mut self, form: &Syntax) -> Result<Syntax, Error> {
        let expander = match form.head_symbol().and_then(|head| self.lookup(head)) {
            Some(Some(expander)) => expander.clone(),
            _ => return Ok(form.clone()),
        };
        expander(form)
    }

    fn read_fragment(&mut self, text: &str, span: &Span) -> Result<Vec<Syntax>, Error> {
        match &self.reader {
            Some(reader) => reader(text, span),
            None => Err(Error::runtime_failure(
                "no fragment reader configured",
                span.clone(),
            )),
        }
    }
}
