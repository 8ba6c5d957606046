//! Constant values
//!
//! `Value` is the analyzer's view of literal data: what a quoted form or a
//! literal evaluates to. It is only ever compared, hashed and printed here;
//! building the runtime representation is codegen's job.
//!
//! Equality is structural. Floats compare by bit pattern so that `Value` can
//! be a hash key in lift tables, and maps/sets compare independently of
//! entry order.

use crate::symbol::{Keyword, Symbol};
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(Rc<str>),
    Keyword(Keyword),
    Symbol(Symbol),
    List(Vec<Value>),
    Vector(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_seqable(&self) -> bool {
        matches!(
            self,
            Value::Nil
                | Value::String(_)
                | Value::List(_)
                | Value::Vector(_)
                | Value::Map(_)
                | Value::Set(_)
        )
    }

    /// Values with a native (unboxed) representation
    pub fn has_unboxed_repr(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Float(_) | Value::Char(_) | Value::Bool(_)
        )
    }

    /// Nil and booleans are singletons that codegen emits directly.
    pub fn needs_lifting(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Char(_) => "character",
            Value::String(_) => "string",
            Value::Keyword(_) => "keyword",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
        }
    }
}

fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Set semantics: same distinct entries, in any order and any multiplicity
fn unordered_eq<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    left.iter().all(|l| right.contains(l)) && right.iter().all(|r| left.contains(r))
}

/// Commutative hash over the distinct entries of `items`
fn unordered_hash<T: Hash + PartialEq>(items: &[T]) -> (usize, u64) {
    items
        .iter()
        .enumerate()
        .filter(|(i, item)| !items[..*i].contains(*item))
        .fold((0, 0u64), |(count, combined), (_, item)| {
            (count + 1, combined.wrapping_add(hash_one(item)))
        })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => unordered_eq(a, b),
            (Value::Set(a), Value::Set(b)) => unordered_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Char(c) => c.hash(state),
            Value::String(s) => s.hash(state),
            Value::Keyword(k) => k.hash(state),
            Value::Symbol(s) => s.hash(state),
            Value::List(items) | Value::Vector(items) => items.hash(state),
            // Order-independent: combine per-entry hashes commutatively
            Value::Map(entries) => unordered_hash(entries).hash(state),
            Value::Set(items) => unordered_hash(items).hash(state),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Char(c) => write!(f, "\\{}", c),
            Value::String(s) => write!(f, "\"{}\"", s.escape_default()),
            Value::Keyword(k) => write!(f, "{}", k),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(items) => write_seq(f, "(", items, ")"),
            Value::Vector(items) => write_seq(f, "[", items, "]"),
            Value::Set(items) => write_seq(f, "#{", items, "}"),
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}
