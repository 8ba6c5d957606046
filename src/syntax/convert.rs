//! Conversion from Syntax to constant Values
//!
//! Needed for `quote` and for literal collections whose elements are all
//! constants. Keywords go through the runtime so that every keyword in a
//! constant is the interned one.

use super::{Syntax, SyntaxKind};
use crate::runtime::Runtime;
use crate::value::Value;
use std::rc::Rc;

impl Syntax {
    pub fn to_value(&self, rt: &mut dyn Runtime) -> Value {
        match &self.kind {
            SyntaxKind::Nil => Value::Nil,
            SyntaxKind::Bool(b) => Value::Bool(*b),
            SyntaxKind::Int(n) => Value::Int(*n),
            SyntaxKind::Float(n) => Value::Float(*n),
            SyntaxKind::Char(c) => Value::Char(*c),
            SyntaxKind::String(s) => Value::String(Rc::from(s.as_str())),
            SyntaxKind::Keyword(k) => Value::Keyword(rt.intern_keyword(k.ns(), k.name())),
            SyntaxKind::Symbol(s) => Value::Symbol(s.clone()),
            SyntaxKind::List(items) => {
                Value::List(items.iter().map(|item| item.to_value(rt)).collect())
            }
            SyntaxKind::Vector(items) => {
                Value::Vector(items.iter().map(|item| item.to_value(rt)).collect())
            }
            SyntaxKind::Set(items) => {
                Value::Set(items.iter().map(|item| item.to_value(rt)).collect())
            }
            SyntaxKind::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_value(rt), v.to_value(rt)))
                    .collect(),
            ),
        }
    }
}
