//! Display implementations for Syntax

use super::{Syntax, SyntaxKind};
use std::fmt;

fn write_items(f: &mut fmt::Formatter<'_>, open: &str, items: &[Syntax], close: &str) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxKind::Nil => write!(f, "nil"),
            SyntaxKind::Bool(b) => write!(f, "{}", b),
            SyntaxKind::Int(n) => write!(f, "{}", n),
            SyntaxKind::Float(n) => write!(f, "{:?}", n),
            SyntaxKind::Char(c) => write!(f, "\\{}", c),
            SyntaxKind::String(s) => write!(f, "\"{}\"", s.escape_default()),
            SyntaxKind::Keyword(s) => write!(f, ":{}", s),
            SyntaxKind::Symbol(s) => write!(f, "{}", s),
            SyntaxKind::List(items) => write_items(f, "(", items, ")"),
            SyntaxKind::Vector(items) => write_items(f, "[", items, "]"),
            SyntaxKind::Set(items) => write_items(f, "#{", items, "}"),
            SyntaxKind::Map(entries) => {
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
