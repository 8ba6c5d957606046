//! Source location tracking

use std::fmt;
use std::rc::Rc;

/// A span in source code: byte offsets plus the 1-based line/column of the
/// first character, which is what diagnostics point at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub col: u32,
    pub file: Option<Rc<str>>,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, col: u32) -> Self {
        Span {
            start,
            end,
            line,
            col,
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<Rc<str>>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Span for compiler-generated forms (macro output without locations).
    pub fn synthetic() -> Self {
        Span::default()
    }

    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge two spans into one covering both
    pub fn merge(&self, other: &Span) -> Span {
        if self.is_synthetic() {
            return other.clone();
        }
        if other.is_synthetic() {
            return self.clone();
        }
        let (line, col) = if (self.line, self.col) <= (other.line, other.col) {
            (self.line, self.col)
        } else {
            (other.line, other.col)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            col,
            file: self.file.clone().or_else(|| other.file.clone()),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.col),
            None => write!(f, "{}:{}", self.line, self.col),
        }
    }
}
