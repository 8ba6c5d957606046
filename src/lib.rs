//! # Thicket - semantic analysis for a Clojure-family Lisp
//!
//! Thicket turns read forms into a high-level IR ready for native code
//! generation. It resolves every symbol, computes closure captures, decides
//! which locals must be boxed, validates special forms and `recur`, and
//! lifts vars and constants to the function that uses them.
//!
//! ## Quick Start
//!
//! ```
//! use thicket::{Analyzer, ExprKind, Namespaces, Span, Symbol, Syntax, SyntaxKind};
//!
//! let mut rt = Namespaces::new("user");
//! rt.define_core_fns(&["+"]);
//!
//! let sym = |s: &str| Syntax::new(SyntaxKind::Symbol(Symbol::parse(s)), Span::synthetic());
//! let int = |n: i64| Syntax::new(SyntaxKind::Int(n), Span::synthetic());
//! let form = Syntax::new(SyntaxKind::List(vec![sym("+"), int(1), int(2)]), Span::synthetic());
//!
//! let mut analyzer = Analyzer::new(&mut rt);
//! let analysis = analyzer.analyze(&form).unwrap();
//! assert!(matches!(
//!     analysis.expr.kind,
//!     ExprKind::Call { unboxed_fast_path: true, .. }
//! ));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source → Reader → Syntax → Analyze → HIR (Expr + FrameTree) → Codegen
//! ```
//!
//! 1. **Syntax** - read forms with spans, produced by an external reader
//! 2. **Runtime** - namespaces, vars, keywords and macro expansion
//! 3. **HIR** - analyzed expressions plus the frame tree they refer to
//!
//! Each top-level form is analyzed against its own [`FrameTree`]; the
//! analyzer keeps only the generated-name counter between forms.

pub mod config;
pub mod error;
pub mod hir;
pub mod runtime;
pub mod symbol;
pub mod syntax;
pub mod value;

pub use config::AnalyzerConfig;
pub use error::{AnalyzeResult, Error, ErrorFamily, ErrorKind, Note, Severity};
pub use hir::{
    Analysis, Analyzer, BindingId, Expr, ExprKind, FrameId, FrameKind, FrameTree, LocalBinding,
    Position, RecurTarget,
};
pub use runtime::{Namespaces, Runtime, Var};
pub use symbol::{Keyword, Symbol};
pub use syntax::{Span, Syntax, SyntaxKind};
pub use value::Value;
