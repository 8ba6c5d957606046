//! High-level Intermediate Representation (HIR)
//!
//! HIR is the fully-analyzed form produced from read Syntax. Every symbol is
//! resolved to a local, a capture, an enclosing named fn or a lifted var;
//! every use of a local is recorded as boxed or unboxed; every node knows its
//! position. This is the input to codegen.
//!
//! Pipeline:
//! ```text
//! Source → Reader → Syntax → Analyze (macroexpand) → HIR → Codegen
//! ```

mod analyze;
mod binding;
mod expr;
mod frame;
mod lift;
mod ordered;

pub use analyze::{AnalyzeForms, Analysis, Analyzer};
pub use binding::{BindingId, LocalBinding};
pub use expr::{CatchClause, Expr, ExprKind, FnArity, NativeChunk, Position, RecurTarget};
pub use frame::{
    FindResult, FrameId, FrameKind, FrameTree, FunctionContext, LocalFrame, LocalResolution,
    NamedRecursionResult,
};
pub use lift::{munge, LiftedConstant, LiftedVar, UniqueNames};
pub use ordered::OrderedMap;
