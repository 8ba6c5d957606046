//! HIR expression types

use super::binding::BindingId;
use super::frame::{FrameId, FrameTree};
use super::lift::{LiftedConstant, LiftedVar};
use crate::symbol::Symbol;
use crate::syntax::Span;
use crate::value::Value;
use smallvec::SmallVec;
use std::rc::Rc;

/// Where an expression's value goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Evaluated for effect; the value is discarded
    Statement,
    /// Consumed by an enclosing expression
    Value,
    /// Returned from the enclosing fn or loop
    Tail,
}

/// HIR expression with its position and source location
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position, span: Span) -> Self {
        Expr {
            kind,
            position,
            span,
        }
    }

    /// Whether a local initialized with this expression can live unboxed:
    /// numeric, char and boolean literals, unboxed fast-path calls, and
    /// references to locals that do not need a box.
    pub fn is_unboxable(&self, frames: &FrameTree) -> bool {
        match &self.kind {
            ExprKind::PrimitiveLiteral { value, .. } => value.has_unboxed_repr(),
            ExprKind::Call {
                unboxed_fast_path, ..
            } => *unboxed_fast_path,
            ExprKind::LocalReference { binding, .. } => !frames.binding(*binding).needs_box,
            _ => false,
        }
    }

    /// Direct subexpressions, in evaluation order
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Def { value, .. } => value.iter().map(|v| &**v).collect(),
            ExprKind::VarDeref { .. }
            | ExprKind::VarRef { .. }
            | ExprKind::PrimitiveLiteral { .. }
            | ExprKind::LocalReference { .. }
            | ExprKind::RecursionReference { .. } => Vec::new(),
            ExprKind::Call { source, args, .. } => {
                std::iter::once(&**source).chain(args.iter()).collect()
            }
            ExprKind::Vector(items) | ExprKind::Set(items) | ExprKind::Do(items) => {
                items.iter().collect()
            }
            ExprKind::Map(entries) => entries.iter().flat_map(|(k, v)| [k, v]).collect(),
            ExprKind::Function { arities, .. } => arities.iter().map(|a| &*a.body).collect(),
            ExprKind::Recur { args, .. } | ExprKind::NamedRecursion { args, .. } => {
                args.iter().collect()
            }
            ExprKind::Let { pairs, body, .. } => pairs
                .iter()
                .map(|(_, init)| &**init)
                .chain(std::iter::once(&**body))
                .collect(),
            ExprKind::Letfn { pairs, body, .. } => pairs
                .iter()
                .map(|(_, init)| init)
                .chain(std::iter::once(&**body))
                .collect(),
            ExprKind::If { cond, then, else_ } => {
                let mut out = vec![&**cond, &**then];
                out.extend(else_.as_deref());
                out
            }
            ExprKind::Throw(value) => vec![&**value],
            ExprKind::Try {
                body,
                catch,
                finally,
                ..
            } => {
                let mut out = vec![&**body];
                out.extend(catch.iter().map(|c| &*c.body));
                out.extend(finally.as_deref());
                out
            }
            ExprKind::Case {
                value,
                default,
                exprs,
                ..
            } => std::iter::once(&**value)
                .chain(exprs.iter())
                .chain(std::iter::once(&**default))
                .collect(),
            ExprKind::NativeRaw { chunks } => chunks
                .iter()
                .filter_map(|chunk| match chunk {
                    NativeChunk::Expr(e) => Some(e),
                    NativeChunk::Code(_) => None,
                })
                .collect(),
        }
    }

    /// Locals whose value this expression can evaluate to as is: a local
    /// reference, or one reached through the result of `do`, `if`, `let*`,
    /// `letfn*`, `try` or `case*`.
    pub fn result_locals(&self) -> SmallVec<[BindingId; 2]> {
        let mut locals = SmallVec::new();
        self.collect_result_locals(&mut locals);
        locals
    }

    fn collect_result_locals(&self, locals: &mut SmallVec<[BindingId; 2]>) {
        match &self.kind {
            ExprKind::LocalReference { binding, .. } => locals.push(*binding),
            ExprKind::Do(exprs) => {
                if let Some(last) = exprs.last() {
                    last.collect_result_locals(locals);
                }
            }
            ExprKind::If { then, else_, .. } => {
                then.collect_result_locals(locals);
                if let Some(else_) = else_ {
                    else_.collect_result_locals(locals);
                }
            }
            ExprKind::Let { body, .. } | ExprKind::Letfn { body, .. } => {
                body.collect_result_locals(locals)
            }
            ExprKind::Try { body, catch, .. } => {
                body.collect_result_locals(locals);
                if let Some(catch) = catch {
                    catch.body.collect_result_locals(locals);
                }
            }
            ExprKind::Case { default, exprs, .. } => {
                for expr in exprs {
                    expr.collect_result_locals(locals);
                }
                default.collect_result_locals(locals);
            }
            _ => {}
        }
    }

    /// Visit this expression and every descendant, parents first
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}

/// One arity of a `fn*`
#[derive(Debug, Clone)]
pub struct FnArity {
    /// Fixed parameters followed by the rest parameter, if any
    pub params: Vec<BindingId>,
    pub is_variadic: bool,
    /// The arity's fn frame, which holds its context, captures and lifts
    pub frame: FrameId,
    pub body: Box<Expr>,
}

impl FnArity {
    pub fn fixed_count(&self) -> usize {
        if self.is_variadic {
            self.params.len() - 1
        } else {
            self.params.len()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurTarget {
    Fn(FrameId),
    Loop(FrameId),
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub exception_type: Symbol,
    pub binding: BindingId,
    pub frame: FrameId,
    pub body: Box<Expr>,
}

/// A piece of a `native/raw` form
#[derive(Debug, Clone)]
pub enum NativeChunk {
    Code(String),
    Expr(Expr),
}

/// HIR expression kinds - fully analyzed forms
///
/// There is no list node: a non-empty list in evaluated position is a call
/// or special form, and list data only appears as a constant.
#[derive(Debug, Clone)]
pub enum ExprKind {
    // === Vars ===
    Def {
        var: LiftedVar,
        value: Option<Box<Expr>>,
    },
    /// The value of a var
    VarDeref { var: LiftedVar },
    /// The var object itself, from `(var x)`
    VarRef { var: LiftedVar },

    // === Data ===
    PrimitiveLiteral {
        value: Value,
        /// `None` for nil and booleans
        constant: Option<LiftedConstant>,
    },
    Vector(Vec<Expr>),
    Map(Vec<(Expr, Expr)>),
    Set(Vec<Expr>),

    // === Locals ===
    LocalReference {
        name: Symbol,
        /// For captured names, the innermost capture copy
        binding: BindingId,
        /// Whether this use required the boxed representation
        needs_box: bool,
    },

    // === Functions ===
    Function {
        name: Option<Symbol>,
        unique_name: Rc<str>,
        arities: Vec<FnArity>,
    },
    Call {
        source: Box<Expr>,
        args: Vec<Expr>,
        /// Head is a var with an unboxed fast path; args were analyzed unboxed
        unboxed_fast_path: bool,
    },
    Recur {
        args: Vec<Expr>,
        target: RecurTarget,
    },
    /// A bare reference to an enclosing named fn from its own body
    RecursionReference { name: Symbol, fn_frame: FrameId },
    /// A call to an enclosing named fn from its own body
    NamedRecursion {
        fn_frame: FrameId,
        args: Vec<Expr>,
        /// Fn frames between the call site and the target, innermost first
        crossed: SmallVec<[FrameId; 4]>,
    },

    // === Binding forms ===
    /// `let*`, or `loop*` when `is_loop` is set. Initializers are shared
    /// with the bindings' `value`.
    Let {
        pairs: Vec<(BindingId, Rc<Expr>)>,
        body: Box<Expr>,
        frame: FrameId,
        is_loop: bool,
    },
    Letfn {
        pairs: Vec<(BindingId, Expr)>,
        body: Box<Expr>,
        frame: FrameId,
    },

    // === Control flow ===
    Do(Vec<Expr>),
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        else_: Option<Box<Expr>>,
    },
    Throw(Box<Expr>),
    Try {
        body: Box<Expr>,
        frame: FrameId,
        catch: Option<CatchClause>,
        finally: Option<Box<Expr>>,
    },
    /// Integer-keyed dispatch produced by the `case` macro
    Case {
        value: Box<Expr>,
        shift: i64,
        mask: i64,
        default: Box<Expr>,
        keys: Vec<i64>,
        exprs: Vec<Expr>,
    },

    // === Interop ===
    NativeRaw { chunks: Vec<NativeChunk> },
}

impl ExprKind {
    /// Short name for diagnostics and logs
    pub fn label(&self) -> &'static str {
        match self {
            ExprKind::Def { .. } => "def",
            ExprKind::VarDeref { .. } => "var-deref",
            ExprKind::VarRef { .. } => "var-ref",
            ExprKind::PrimitiveLiteral { .. } => "primitive-literal",
            ExprKind::Vector(_) => "vector",
            ExprKind::Map(_) => "map",
            ExprKind::Set(_) => "set",
            ExprKind::LocalReference { .. } => "local-reference",
            ExprKind::Function { .. } => "function",
            ExprKind::Call { .. } => "call",
            ExprKind::Recur { .. } => "recur",
            ExprKind::RecursionReference { .. } => "recursion-reference",
            ExprKind::NamedRecursion { .. } => "named-recursion",
            ExprKind::Let { is_loop: false, .. } => "let",
            ExprKind::Let { is_loop: true, .. } => "loop",
            ExprKind::Letfn { .. } => "letfn",
            ExprKind::Do(_) => "do",
            ExprKind::If { .. } => "if",
            ExprKind::Throw(_) => "throw",
            ExprKind::Try { .. } => "try",
            ExprKind::Case { .. } => "case",
            ExprKind::NativeRaw { .. } => "native-raw",
        }
    }
}
