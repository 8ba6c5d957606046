//! Syntax to HIR analysis
//!
//! This module converts read Syntax into HIR by:
//! 1. Expanding macro calls through the runtime
//! 2. Resolving symbols to locals, captures, named recursion or vars
//! 3. Computing captures for closures and lifting vars and constants
//! 4. Tracking boxed and unboxed uses of every local
//! 5. Validating special-form shapes and `recur` placement
//!
//! ## Contexts
//!
//! Each analysis function receives a [`Cx`]: the frame it runs in, the
//! position of the form, and whether the consumer needs the value boxed.
//! Operands of unboxed fast-path calls, `let*`/`loop*` initializers and
//! `recur` arguments that target a loop are the unboxed contexts.

mod binding;
mod call;
mod forms;
mod lambda;
mod special;

use super::expr::{Expr, ExprKind, Position};
use super::frame::{FrameId, FrameTree};
use super::lift::UniqueNames;
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzeResult, Error};
use crate::runtime::Runtime;
use crate::syntax::{Span, Syntax};
use tracing::debug;

/// Result of analyzing one top-level form
#[derive(Debug)]
pub struct Analysis {
    pub expr: Expr,
    /// Frames and bindings referenced by `expr`
    pub frames: FrameTree,
}

/// Analysis context threaded through every form
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cx {
    pub frame: FrameId,
    pub position: Position,
    pub needs_box: bool,
}

impl Cx {
    fn top_level() -> Self {
        Cx {
            frame: FrameId::ROOT,
            position: Position::Value,
            needs_box: true,
        }
    }

    /// A boxed operand in the same frame
    pub fn value(self) -> Self {
        Cx {
            position: Position::Value,
            needs_box: true,
            ..self
        }
    }

    pub fn at(self, position: Position) -> Self {
        Cx { position, ..self }
    }

    pub fn in_frame(self, frame: FrameId) -> Self {
        Cx { frame, ..self }
    }

    pub fn boxed(self, needs_box: bool) -> Self {
        Cx { needs_box, ..self }
    }
}

/// Analyzer that converts Syntax to HIR
///
/// One analyzer serves many top-level forms. Each form is analyzed against
/// a fresh [`FrameTree`]; generated names stay unique across forms.
pub struct Analyzer<'rt> {
    rt: &'rt mut dyn Runtime,
    config: AnalyzerConfig,
    frames: FrameTree,
    names: UniqueNames,
    /// Macro calls currently being expanded, outermost first
    expansions: Vec<Syntax>,
}

impl<'rt> Analyzer<'rt> {
    pub fn new(rt: &'rt mut dyn Runtime) -> Self {
        Self::with_config(rt, AnalyzerConfig::default())
    }

    pub fn with_config(rt: &'rt mut dyn Runtime, config: AnalyzerConfig) -> Self {
        Analyzer {
            rt,
            config,
            frames: FrameTree::new(),
            names: UniqueNames::new(),
            expansions: Vec::new(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one top-level form
    pub fn analyze(&mut self, form: &Syntax) -> AnalyzeResult<Analysis> {
        debug!(form = %form, span = %form.span, "analyzing top-level form");
        self.frames = FrameTree::new();
        self.expansions.clear();

        let result = self.analyze_expr(form, Cx::top_level());
        let frames = std::mem::take(&mut self.frames);
        match result {
            Ok(expr) => Ok(Analysis { expr, frames }),
            Err(err) => {
                debug!(error = %err, "analysis failed");
                Err(err)
            }
        }
    }

    /// Analyze a sequence of top-level forms, one result per form. A failed
    /// form does not stop the forms after it.
    pub fn analyze_forms<I>(&mut self, forms: I) -> AnalyzeForms<'_, 'rt, I::IntoIter>
    where
        I: IntoIterator<Item = Syntax>,
    {
        AnalyzeForms {
            analyzer: self,
            forms: forms.into_iter(),
        }
    }

    // === Helpers shared by the form analyzers ===

    pub(crate) fn expr(&self, kind: ExprKind, cx: Cx, span: &Span) -> Expr {
        Expr::new(kind, cx.position, span.clone())
    }

    /// Analyze a body: every form but the last as a statement, the last in
    /// `cx`'s position. An empty body is nil.
    pub(crate) fn analyze_body(&mut self, forms: &[Syntax], cx: Cx, span: &Span) -> AnalyzeResult<Expr> {
        match forms {
            [] => Ok(self.nil(cx, span)),
            [only] => self.analyze_expr(only, cx),
            _ => {
                let exprs = self.analyze_sequence(forms, cx)?;
                Ok(self.expr(ExprKind::Do(exprs), cx, span))
            }
        }
    }

    pub(crate) fn analyze_sequence(&mut self, forms: &[Syntax], cx: Cx) -> AnalyzeResult<Vec<Expr>> {
        let last = forms.len().saturating_sub(1);
        forms
            .iter()
            .enumerate()
            .map(|(i, form)| {
                let form_cx = if i == last {
                    cx
                } else {
                    cx.at(Position::Statement).boxed(true)
                };
                self.analyze_expr(form, form_cx)
            })
            .collect()
    }

    /// Wrap an error escaping a macro expansion with the current expansion
    /// stack, unless a deeper expansion already did.
    fn attach_expansions(&self, err: Error) -> Error {
        if err.expansions.is_empty() && !self.expansions.is_empty() {
            err.with_expansions(self.expansions.clone())
        } else {
            err
        }
    }
}

/// Iterator returned by [`Analyzer::analyze_forms`]
pub struct AnalyzeForms<'a, 'rt, I> {
    analyzer: &'a mut Analyzer<'rt>,
    forms: I,
}

impl<I> Iterator for AnalyzeForms<'_, '_, I>
where
    I: Iterator<Item = Syntax>,
{
    type Item = AnalyzeResult<Analysis>;

    fn next(&mut self) -> Option<Self::Item> {
        let form = self.forms.next()?;
        Some(self.analyzer.analyze(&form))
    }
}
