//! Applications: calls, macro expansion and named recursion

use super::*;
use crate::hir::frame::{LocalResolution, NamedRecursionResult};

impl<'rt> Analyzer<'rt> {
    /// A non-special list form. A head naming a local is always a call and
    /// a head naming an enclosing fn is named recursion; otherwise macro
    /// vars expand and everything else is a plain call.
    pub(crate) fn analyze_application(
        &mut self,
        items: &[Syntax],
        syntax: &Syntax,
        cx: Cx,
    ) -> AnalyzeResult<Expr> {
        if let Some(head) = items[0].as_symbol() {
            match self.frames.resolve_local(cx.frame, head) {
                Some(LocalResolution::Binding(_)) => {}
                Some(LocalResolution::NamedRecursion(found)) => {
                    return self.analyze_named_recursion(items, syntax, cx, found);
                }
                None => {
                    let qualified = self.rt.qualify_symbol(head);
                    if self.rt.find_var(&qualified).is_some_and(|var| var.is_macro) {
                        return self.expand_macro(syntax, cx);
                    }
                }
            }
        }

        self.analyze_call(items, syntax, cx)
    }

    fn analyze_call(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        let source = self.analyze_expr(&items[0], cx.value())?;
        let unboxed_fast_path = match &source.kind {
            ExprKind::VarDeref { var } => self.config.is_unboxed_op(&var.name),
            _ => false,
        };

        let arg_cx = cx.value().boxed(!unboxed_fast_path);
        let args = items[1..]
            .iter()
            .map(|arg| self.analyze_expr(arg, arg_cx))
            .collect::<AnalyzeResult<Vec<_>>>()?;

        Ok(self.expr(
            ExprKind::Call {
                source: Box::new(source),
                args,
                unboxed_fast_path,
            },
            cx,
            &syntax.span,
        ))
    }

    fn analyze_named_recursion(
        &mut self,
        items: &[Syntax],
        syntax: &Syntax,
        cx: Cx,
        found: NamedRecursionResult,
    ) -> AnalyzeResult<Expr> {
        self.frames.register_crossed_captures(cx.frame, &found);
        match self.frames.frame_mut(found.fn_frame).fn_ctx.as_mut() {
            Some(ctx) => ctx.is_named_recursive = true,
            None => {
                return Err(Error::internal(
                    "named recursion target has no function context",
                    syntax.span.clone(),
                ))
            }
        }

        let args = items[1..]
            .iter()
            .map(|arg| self.analyze_expr(arg, cx.value()))
            .collect::<AnalyzeResult<Vec<_>>>()?;

        Ok(self.expr(
            ExprKind::NamedRecursion {
                fn_frame: found.fn_frame,
                args,
                crossed: found.crossed_fns,
            },
            cx,
            &syntax.span,
        ))
    }

    /// Expand a macro call once and analyze the result in the same context.
    ///
    /// The call stays on the expansion stack while its expansion is being
    /// analyzed, so errors from deep inside carry every enclosing macro call.
    fn expand_macro(&mut self, syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        debug!(form = %syntax, span = %syntax.span, "expanding macro");
        self.expansions.push(syntax.clone());

        let result = match self.rt.macroexpand1(syntax) {
            Ok(expanded) => self.analyze_expr(&expanded, cx),
            Err(cause) => Err(Error::macro_expansion_exception(syntax, cause)),
        };
        let result = result.map_err(|err| self.attach_expansions(err));

        self.expansions.pop();
        result
    }
}
