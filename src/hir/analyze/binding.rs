//! Binding forms: def, let*, loop*, letfn*

use super::*;
use crate::error::ErrorKind;
use crate::hir::frame::FrameKind;
use crate::symbol::Symbol;
use std::rc::Rc;

impl<'rt> Analyzer<'rt> {
    /// `(def name)`, `(def name value)` or `(def name "doc" value)`.
    ///
    /// The var is interned before the value is analyzed so the value can
    /// refer to it.
    pub(crate) fn analyze_def(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        if !(2..=4).contains(&items.len()) {
            return Err(Error::invalid_def(
                "def requires a name, an optional doc string and an optional value",
                syntax.span.clone(),
            ));
        }

        let name = items[1].as_symbol().ok_or_else(|| {
            Error::invalid_def(
                format!("def name must be a symbol, got {}", items[1].kind_label()),
                items[1].span.clone(),
            )
        })?;

        let current_ns = self.rt.current_ns().to_string();
        if let Some(ns) = name.ns() {
            if ns != current_ns {
                return Err(Error::invalid_def(
                    format!(
                        "cannot def {} from namespace {}; qualified names must use the current namespace",
                        name, current_ns
                    ),
                    items[1].span.clone(),
                ));
            }
        }

        let value_form = match items {
            [_, _] => None,
            [_, _, value] => Some(value),
            [_, _, doc, value] => {
                if doc.as_str().is_none() {
                    return Err(Error::invalid_def(
                        format!("def doc string must be a string, got {}", doc.kind_label()),
                        doc.span.clone(),
                    ));
                }
                Some(value)
            }
            _ => None,
        };

        let var = self.rt.intern_var(&name.with_ns(&current_ns));
        let var = self.frames.lift_var(cx.frame, &var.name, &mut self.names);

        let value = match value_form {
            Some(form) => Some(Box::new(self.analyze_expr(form, cx.value())?)),
            None => None,
        };

        Ok(self.expr(ExprKind::Def { var, value }, cx, &syntax.span))
    }

    /// `(let* [name init ...] body*)`, or `loop*` with the same shape.
    pub(crate) fn analyze_let(
        &mut self,
        items: &[Syntax],
        syntax: &Syntax,
        cx: Cx,
        is_loop: bool,
    ) -> AnalyzeResult<Expr> {
        let (form_name, kind) = if is_loop {
            ("loop*", ErrorKind::AnalyzeInvalidLoop)
        } else {
            ("let*", ErrorKind::AnalyzeInvalidLet)
        };
        let error = |message: String, span: Span| Error::new(kind, message, span);

        let bindings = items.get(1).and_then(Syntax::as_vector).ok_or_else(|| {
            error(
                format!("{} requires a binding vector", form_name),
                syntax.span.clone(),
            )
        })?;
        if bindings.len() % 2 != 0 {
            return Err(error(
                format!("{} binding vector requires an even number of forms", form_name),
                items[1].span.clone(),
            ));
        }

        let frame = self.frames.push_frame(
            if is_loop { FrameKind::Loop } else { FrameKind::Let },
            cx.frame,
        );
        let init_cx = Cx {
            frame,
            position: Position::Value,
            needs_box: false,
        };

        let mut pairs = Vec::with_capacity(bindings.len() / 2);
        for pair in bindings.chunks(2) {
            let name = local_name(&pair[0]).ok_or_else(|| {
                error(
                    format!(
                        "{} binding name must be an unqualified symbol, got {}",
                        form_name, pair[0]
                    ),
                    pair[0].span.clone(),
                )
            })?;

            let init = Rc::new(self.analyze_expr(&pair[1], init_cx)?);
            let needs_box = !init.is_unboxable(&self.frames);
            let value = if is_loop { None } else { Some(init.clone()) };
            let binding = self.frames.add_local(frame, name.clone(), value, needs_box);
            pairs.push((binding, init));
        }

        let body_position = if is_loop { Position::Tail } else { cx.position };
        if is_loop {
            self.frames.frame_mut(frame).recur_arity = Some(pairs.len());
        }
        let body = self.analyze_body(
            &items[2..],
            cx.in_frame(frame).at(body_position),
            &syntax.span,
        )?;

        Ok(self.expr(
            ExprKind::Let {
                pairs,
                body: Box::new(body),
                frame,
                is_loop,
            },
            cx,
            &syntax.span,
        ))
    }

    /// `(letfn* [name (fn* ...) ...] body*)`. Every name is bound before any
    /// function is analyzed, so the functions can call each other.
    pub(crate) fn analyze_letfn(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        let bindings = items.get(1).and_then(Syntax::as_vector).ok_or_else(|| {
            Error::invalid_letfn("letfn* requires a binding vector", syntax.span.clone())
        })?;
        if bindings.len() % 2 != 0 {
            return Err(Error::invalid_letfn(
                "letfn* binding vector requires an even number of forms",
                items[1].span.clone(),
            ));
        }

        let frame = self.frames.push_frame(FrameKind::Letfn, cx.frame);
        let mut names = Vec::with_capacity(bindings.len() / 2);
        for pair in bindings.chunks(2) {
            let name = local_name(&pair[0]).ok_or_else(|| {
                Error::invalid_letfn(
                    format!("letfn* binding name must be an unqualified symbol, got {}", pair[0]),
                    pair[0].span.clone(),
                )
            })?;
            if !pair[1].head_symbol().is_some_and(|head| head == &Symbol::simple("fn*")) {
                return Err(Error::invalid_letfn(
                    format!("letfn* binding {} must be a fn* form", name),
                    pair[1].span.clone(),
                ));
            }
            names.push(self.frames.add_local(frame, name.clone(), None, true));
        }

        let fn_cx = Cx {
            frame,
            position: Position::Value,
            needs_box: true,
        };
        let mut pairs = Vec::with_capacity(names.len());
        for (binding, pair) in names.into_iter().zip(bindings.chunks(2)) {
            pairs.push((binding, self.analyze_expr(&pair[1], fn_cx)?));
        }

        let body = self.analyze_body(&items[2..], cx.in_frame(frame), &syntax.span)?;

        Ok(self.expr(
            ExprKind::Letfn {
                pairs,
                body: Box::new(body),
                frame,
            },
            cx,
            &syntax.span,
        ))
    }
}

/// Binding names are unqualified symbols
pub(super) fn local_name(syntax: &Syntax) -> Option<&Symbol> {
    syntax.as_symbol().filter(|sym| !sym.is_qualified())
}
