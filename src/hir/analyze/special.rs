//! Special forms: try, case*, recur, native/raw

use super::binding::local_name;
use super::*;
use crate::hir::expr::{CatchClause, NativeChunk, RecurTarget};
use crate::hir::frame::FrameKind;
use crate::syntax::SyntaxKind;

impl<'rt> Analyzer<'rt> {
    /// `(try body* (catch Type name body*)? (finally body*)?)`
    pub(crate) fn analyze_try(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        let mut body_forms: &[Syntax] = &[];
        let mut catch_form = None;
        let mut finally_form = None;

        for (i, item) in items.iter().enumerate().skip(1) {
            let clause = item.as_list().filter(|parts| {
                parts
                    .first()
                    .is_some_and(|head| head.is_symbol("catch") || head.is_symbol("finally"))
            });
            let Some(parts) = clause else {
                if catch_form.is_some() || finally_form.is_some() {
                    return Err(Error::invalid_try(
                        "try body forms must come before catch and finally",
                        item.span.clone(),
                    ));
                }
                body_forms = &items[1..=i];
                continue;
            };

            if finally_form.is_some() {
                return Err(Error::invalid_try(
                    "finally must be the last clause of try",
                    item.span.clone(),
                ));
            }
            if parts[0].is_symbol("finally") {
                finally_form = Some(parts);
            } else if catch_form.is_some() {
                return Err(Error::invalid_try(
                    "try supports a single catch clause",
                    item.span.clone(),
                ));
            } else {
                catch_form = Some((parts, item));
            }
        }

        let try_frame = self.frames.push_frame(FrameKind::Try, cx.frame);
        let body = self.analyze_body(body_forms, cx.in_frame(try_frame), &syntax.span)?;

        let catch = match catch_form {
            Some((parts, clause)) => Some(self.analyze_catch(parts, clause, cx)?),
            None => None,
        };

        let finally = match finally_form {
            Some(parts) => {
                let frame = self.frames.push_frame(FrameKind::Finally, cx.frame);
                let finally_cx = Cx {
                    frame,
                    position: Position::Statement,
                    needs_box: true,
                };
                Some(Box::new(self.analyze_body(&parts[1..], finally_cx, &syntax.span)?))
            }
            None => None,
        };

        Ok(self.expr(
            ExprKind::Try {
                body: Box::new(body),
                frame: try_frame,
                catch,
                finally,
            },
            cx,
            &syntax.span,
        ))
    }

    fn analyze_catch(&mut self, parts: &[Syntax], clause: &Syntax, cx: Cx) -> AnalyzeResult<CatchClause> {
        let (exception_type, name) = match parts {
            [_, ty, name, ..] => match (ty.as_symbol(), local_name(name)) {
                (Some(ty), Some(name)) => (ty.clone(), name.clone()),
                _ => {
                    return Err(Error::invalid_try(
                        format!(
                            "catch requires an exception type symbol and a binding name, got {} and {}",
                            ty, name
                        ),
                        clause.span.clone(),
                    ))
                }
            },
            _ => {
                return Err(Error::invalid_try(
                    "catch requires an exception type and a binding name",
                    clause.span.clone(),
                ))
            }
        };

        let frame = self.frames.push_frame(FrameKind::Catch, cx.frame);
        let binding = self.frames.add_local(frame, name, None, true);
        let body = self.analyze_body(&parts[3..], cx.in_frame(frame), &clause.span)?;

        Ok(CatchClause {
            exception_type,
            binding,
            frame,
            body: Box::new(body),
        })
    }

    /// `(case* value shift mask default {key branch ...})` with integer keys
    pub(crate) fn analyze_case(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        let [_, value, shift, mask, default, branches] = items else {
            return Err(Error::invalid_case(
                "case* requires a value, shift, mask, default and a branch map",
                syntax.span.clone(),
            ));
        };

        let int_arg = |form: &Syntax, what: &str| {
            form.as_int().ok_or_else(|| {
                Error::invalid_case(
                    format!("case* {} must be an integer, got {}", what, form.kind_label()),
                    form.span.clone(),
                )
            })
        };
        let shift = int_arg(shift, "shift")?;
        let mask = int_arg(mask, "mask")?;

        let SyntaxKind::Map(entries) = &branches.kind else {
            return Err(Error::invalid_case(
                format!("case* branches must be a map, got {}", branches.kind_label()),
                branches.span.clone(),
            ));
        };

        let value = self.analyze_expr(value, cx.value())?;

        let mut keys = Vec::with_capacity(entries.len());
        let mut exprs = Vec::with_capacity(entries.len());
        for (key, branch) in entries {
            keys.push(int_arg(key, "key")?);
            exprs.push(self.analyze_expr(branch, cx)?);
        }
        let default = self.analyze_expr(default, cx)?;

        Ok(self.expr(
            ExprKind::Case {
                value: Box::new(value),
                shift,
                mask,
                default: Box::new(default),
                keys,
                exprs,
            },
            cx,
            &syntax.span,
        ))
    }

    /// `(recur args*)`: only in tail position of the nearest fn or loop,
    /// never across a try boundary, with exactly as many args as the target
    /// takes.
    pub(crate) fn analyze_recur(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        if cx.position != Position::Tail {
            return Err(Error::invalid_recur_position(
                "recur must be in tail position",
                syntax.span.clone(),
            ));
        }

        let (target, expected) = self.recur_target(cx.frame, &syntax.span)?;
        let got = items.len() - 1;
        if got != expected {
            return Err(Error::invalid_recur_args(expected, got, syntax.span.clone()));
        }

        let arg_cx = cx.value().boxed(!matches!(target, RecurTarget::Loop(_)));
        let args = items[1..]
            .iter()
            .map(|arg| self.analyze_expr(arg, arg_cx))
            .collect::<AnalyzeResult<Vec<_>>>()?;

        if let RecurTarget::Fn(frame) = target {
            if let Some(ctx) = self.frames.frame_mut(frame).fn_ctx.as_mut() {
                ctx.is_tail_recursive = true;
            }
        }

        Ok(self.expr(ExprKind::Recur { args, target }, cx, &syntax.span))
    }

    /// Walk up to the fn or loop a recur at `frame` jumps to, along with the
    /// number of arguments it takes
    fn recur_target(&self, frame: FrameId, span: &Span) -> AnalyzeResult<(RecurTarget, usize)> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = self.frames.frame(id);
            match f.kind {
                FrameKind::Fn => {
                    let ctx = f.fn_ctx.as_ref().ok_or_else(|| {
                        Error::internal("fn frame has no function context", span.clone())
                    })?;
                    return Ok((RecurTarget::Fn(id), ctx.param_count));
                }
                FrameKind::Loop => {
                    let arity = f.recur_arity.ok_or_else(|| {
                        Error::internal("loop frame has no recur arity", span.clone())
                    })?;
                    return Ok((RecurTarget::Loop(id), arity));
                }
                FrameKind::Try | FrameKind::Catch | FrameKind::Finally => {
                    return Err(Error::invalid_recur_from_try(span.clone()))
                }
                FrameKind::Root => {
                    return Err(Error::invalid_recur_position(
                        "recur must be inside a fn* or loop*",
                        span.clone(),
                    ))
                }
                FrameKind::Let | FrameKind::Letfn => current = f.parent,
            }
        }
        Err(Error::internal("frame chain does not end at the root", span.clone()))
    }

    /// `(native/raw "code ~{ form } code")`. Interpolated text is read by
    /// the runtime and must hold exactly one form.
    pub(crate) fn analyze_native_raw(
        &mut self,
        items: &[Syntax],
        syntax: &Syntax,
        cx: Cx,
    ) -> AnalyzeResult<Expr> {
        let code = match items {
            [_, code] => code.as_str().ok_or_else(|| {
                Error::invalid_native_raw(
                    format!("native/raw requires a string, got {}", code.kind_label()),
                    code.span.clone(),
                )
            })?,
            _ => {
                return Err(Error::invalid_native_raw(
                    "native/raw requires exactly 1 argument",
                    syntax.span.clone(),
                ))
            }
        };

        let mut chunks = Vec::new();
        for piece in split_interpolations(code, &items[1].span)? {
            match piece {
                Piece::Code(text) => chunks.push(NativeChunk::Code(text.to_string())),
                Piece::Interpolation(text) => {
                    let forms = self.rt.read_fragment(text, &items[1].span)?;
                    let [form] = forms.as_slice() else {
                        return Err(Error::invalid_native_raw(
                            format!(
                                "native/raw interpolation must contain exactly one form, got {}",
                                forms.len()
                            ),
                            items[1].span.clone(),
                        ));
                    };
                    let expr = self.analyze_expr(form, cx.value())?;
                    chunks.push(NativeChunk::Expr(expr));
                }
            }
        }

        Ok(self.expr(ExprKind::NativeRaw { chunks }, cx, &syntax.span))
    }
}

#[derive(Debug, PartialEq)]
enum Piece<'s> {
    Code(&'s str),
    Interpolation(&'s str),
}

/// Split `code` on `~{ ... }`, matching nested braces inside the form
fn split_interpolations<'s>(code: &'s str, span: &Span) -> AnalyzeResult<Vec<Piece<'s>>> {
    let mut pieces = Vec::new();
    let mut rest = code;
    while let Some(start) = rest.find("~{") {
        if start > 0 {
            pieces.push(Piece::Code(&rest[..start]));
        }
        let inner = &rest[start + 2..];
        let mut depth = 1usize;
        let mut end = None;
        for (i, ch) in inner.char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end.ok_or_else(|| {
            Error::invalid_native_raw("unterminated ~{ interpolation", span.clone())
        })?;
        pieces.push(Piece::Interpolation(&inner[..end]));
        rest = &inner[end + 1..];
    }
    if !rest.is_empty() {
        pieces.push(Piece::Code(rest));
    }
    Ok(pieces)
}
