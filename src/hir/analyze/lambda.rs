//! Function analysis: (fn* name? [params] body*) and (fn* name? ([params] body*)+)

use super::binding::local_name;
use super::*;
use crate::hir::expr::FnArity;
use crate::hir::frame::{FrameKind, FunctionContext};
use crate::symbol::Symbol;
use std::rc::Rc;

/// Parsed parameter vector of one arity
struct ParamList<'s> {
    fixed: Vec<&'s Symbol>,
    rest: Option<&'s Symbol>,
}

impl<'rt> Analyzer<'rt> {
    pub(crate) fn analyze_fn(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        let mut rest = &items[1..];

        let name = match rest.first().and_then(Syntax::as_symbol) {
            Some(sym) if sym.is_qualified() => {
                return Err(Error::invalid_fn(
                    format!("fn* name must be an unqualified symbol, got {}", sym),
                    rest[0].span.clone(),
                ))
            }
            Some(sym) => {
                rest = &rest[1..];
                Some(sym.clone())
            }
            None => None,
        };

        // Collect (params, body) per arity
        let arity_forms: Vec<(&Syntax, &[Syntax])> = match rest.first() {
            None => {
                return Err(Error::invalid_fn(
                    "fn* requires a parameter vector or at least one arity list",
                    syntax.span.clone(),
                ))
            }
            Some(first) if first.as_vector().is_some() => vec![(first, &rest[1..])],
            Some(_) => rest
                .iter()
                .map(|arity| match arity.as_list() {
                    Some([params, body @ ..]) if params.as_vector().is_some() => Ok((params, body)),
                    _ => Err(Error::invalid_fn(
                        format!(
                            "fn* arity must be a list starting with a parameter vector, got {}",
                            arity
                        ),
                        arity.span.clone(),
                    )),
                })
                .collect::<AnalyzeResult<_>>()?,
        };

        let unique_name = self.names.next(name.as_ref().map_or("fn", |n| n.name()));

        let mut arities: Vec<FnArity> = Vec::with_capacity(arity_forms.len());
        for (params, body) in arity_forms {
            let arity = self.analyze_fn_arity(name.as_ref(), &unique_name, params, body, cx)?;
            check_arity_conflicts(&arities, &arity, &params.span)?;
            arities.push(arity);
        }

        Ok(self.expr(
            ExprKind::Function {
                name,
                unique_name,
                arities,
            },
            cx,
            &syntax.span,
        ))
    }

    fn parse_params<'s>(&self, params: &'s Syntax) -> AnalyzeResult<ParamList<'s>> {
        let items = params.as_vector().unwrap_or_default();
        let mut fixed = Vec::with_capacity(items.len());
        let mut rest = None;

        let mut iter = items.iter();
        while let Some(param) = iter.next() {
            if param.is_symbol("&") {
                let rest_param = iter.next().ok_or_else(|| {
                    Error::invalid_fn_parameters("missing rest parameter after &", param.span.clone())
                })?;
                if let Some(extra) = iter.next() {
                    return Err(Error::invalid_fn_parameters(
                        "only one parameter may follow &",
                        extra.span.clone(),
                    ));
                }
                let sym = local_name(rest_param).filter(|s| s.name() != "&").ok_or_else(|| {
                    Error::invalid_fn_parameters(
                        format!("rest parameter must be an unqualified symbol, got {}", rest_param),
                        rest_param.span.clone(),
                    )
                })?;
                rest = Some(sym);
                break;
            }

            let sym = local_name(param).ok_or_else(|| {
                Error::invalid_fn_parameters(
                    format!("parameter must be an unqualified symbol, got {}", param),
                    param.span.clone(),
                )
            })?;
            fixed.push(sym);
        }

        let count = fixed.len() + usize::from(rest.is_some());
        if count > self.config.max_fn_params {
            return Err(Error::invalid_fn_parameters(
                format!(
                    "functions take at most {} parameters, got {}",
                    self.config.max_fn_params, count
                ),
                params.span.clone(),
            ));
        }

        Ok(ParamList { fixed, rest })
    }

    fn analyze_fn_arity(
        &mut self,
        name: Option<&Symbol>,
        unique_name: &Rc<str>,
        params: &Syntax,
        body: &[Syntax],
        cx: Cx,
    ) -> AnalyzeResult<FnArity> {
        let list = self.parse_params(params)?;
        let is_variadic = list.rest.is_some();

        let frame = self.frames.push_frame(FrameKind::Fn, cx.frame);
        self.frames.frame_mut(frame).fn_ctx = Some(FunctionContext {
            name: name.map(|n| Rc::from(n.name())),
            unique_name: unique_name.clone(),
            param_count: list.fixed.len() + usize::from(is_variadic),
            is_variadic,
            is_tail_recursive: false,
            is_named_recursive: false,
        });

        let bindings = list
            .fixed
            .iter()
            .chain(list.rest.iter())
            .map(|sym| self.frames.add_local(frame, (*sym).clone(), None, true))
            .collect();

        let body_cx = Cx {
            frame,
            position: Position::Tail,
            needs_box: true,
        };
        let body = self.analyze_body(body, body_cx, &params.span)?;

        Ok(FnArity {
            params: bindings,
            is_variadic,
            frame,
            body: Box::new(body),
        })
    }
}

/// Reject an arity that clashes with the ones before it
fn check_arity_conflicts(previous: &[FnArity], arity: &FnArity, span: &Span) -> AnalyzeResult<()> {
    for other in previous {
        if other.is_variadic && arity.is_variadic {
            return Err(Error::invalid_fn(
                "fn* can't have more than one variadic arity",
                span.clone(),
            ));
        }
        if !other.is_variadic && !arity.is_variadic && other.params.len() == arity.params.len() {
            return Err(Error::invalid_fn(
                format!("fn* can't have two arities taking {} parameters", arity.params.len()),
                span.clone(),
            ));
        }
        let (fixed, variadic) = match (other.is_variadic, arity.is_variadic) {
            (true, false) => (arity, other),
            (false, true) => (other, arity),
            _ => continue,
        };
        if fixed.fixed_count() > variadic.fixed_count() {
            return Err(Error::invalid_fn(
                "fn* can't have a fixed arity with more parameters than the variadic arity",
                span.clone(),
            ));
        }
    }
    Ok(())
}
