//! Core form analysis: analyze_expr, symbols, literals and simple specials

use super::*;
use crate::hir::frame::LocalResolution;
use crate::symbol::Symbol;
use crate::syntax::SyntaxKind;
use crate::value::Value;

/// Special forms understood by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Special {
    Def,
    Fn,
    Let,
    Letfn,
    Loop,
    Do,
    If,
    Quote,
    Var,
    Throw,
    Try,
    Case,
    Recur,
    NativeRaw,
}

impl Special {
    pub fn from_symbol(sym: &Symbol) -> Option<Self> {
        let special = match (sym.ns(), sym.name()) {
            (None, "def") => Special::Def,
            (None, "fn*") => Special::Fn,
            (None, "let*") => Special::Let,
            (None, "letfn*") => Special::Letfn,
            (None, "loop*") => Special::Loop,
            (None, "do") => Special::Do,
            (None, "if") => Special::If,
            (None, "quote") => Special::Quote,
            (None, "var") => Special::Var,
            (None, "throw") => Special::Throw,
            (None, "try") => Special::Try,
            (None, "case*") => Special::Case,
            (None, "recur") => Special::Recur,
            (Some("native"), "raw") => Special::NativeRaw,
            _ => return None,
        };
        Some(special)
    }
}

/// Literal data that needs no analysis: atoms other than symbols, and
/// vectors, maps and sets built only from such data. `()` counts too.
fn is_constant_syntax(syntax: &Syntax) -> bool {
    match &syntax.kind {
        SyntaxKind::Symbol(_) => false,
        SyntaxKind::List(items) => items.is_empty(),
        SyntaxKind::Vector(items) | SyntaxKind::Set(items) => items.iter().all(is_constant_syntax),
        SyntaxKind::Map(entries) => entries
            .iter()
            .all(|(k, v)| is_constant_syntax(k) && is_constant_syntax(v)),
        _ => true,
    }
}

impl<'rt> Analyzer<'rt> {
    pub(crate) fn analyze_expr(&mut self, syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        match &syntax.kind {
            SyntaxKind::Symbol(sym) => self.analyze_symbol(sym, syntax, cx),
            SyntaxKind::List(items) if !items.is_empty() => self.analyze_list(items, syntax, cx),
            SyntaxKind::Vector(items) if !is_constant_syntax(syntax) => {
                let exprs = self.analyze_operands(items, cx)?;
                Ok(self.expr(ExprKind::Vector(exprs), cx, &syntax.span))
            }
            SyntaxKind::Set(items) if !is_constant_syntax(syntax) => {
                let exprs = self.analyze_operands(items, cx)?;
                Ok(self.expr(ExprKind::Set(exprs), cx, &syntax.span))
            }
            SyntaxKind::Map(entries) if !is_constant_syntax(syntax) => {
                let mut pairs = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = self.analyze_expr(k, cx.value())?;
                    let value = self.analyze_expr(v, cx.value())?;
                    pairs.push((key, value));
                }
                Ok(self.expr(ExprKind::Map(pairs), cx, &syntax.span))
            }
            // Everything else is constant data
            _ => {
                let value = syntax.to_value(&mut *self.rt);
                Ok(self.literal(value, cx, &syntax.span))
            }
        }
    }

    fn analyze_operands(&mut self, items: &[Syntax], cx: Cx) -> AnalyzeResult<Vec<Expr>> {
        items
            .iter()
            .map(|item| self.analyze_expr(item, cx.value()))
            .collect()
    }

    /// A constant, lifted unless it is nil or a boolean
    pub(crate) fn literal(&mut self, value: Value, cx: Cx, span: &Span) -> Expr {
        let constant = if value.needs_lifting() {
            Some(self.frames.lift_constant(cx.frame, &value, &mut self.names))
        } else {
            None
        };
        self.expr(ExprKind::PrimitiveLiteral { value, constant }, cx, span)
    }

    pub(crate) fn nil(&mut self, cx: Cx, span: &Span) -> Expr {
        self.literal(Value::Nil, cx, span)
    }

    /// Resolve a symbol: the innermost local, capture or enclosing fn name
    /// first, then vars.
    fn analyze_symbol(&mut self, sym: &Symbol, syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        match self.frames.resolve_local(cx.frame, sym) {
            Some(LocalResolution::Binding(found)) => {
                let binding = self.frames.register_captures(&found);
                self.frames.note_usage(binding, cx.needs_box);
                return Ok(self.expr(
                    ExprKind::LocalReference {
                        name: sym.clone(),
                        binding,
                        needs_box: cx.needs_box,
                    },
                    cx,
                    &syntax.span,
                ));
            }
            Some(LocalResolution::NamedRecursion(found)) => {
                self.frames.register_crossed_captures(cx.frame, &found);
                return Ok(self.expr(
                    ExprKind::RecursionReference {
                        name: sym.clone(),
                        fn_frame: found.fn_frame,
                    },
                    cx,
                    &syntax.span,
                ));
            }
            None => {}
        }

        let qualified = self.rt.qualify_symbol(sym);
        match self.rt.find_var(&qualified) {
            Some(var) => {
                let var = self.frames.lift_var(cx.frame, &var.name, &mut self.names);
                Ok(self.expr(ExprKind::VarDeref { var }, cx, &syntax.span))
            }
            None if sym.is_qualified() => Err(Error::unresolved_var(sym, syntax.span.clone())),
            None => Err(Error::unresolved_symbol(sym, syntax.span.clone())),
        }
    }

    fn analyze_list(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        if let Some(special) = items[0].as_symbol().and_then(Special::from_symbol) {
            return match special {
                Special::Def => self.analyze_def(items, syntax, cx),
                Special::Fn => self.analyze_fn(items, syntax, cx),
                Special::Let => self.analyze_let(items, syntax, cx, false),
                Special::Loop => self.analyze_let(items, syntax, cx, true),
                Special::Letfn => self.analyze_letfn(items, syntax, cx),
                Special::Do => self.analyze_do(items, syntax, cx),
                Special::If => self.analyze_if(items, syntax, cx),
                Special::Quote => self.analyze_quote(items, syntax, cx),
                Special::Var => self.analyze_var(items, syntax, cx),
                Special::Throw => self.analyze_throw(items, syntax, cx),
                Special::Try => self.analyze_try(items, syntax, cx),
                Special::Case => self.analyze_case(items, syntax, cx),
                Special::Recur => self.analyze_recur(items, syntax, cx),
                Special::NativeRaw => self.analyze_native_raw(items, syntax, cx),
            };
        }
        self.analyze_application(items, syntax, cx)
    }

    fn analyze_do(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        if items.len() == 1 {
            return Ok(self.nil(cx, &syntax.span));
        }
        let exprs = self.analyze_sequence(&items[1..], cx)?;
        Ok(self.expr(ExprKind::Do(exprs), cx, &syntax.span))
    }

    fn analyze_if(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        if !(3..=4).contains(&items.len()) {
            return Err(Error::invalid_if(
                format!(
                    "if requires a condition, a then branch and an optional else branch, got {} argument{}",
                    items.len() - 1,
                    if items.len() == 2 { "" } else { "s" }
                ),
                syntax.span.clone(),
            ));
        }

        let cond = self.analyze_expr(&items[1], cx.value())?;
        let then = self.analyze_expr(&items[2], cx)?;
        let else_ = match items.get(3) {
            Some(form) => Some(Box::new(self.analyze_expr(form, cx)?)),
            None => None,
        };

        Ok(self.expr(
            ExprKind::If {
                cond: Box::new(cond),
                then: Box::new(then),
                else_,
            },
            cx,
            &syntax.span,
        ))
    }

    fn analyze_quote(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        if items.len() != 2 {
            return Err(Error::invalid_quote(
                "quote requires exactly 1 argument",
                syntax.span.clone(),
            ));
        }
        let value = items[1].to_value(&mut *self.rt);
        Ok(self.literal(value, cx, &syntax.span))
    }

    fn analyze_var(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        let sym = match items {
            [_, target] => target.as_symbol().ok_or_else(|| {
                Error::invalid_var_reference(
                    format!("var requires a symbol, got {}", target.kind_label()),
                    target.span.clone(),
                )
            })?,
            _ => {
                return Err(Error::invalid_var_reference(
                    "var requires exactly 1 argument",
                    syntax.span.clone(),
                ))
            }
        };

        let qualified = self.rt.qualify_symbol(sym);
        let var = self
            .rt
            .find_var(&qualified)
            .ok_or_else(|| Error::unresolved_var(&qualified, items[1].span.clone()))?;
        let var = self.frames.lift_var(cx.frame, &var.name, &mut self.names);
        Ok(self.expr(ExprKind::VarRef { var }, cx, &syntax.span))
    }

    fn analyze_throw(&mut self, items: &[Syntax], syntax: &Syntax, cx: Cx) -> AnalyzeResult<Expr> {
        if items.len() != 2 {
            return Err(Error::invalid_throw(
                "throw requires exactly 1 argument",
                syntax.span.clone(),
            ));
        }
        let value = self.analyze_expr(&items[1], cx.value())?;
        Ok(self.expr(ExprKind::Throw(Box::new(value)), cx, &syntax.span))
    }
}
