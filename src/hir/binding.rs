//! Binding types for HIR

use super::expr::Expr;
use super::frame::FrameId;
use crate::symbol::Symbol;
use std::rc::Rc;

/// Unique identifier for a binding, assigned during analysis.
/// Two `let*` bindings of `x` in different scopes get different ids, and so
/// does every capture copy of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

impl BindingId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A local name introduced by `fn*`, `let*`, `loop*`, `letfn*` or `catch`,
/// or a capture copy of one.
#[derive(Debug, Clone)]
pub struct LocalBinding {
    pub name: Symbol,
    /// Frame the binding belongs to. For capture copies, the fn frame
    /// holding the copy.
    pub frame: FrameId,
    /// Initializer for `let*` bindings. `None` for parameters, `loop*`
    /// bindings, `letfn*` names, catch bindings and captures.
    pub value: Option<Rc<Expr>>,
    /// The binding this one was copied from, if it is a capture
    pub captured_from: Option<BindingId>,
    /// Whether codegen must keep this binding boxed
    pub needs_box: bool,
    pub has_boxed_usage: bool,
    pub has_unboxed_usage: bool,
}

impl LocalBinding {
    pub(crate) fn new(
        name: Symbol,
        frame: FrameId,
        value: Option<Rc<Expr>>,
        needs_box: bool,
    ) -> Self {
        LocalBinding {
            name,
            frame,
            value,
            captured_from: None,
            needs_box,
            has_boxed_usage: false,
            has_unboxed_usage: false,
        }
    }

    /// A capture copy is always boxed and never used unboxed
    pub(crate) fn capture_of(original: BindingId, name: Symbol, frame: FrameId) -> Self {
        LocalBinding {
            name,
            frame,
            value: None,
            captured_from: Some(original),
            needs_box: true,
            has_boxed_usage: true,
            has_unboxed_usage: false,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured_from.is_some()
    }
}
