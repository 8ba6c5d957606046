//! Local frame tree
//!
//! Every lexical scope the analyzer enters becomes a [`LocalFrame`] in an
//! arena owned by [`FrameTree`]. Frames point at their parent by index, so
//! scope resolution is a walk up the parent chain and nothing holds a
//! reference into the tree while analysis mutates it.
//!
//! Capture and lift tables live on the nearest enclosing fn frame (or the
//! root), never on `let*`, `loop*`, `letfn*` or `try` frames.

use super::binding::{BindingId, LocalBinding};
use super::expr::Expr;
use super::lift::{LiftedConstant, LiftedVar, UniqueNames};
use super::ordered::OrderedMap;
use crate::symbol::Symbol;
use crate::value::Value;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u32);

impl FrameId {
    pub const ROOT: FrameId = FrameId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Root,
    Fn,
    Let,
    Loop,
    Letfn,
    Try,
    Catch,
    Finally,
}

/// Per-arity facts about a function, recorded on its fn frame
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: Option<Rc<str>>,
    pub unique_name: Rc<str>,
    /// Fixed parameters plus one for the rest parameter
    pub param_count: usize,
    pub is_variadic: bool,
    pub is_tail_recursive: bool,
    pub is_named_recursive: bool,
}

#[derive(Debug, Clone)]
pub struct LocalFrame {
    pub kind: FrameKind,
    pub parent: Option<FrameId>,
    pub locals: FxHashMap<Symbol, BindingId>,
    pub captures: OrderedMap<Symbol, BindingId>,
    pub lifted_vars: OrderedMap<Symbol, LiftedVar>,
    pub lifted_constants: OrderedMap<Value, LiftedConstant>,
    /// Set on fn frames
    pub fn_ctx: Option<FunctionContext>,
    /// Number of bindings, set on loop frames
    pub recur_arity: Option<usize>,
}

impl LocalFrame {
    fn new(kind: FrameKind, parent: Option<FrameId>) -> Self {
        LocalFrame {
            kind,
            parent,
            locals: FxHashMap::default(),
            captures: OrderedMap::new(),
            lifted_vars: OrderedMap::new(),
            lifted_constants: OrderedMap::new(),
            fn_ctx: None,
            recur_arity: None,
        }
    }

    pub fn is_fn(&self) -> bool {
        self.kind == FrameKind::Fn
    }
}

/// A local or capture found by [`FrameTree::find_local_or_capture`]
#[derive(Debug, Clone, PartialEq)]
pub struct FindResult {
    pub binding: BindingId,
    /// Fn frames between the lookup frame and the binding, innermost first
    pub crossed_fns: SmallVec<[FrameId; 4]>,
}

/// An enclosing named fn found by [`FrameTree::find_named_recursion`]
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRecursionResult {
    pub fn_frame: FrameId,
    /// Fn frames between the lookup frame and `fn_frame`, innermost first
    pub crossed_fns: SmallVec<[FrameId; 4]>,
}

/// What an unqualified name means lexically, found by
/// [`FrameTree::resolve_local`]
#[derive(Debug, Clone, PartialEq)]
pub enum LocalResolution {
    Binding(FindResult),
    NamedRecursion(NamedRecursionResult),
}

/// Arena of frames and bindings for one top-level form
#[derive(Debug, Clone)]
pub struct FrameTree {
    frames: Vec<LocalFrame>,
    bindings: Vec<LocalBinding>,
}

impl Default for FrameTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTree {
    pub fn new() -> Self {
        FrameTree {
            frames: vec![LocalFrame::new(FrameKind::Root, None)],
            bindings: Vec::new(),
        }
    }

    pub fn root(&self) -> &LocalFrame {
        &self.frames[0]
    }

    pub fn frame(&self, id: FrameId) -> &LocalFrame {
        &self.frames[id.index()]
    }

    pub(crate) fn frame_mut(&mut self, id: FrameId) -> &mut LocalFrame {
        &mut self.frames[id.index()]
    }

    pub fn binding(&self, id: BindingId) -> &LocalBinding {
        &self.bindings[id.index()]
    }

    pub fn frames(&self) -> impl Iterator<Item = (FrameId, &LocalFrame)> {
        self.frames
            .iter()
            .enumerate()
            .map(|(i, f)| (FrameId(i as u32), f))
    }

    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &LocalBinding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(i, b)| (BindingId(i as u32), b))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push_frame(&mut self, kind: FrameKind, parent: FrameId) -> FrameId {
        let id = FrameId(self.frames.len() as u32);
        self.frames.push(LocalFrame::new(kind, Some(parent)));
        id
    }

    fn push_binding(&mut self, binding: LocalBinding) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(binding);
        id
    }

    /// Bind `name` in `frame`, shadowing any earlier binding of the same name
    pub(crate) fn add_local(
        &mut self,
        frame: FrameId,
        name: Symbol,
        value: Option<Rc<Expr>>,
        needs_box: bool,
    ) -> BindingId {
        let id = self.push_binding(LocalBinding::new(name.clone(), frame, value, needs_box));
        self.frame_mut(frame).locals.insert(name, id);
        id
    }

    /// The closest fn frame at or above `frame`, or the root
    pub fn closest_fn_frame(&self, mut frame: FrameId) -> FrameId {
        loop {
            let f = self.frame(frame);
            match (f.kind, f.parent) {
                (FrameKind::Fn, _) | (_, None) => return frame,
                (_, Some(parent)) => frame = parent,
            }
        }
    }

    /// Nearest enclosing fn frame strictly above `frame`
    pub fn enclosing_fn_frame(&self, frame: FrameId) -> Option<FrameId> {
        let mut current = self.frame(frame).parent;
        while let Some(id) = current {
            if self.frame(id).is_fn() {
                return Some(id);
            }
            current = self.frame(id).parent;
        }
        None
    }

    /// Resolve `sym` from `frame` outward. Each frame's locals are checked
    /// before its captures; captures are skipped unless `allow_captures`.
    pub fn find_local_or_capture(
        &self,
        frame: FrameId,
        sym: &Symbol,
        allow_captures: bool,
    ) -> Option<FindResult> {
        let mut crossed_fns = SmallVec::new();
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = self.frame(id);
            if let Some(&binding) = f.locals.get(sym) {
                return Some(FindResult {
                    binding,
                    crossed_fns,
                });
            }
            if allow_captures {
                if let Some(&binding) = f.captures.get(sym) {
                    return Some(FindResult {
                        binding,
                        crossed_fns,
                    });
                }
            }
            if f.is_fn() {
                crossed_fns.push(id);
            }
            current = f.parent;
        }
        None
    }

    /// Resolve an unqualified name in one walk outward. At each frame the
    /// locals and captures are checked first, then the frame's own fn name,
    /// so parameters shadow the fn name and the fn name shadows anything
    /// bound outside it.
    pub fn resolve_local(&self, frame: FrameId, sym: &Symbol) -> Option<LocalResolution> {
        if sym.is_qualified() {
            return None;
        }
        let mut crossed_fns = SmallVec::new();
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = self.frame(id);
            if let Some(&binding) = f.locals.get(sym).or_else(|| f.captures.get(sym)) {
                return Some(LocalResolution::Binding(FindResult {
                    binding,
                    crossed_fns,
                }));
            }
            let names_fn = f
                .fn_ctx
                .as_ref()
                .is_some_and(|ctx| ctx.name.as_deref() == Some(sym.name()));
            if names_fn {
                return Some(LocalResolution::NamedRecursion(NamedRecursionResult {
                    fn_frame: id,
                    crossed_fns,
                }));
            }
            if f.is_fn() {
                crossed_fns.push(id);
            }
            current = f.parent;
        }
        None
    }

    /// Like [`find_local_or_capture`](Self::find_local_or_capture) but only
    /// ever returns the binding where the name was introduced
    pub fn find_originating_local(&self, frame: FrameId, sym: &Symbol) -> Option<FindResult> {
        self.find_local_or_capture(frame, sym, false)
    }

    /// Find the enclosing fn whose name is `sym`. Qualified symbols never
    /// name a local function.
    pub fn find_named_recursion(
        &self,
        frame: FrameId,
        sym: &Symbol,
    ) -> Option<NamedRecursionResult> {
        if sym.is_qualified() {
            return None;
        }
        let mut crossed_fns = SmallVec::new();
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = self.frame(id);
            if let Some(ctx) = &f.fn_ctx {
                if ctx.name.as_deref() == Some(sym.name()) {
                    return Some(NamedRecursionResult {
                        fn_frame: id,
                        crossed_fns,
                    });
                }
            }
            if f.is_fn() {
                crossed_fns.push(id);
            }
            current = f.parent;
        }
        None
    }

    /// Copy the found binding into every crossed fn frame, innermost first,
    /// and return the binding the reference should use: the innermost copy,
    /// or the original when nothing was crossed.
    ///
    /// Creating a copy is a boxed use of the original, since the closure
    /// environment stores the boxed value. Later uses of a copy do not touch
    /// the original.
    pub(crate) fn register_captures(&mut self, result: &FindResult) -> BindingId {
        let original = result.binding;
        let name = self.binding(original).name.clone();
        let mut innermost = None;
        let mut created = false;
        for &fn_frame in &result.crossed_fns {
            let existing = self.frame(fn_frame).captures.get(&name).copied();
            let copy = match existing {
                Some(copy) => copy,
                None => {
                    let copy = self.push_binding(LocalBinding::capture_of(
                        original,
                        name.clone(),
                        fn_frame,
                    ));
                    self.frame_mut(fn_frame)
                        .captures
                        .get_or_insert_with(name.clone(), || copy);
                    trace!(name = %name, frame = fn_frame.0, "registered capture");
                    created = true;
                    copy
                }
            };
            innermost.get_or_insert(copy);
        }
        if created {
            self.note_usage(original, true);
        }
        innermost.unwrap_or(original)
    }

    /// Propagate the captures of a named fn into the closest fn frame of a
    /// recursive reference that crossed at least one fn boundary.
    ///
    /// Only the captures of the arity frame that was found are copied, as
    /// they stand at this point of analysis, and only into the closest fn
    /// frame. Arities of the same fn capturing different names are not
    /// unioned.
    pub(crate) fn register_crossed_captures(
        &mut self,
        frame: FrameId,
        result: &NamedRecursionResult,
    ) {
        if result.crossed_fns.is_empty() {
            return;
        }
        let target = self.closest_fn_frame(frame);
        let captures: Vec<(Symbol, BindingId)> = self
            .frame(result.fn_frame)
            .captures
            .iter()
            .map(|(name, &id)| (name.clone(), id))
            .collect();
        for (name, source) in captures {
            if self.frame(target).captures.contains_key(&name) {
                continue;
            }
            let copy = self.push_binding(LocalBinding::capture_of(source, name.clone(), target));
            self.frame_mut(target)
                .captures
                .get_or_insert_with(name.clone(), || copy);
            trace!(name = %name, frame = target.0, "propagated capture for named recursion");
        }
    }

    /// Record one use of `binding`. Boxed uses escalate `needs_box` and
    /// flow to every local the binding's initializer can evaluate to
    /// (`(let* [b a] ...)`, `(let* [b (if c a 0)] ...)`), stopping at
    /// captures.
    pub(crate) fn note_usage(&mut self, binding: BindingId, needs_box: bool) {
        if !needs_box {
            self.bindings[binding.index()].has_unboxed_usage = true;
            return;
        }
        let mut pending: SmallVec<[BindingId; 4]> = SmallVec::new();
        pending.push(binding);
        while let Some(id) = pending.pop() {
            let b = &mut self.bindings[id.index()];
            // Already boxed means its aliases were reached before
            if b.has_boxed_usage {
                continue;
            }
            b.has_boxed_usage = true;
            b.needs_box = true;
            if let (None, Some(value)) = (&b.captured_from, &b.value) {
                pending.extend(value.result_locals());
            }
        }
    }

    pub(crate) fn lift_var(
        &mut self,
        frame: FrameId,
        qualified: &Symbol,
        names: &mut UniqueNames,
    ) -> LiftedVar {
        let target = self.closest_fn_frame(frame);
        let (lifted, inserted) = self
            .frame_mut(target)
            .lifted_vars
            .get_or_insert_with(qualified.clone(), || LiftedVar {
                name: qualified.clone(),
                native_name: names.next(&qualified.to_string()),
            });
        let lifted = lifted.clone();
        if inserted {
            trace!(var = %qualified, native = %lifted.native_name, "lifted var");
        }
        lifted
    }

    pub(crate) fn lift_constant(
        &mut self,
        frame: FrameId,
        value: &Value,
        names: &mut UniqueNames,
    ) -> LiftedConstant {
        let target = self.closest_fn_frame(frame);
        let (lifted, inserted) = self
            .frame_mut(target)
            .lifted_constants
            .get_or_insert_with(value.clone(), || LiftedConstant {
                value: value.clone(),
                native_name: names.constant(),
            });
        let lifted = lifted.clone();
        if inserted {
            trace!(value = %value, native = %lifted.native_name, "lifted constant");
        }
        lifted
    }
}
