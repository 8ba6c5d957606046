//! Analyzer options

use crate::runtime::CORE_NS;
use crate::symbol::Symbol;
use rustc_hash::FxHashSet;

/// Core functions whose operands may stay unboxed
pub const DEFAULT_UNBOXED_OPS: &[&str] = &[
    "+", "-", "*", "/", "<", ">", "<=", ">=", "==", "inc", "dec", "quot", "rem", "min", "max",
    "zero?", "pos?", "neg?",
];

pub const DEFAULT_MAX_FN_PARAMS: usize = 20;

/// Options for analysis.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Qualified vars whose call operands are analyzed in an unboxed context
    pub unboxed_ops: FxHashSet<Symbol>,
    /// Upper bound on fixed parameters per arity, the rest parameter included
    pub max_fn_params: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            unboxed_ops: DEFAULT_UNBOXED_OPS
                .iter()
                .map(|name| Symbol::qualified(CORE_NS, name))
                .collect(),
            max_fn_params: DEFAULT_MAX_FN_PARAMS,
        }
    }
}

impl AnalyzerConfig {
    /// A config with no unboxed fast paths at all
    pub fn boxed_only() -> Self {
        AnalyzerConfig {
            unboxed_ops: FxHashSet::default(),
            ..AnalyzerConfig::default()
        }
    }

    pub fn with_unboxed_op(mut self, op: Symbol) -> Self {
        self.unboxed_ops.insert(op);
        self
    }

    pub fn with_max_fn_params(mut self, max: usize) -> Self {
        self.max_fn_params = max;
        self
    }

    pub fn is_unboxed_op(&self, var: &Symbol) -> bool {
        self.unboxed_ops.contains(var)
    }
}
