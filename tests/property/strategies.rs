//! Proptest strategies for generating analyzer input as source text.

#![allow(dead_code)]

use proptest::prelude::*;

/// A local name that can't collide with core fns, macros or special forms
pub fn arb_local_name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}".prop_map(|s| format!("loc-{}", s))
}

/// Source text of a constant literal
///
/// Generates: integers, floats, strings, keywords, and flat vectors of
/// integers. Equal values often get the same text, so lifting tables
/// see duplicates.
pub fn arb_constant() -> impl Strategy<Value = String> {
    prop_oneof![
        // Small integer space so duplicates are common
        10 => (-5i64..5).prop_map(|n| n.to_string()),
        3 => (-5i64..5).prop_map(|n| format!("{}.5", n)),
        3 => "[a-c]{1,2}".prop_map(|s| format!("\"{}\"", s)),
        3 => "[a-c]{1,2}".prop_map(|s| format!(":{}", s)),
        2 => prop::collection::vec(0i64..3, 0..3).prop_map(|items| {
            let items: Vec<String> = items.iter().map(i64::to_string).collect();
            format!("[{}]", items.join(" "))
        }),
    ]
}

/// How a use site consumes a local
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Use {
    /// Operand of an unboxed fast-path op
    Unboxed,
    /// Passed to a general function
    Boxed,
}

impl Use {
    pub fn wrap(self, name: &str) -> String {
        match self {
            Use::Unboxed => format!("(inc {})", name),
            Use::Boxed => format!("(str {})", name),
        }
    }
}

pub fn arb_use() -> impl Strategy<Value = Use> {
    prop_oneof![Just(Use::Unboxed), Just(Use::Boxed)]
}

/// A form wrapped around an inner form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    // Keep the inner form in tail position
    DoLast,
    IfThen,
    IfElse,
    LetBody,
    CaseBranches,
    // Take it out of tail position
    DoFirst,
    CallArg,
    IfCond,
    LetInit,
    VectorItem,
}

impl Wrapper {
    pub fn wrap(self, inner: &str) -> String {
        match self {
            Wrapper::DoLast => format!("(do (str 1) {})", inner),
            Wrapper::IfThen => format!("(if true {} 0)", inner),
            Wrapper::IfElse => format!("(if false 0 {})", inner),
            Wrapper::LetBody => format!("(let* [t 1] {})", inner),
            Wrapper::CaseBranches => format!("(case* 1 0 0 {} {{1 {}}})", inner, inner),
            Wrapper::DoFirst => format!("(do {} 1)", inner),
            Wrapper::CallArg => format!("(str {})", inner),
            Wrapper::IfCond => format!("(if {} 1 2)", inner),
            Wrapper::LetInit => format!("(let* [t {}] t)", inner),
            Wrapper::VectorItem => format!("[{}]", inner),
        }
    }

    pub fn keeps_tail(self) -> bool {
        matches!(
            self,
            Wrapper::DoLast
                | Wrapper::IfThen
                | Wrapper::IfElse
                | Wrapper::LetBody
                | Wrapper::CaseBranches
        )
    }
}

pub fn arb_tail_wrapper() -> impl Strategy<Value = Wrapper> {
    prop_oneof![
        Just(Wrapper::DoLast),
        Just(Wrapper::IfThen),
        Just(Wrapper::IfElse),
        Just(Wrapper::LetBody),
        Just(Wrapper::CaseBranches),
    ]
}

pub fn arb_wrapper() -> impl Strategy<Value = Wrapper> {
    prop_oneof![
        3 => arb_tail_wrapper(),
        1 => Just(Wrapper::DoFirst),
        1 => Just(Wrapper::CallArg),
        1 => Just(Wrapper::IfCond),
        1 => Just(Wrapper::LetInit),
        1 => Just(Wrapper::VectorItem),
    ]
}
