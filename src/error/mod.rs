//! Diagnostics
//!
//! Every failure the analyzer can report is an [`Error`] value tagged with
//! an [`ErrorKind`]. Kinds carry stable `family/kind` identifiers so tools
//! can match on them without parsing messages.

mod builders;
pub mod formatting;
mod types;

pub use types::{AnalyzeResult, Error, ErrorFamily, ErrorKind, Note, Severity};
