//! Source code context visualization for error messages
//!
//! Renders an [`Error`] against the source text it came from: the message,
//! the offending line with a caret, each note, the macro expansion stack and
//! the chain of causes.

use super::types::Error;
use crate::syntax::Span;

/// Format source context with line number and caret pointing to error column
///
/// ```text
///  5 | (+ x 1)
///    |    ^
/// ```
pub fn format_source_context(source: &str, span: &Span) -> String {
    if span.is_synthetic() {
        return String::new();
    }

    match extract_source_line(source, span.line as usize) {
        Some(line) => {
            let line_num_str = span.line.to_string();
            let padding = " ".repeat(line_num_str.len());
            format!(
                "{} | {}\n{} | {}\n",
                line_num_str,
                line,
                padding,
                highlight_column(&line, span.col as usize)
            )
        }
        None => String::new(),
    }
}

/// Extract a single line from source code by line number (1-based)
pub fn extract_source_line(source: &str, line_num: usize) -> Option<String> {
    if line_num == 0 {
        return None;
    }
    source.lines().nth(line_num - 1).map(|line| line.to_string())
}

/// Create a visual caret line pointing to a specific column (1-based)
pub fn highlight_column(line: &str, col: usize) -> String {
    if col == 0 {
        return "^".to_string();
    }

    let mut display_width = 0;
    for ch in line.chars() {
        if display_width >= col - 1 {
            break;
        }
        display_width += if ch == '\t' { 4 } else { 1 };
    }

    let mut caret = " ".repeat(display_width.min(col - 1));
    caret.push('^');
    caret
}

fn push_located(out: &mut String, label: &str, message: &str, span: &Span, source: &str) {
    if span.is_synthetic() {
        out.push_str(&format!("{}: {}\n", label, message));
    } else {
        out.push_str(&format!("{}: {} ({})\n", label, message, span));
    }
    out.push_str(&format_source_context(source, span));
}

/// Render a full report for `error`.
///
/// ```text
/// error[analyze/unresolved-symbol]: unable to resolve symbol 'y' (1:9)
/// 1 | (fn* [x] y)
///   |         ^
/// note: ...
///   expanded from (when a b) (1:1)
/// caused by runtime/failure: ...
/// ```
pub fn render(error: &Error, source: &str) -> String {
    let mut out = String::new();
    for (depth, err) in error.chain().enumerate() {
        let label = if depth == 0 {
            format!("error[{}]", err.kind)
        } else {
            format!("caused by {}", err.kind)
        };
        push_located(&mut out, &label, &err.message, &err.span, source);

        for note in &err.notes {
            push_located(&mut out, &note.severity.to_string(), &note.message, &note.span, source);
        }

        for form in err.expansions.iter().rev() {
            if form.span.is_synthetic() {
                out.push_str(&format!("  expanded from {}\n", form));
            } else {
                out.push_str(&format!("  expanded from {} ({})\n", form, form.span));
            }
        }
    }
    out
}
