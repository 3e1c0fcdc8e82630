//! Diagnostic reporting for the coroutine generator.
//!
//! Errors are printed rustc-style to stderr:
//!
//! ```text
//! error: begin() appears more than once in `ticker`
//!   --> ticker.coro:4:5
//!    4 |     c.begin();
//!      |     ^^^^^^^^^
//! help: call begin() once, as a top-level statement
//! ```
//!
//! Rendering and emission are separate so tests can inspect the text, and
//! emission can be silenced with [`suppress`].

use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};

use colored::Colorize;
use coro_ast::Span;
use coro_parser::ParseError;

use crate::transform::TransformError;

/// Number of live [`SuppressGuard`]s.
static SUPPRESSED: AtomicUsize = AtomicUsize::new(0);

/// A secondary location shown after the primary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub message: String,
    pub span: Span,
}

/// Structured diagnostic, decoupled from how it is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub file: Option<String>,
    /// Character range of the primary location in the source.
    pub span: Option<Span>,
    pub label: Option<Label>,
    pub note: Option<String>,
}

impl Diagnostic {
    pub fn simple(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            span: None,
            label: None,
            note: None,
        }
    }

    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            span: Some(span),
            ..Self::simple(message)
        }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(e: &ParseError) -> Self {
        let mut d = Diagnostic::with_span(&e.message, e.span.clone());
        d.label = e.note.as_ref().map(|(message, span)| Label {
            message: message.clone(),
            span: span.clone(),
        });
        d
    }
}

impl From<&TransformError> for Diagnostic {
    fn from(e: &TransformError) -> Self {
        let mut d = Diagnostic::with_span(e.to_string(), e.span());
        d.note = e.note().map(str::to_string);
        d
    }
}

/// 1-based line and column of character `offset`. Offsets past the end map
/// to the position after the last character.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let (mut line, mut col) = (1, 1);
    for ch in source.chars().take(offset) {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Only the file name is shown, never the directories above it.
fn display_path(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}

fn render_snippet(out: &mut String, source: &str, span: &Span) {
    let (line_no, col) = line_col(source, span.start);
    let Some(line) = source.split('\n').nth(line_no - 1) else {
        return;
    };
    let line = line.trim_end_matches('\r');
    // Underline the span on its first line; at least one caret.
    let width = source
        .chars()
        .skip(span.start)
        .take(span.end.saturating_sub(span.start))
        .take_while(|c| *c != '\n')
        .count()
        .max(1);
    let _ = writeln!(out, "{:4} {} {}", line_no, "|".blue().bold(), line);
    let _ = writeln!(
        out,
        "     {} {}{}",
        "|".blue().bold(),
        " ".repeat(col - 1),
        "^".repeat(width).red().bold()
    );
}

/// Render `d` the way [`emit_diagnostic`] prints it.
pub fn render(d: &Diagnostic, source: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", "error".red().bold(), d.message.bold());

    match (&d.file, &d.span, source) {
        (Some(file), Some(span), Some(src)) => {
            let (line, col) = line_col(src, span.start);
            let _ = writeln!(out, "  {} {}:{}:{}", "-->".blue().bold(), display_path(file), line, col);
        }
        (Some(file), _, _) => {
            let _ = writeln!(out, "  {} {}", "-->".blue().bold(), display_path(file));
        }
        _ => {}
    }

    if let (Some(span), Some(src)) = (&d.span, source) {
        render_snippet(&mut out, src, span);
        if let Some(label) = &d.label {
            let (line, col) = line_col(src, label.span.start);
            let _ = writeln!(out, "{}: {} (line {}, column {})", "note".blue().bold(), label.message, line, col);
            render_snippet(&mut out, src, &label.span);
        }
    } else if let Some(label) = &d.label {
        let _ = writeln!(out, "{}: {}", "note".blue().bold(), label.message);
    }

    if let Some(note) = &d.note {
        let _ = writeln!(out, "{}: {}", "help".green().bold(), note);
    }
    out
}

/// Print `d` to stderr unless diagnostics are suppressed.
pub fn emit_diagnostic(d: &Diagnostic, source: Option<&str>) {
    if SUPPRESSED.load(Ordering::SeqCst) == 0 {
        eprint!("{}", render(d, source));
    }
}

/// Report every transform error of one file.
pub fn emit_transform_errors(errors: &[TransformError], file: &str, source: &str) {
    for e in errors {
        emit_diagnostic(&Diagnostic::from(e).in_file(file), Some(source));
    }
}

/// Silence diagnostics until the returned guard is dropped.
pub fn suppress() -> SuppressGuard {
    SUPPRESSED.fetch_add(1, Ordering::SeqCst);
    SuppressGuard { _private: () }
}

pub struct SuppressGuard {
    _private: (),
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        SUPPRESSED.fetch_sub(1, Ordering::SeqCst);
    }
}
