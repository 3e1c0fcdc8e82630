//! Coro Parser
//!
//! A chumsky front-end for `.coro` sources. Produces a [`coro_ast::Module`].

#![type_length_limit = "2097152"]

mod common;
mod expr;
mod function;
mod parsed;
mod stmt;
mod types;

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use coro_ast::*;

pub use parsed::{ParseLimits, ParsedModule, parse_module_with_metadata, parse_with_limits};

/// A parse failure with the character span it refers to.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// Secondary note, e.g. where an unclosed delimiter was opened.
    pub note: Option<(String, Span)>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            note: None,
        }
    }

    fn with_note(mut self, note: impl Into<String>, span: Span) -> Self {
        self.note = Some((note.into(), span));
        self
    }
}

/// Parse a string into a Coro AST module.
pub fn parse_module(input: &str) -> Result<Module, ParseError> {
    parse_module_limited(input, ParseLimits::default().max_nesting)
}

pub(crate) fn parse_module_limited(input: &str, max_nesting: usize) -> Result<Module, ParseError> {
    // Delimiter problems produce much better messages than the parser's
    // "expected X" at the end of input, and deep nesting must be rejected
    // before the recursive descent runs.
    scan_delimiters(input, max_nesting)?;

    module_parser().parse(input).map_err(|errors| {
        // The furthest failure is the one the user needs to look at.
        match errors.into_iter().max_by_key(|e| e.span().start) {
            Some(err) => from_simple(&err),
            None => ParseError::new("parse error", 0..input.chars().count()),
        }
    })
}

/// Top-level module parser.
///
/// A module is an optional `#![generated]` attribute followed by function
/// declarations, terminated by end of input.
fn module_parser() -> impl Parser<char, Module, Error = Simple<char>> {
    common::ws()
        .ignore_then(common::sym("#![generated]").or_not())
        .then(function::fn_decl_parser().repeated())
        .then_ignore(end())
        .map_with_span(|(generated, items), span: Span| Module {
            items,
            generated: generated.is_some(),
            span,
        })
        .labelled("module")
}

fn from_simple(err: &Simple<char>) -> ParseError {
    let message = match err.reason() {
        SimpleReason::Custom(msg) => msg.clone(),
        SimpleReason::Unclosed { delimiter, .. } => format!("unclosed delimiter `{}`", delimiter),
        SimpleReason::Unexpected => {
            let found = err
                .found()
                .map(|c| format!("`{}`", c))
                .unwrap_or_else(|| "end of input".to_string());
            let mut expected: Vec<String> = err
                .expected()
                .map(|e| match e {
                    Some(c) => format!("`{}`", c),
                    None => "end of input".to_string(),
                })
                .collect();
            expected.sort();
            expected.dedup();
            match (err.label(), expected.len()) {
                (Some(label), _) => format!("expected {}, found {}", label, found),
                (None, 0) => format!("unexpected {}", found),
                (None, n) if n > 6 => format!(
                    "expected one of {}, ..., found {}",
                    expected[..6].join(", "),
                    found
                ),
                (None, _) => format!("expected {}, found {}", expected.join(" or "), found),
            }
        }
    };
    ParseError::new(message, err.span())
}

/// Scan for unbalanced delimiters and excessive nesting, skipping string
/// literals and line comments.
fn scan_delimiters(input: &str, max_nesting: usize) -> Result<(), ParseError> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = input.chars().enumerate().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '"' => {
                // Skip to the closing quote, honouring escapes.
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return Err(ParseError::new("unterminated string literal", pos..pos + 1));
                }
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' | '[' | '{' => {
                stack.push((ch, pos));
                if stack.len() > max_nesting {
                    return Err(ParseError::new(
                        format!("nesting too deep (limit: {} levels)", max_nesting),
                        pos..pos + 1,
                    ));
                }
            }
            ')' | ']' | '}' => {
                let opening = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == opening => {}
                    Some((open, open_pos)) => {
                        return Err(ParseError::new(
                            format!("mismatched closing delimiter `{}`", ch),
                            pos..pos + 1,
                        )
                        .with_note(format!("opened here with `{}`", open), open_pos..open_pos + 1));
                    }
                    None => {
                        return Err(ParseError::new(
                            format!("missing open `{}` for a `{}` delimiter", opening, ch),
                            pos..pos + 1,
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    let end = input.chars().count();
    match stack.last() {
        Some(&(open, open_pos)) => Err(ParseError::new(
            format!("unclosed delimiter `{}`", open),
            end..end,
        )
        .with_note("the last unmatched opening delimiter", open_pos..open_pos + 1)),
        None => Ok(()),
    }
}
