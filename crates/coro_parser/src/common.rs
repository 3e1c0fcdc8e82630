//! Common parsing utilities
//!
//! Tokens consume the whitespace and `//` comments that follow them, so
//! spans start at the first character of a construct. The module parser
//! skips leading whitespace once.

use chumsky::prelude::*;
use coro_ast::*;

/// Words that cannot be used as identifiers.
pub const KEYWORDS: &[&str] = &[
    "fn", "let", "if", "else", "for", "while", "loop", "break", "continue", "switch", "case",
    "default", "return", "true", "false",
];

/// Whitespace and line comments.
pub fn ws() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    let comment = just("//")
        .then(filter(|c: &char| *c != '\n').repeated())
        .ignored();
    filter(|c: &char| c.is_whitespace())
        .ignored()
        .or(comment)
        .repeated()
        .ignored()
}

/// A punctuation token.
pub fn sym(s: &'static str) -> impl Parser<char, &'static str, Error = Simple<char>> + Clone {
    just(s).then_ignore(ws())
}

/// A keyword; does not match identifiers that merely start with it.
pub fn kw(word: &'static str) -> impl Parser<char, (), Error = Simple<char>> + Clone {
    text::keyword(word).then_ignore(ws())
}

/// Parser for identifiers.
pub fn ident_parser() -> impl Parser<char, Ident, Error = Simple<char>> + Clone {
    text::ident()
        .try_map(|sym: String, span: Span| {
            if KEYWORDS.contains(&sym.as_str()) {
                Err(Simple::custom(
                    span,
                    format!("expected identifier, found keyword `{}`", sym),
                ))
            } else {
                Ok(sym)
            }
        })
        .map_with_span(|sym, span: Span| Ident { sym, span })
        .then_ignore(ws())
        .labelled("identifier")
}

/// Parser for loop labels: `'name`.
pub fn label_parser() -> impl Parser<char, Label, Error = Simple<char>> + Clone {
    just('\'')
        .ignore_then(text::ident())
        .map_with_span(|name, span: Span| Label { name, span })
        .then_ignore(ws())
        .labelled("label")
}

/// Signed integer literal, as used in `case` lists.
pub fn int_parser() -> impl Parser<char, i64, Error = Simple<char>> + Clone {
    just('-')
        .or_not()
        .then(text::int(10))
        .try_map(|(neg, digits): (Option<char>, String), span: Span| {
            let text = if neg.is_some() {
                format!("-{}", digits)
            } else {
                digits
            };
            text.parse::<i64>()
                .map_err(|e| Simple::custom(span, format!("invalid integer literal: {}", e)))
        })
        .then_ignore(ws())
}

/// Parser for literals (integers, strings, booleans).
pub fn literal_parser() -> impl Parser<char, Expr, Error = Simple<char>> + Clone {
    let escape = just('\\').ignore_then(choice((
        just('"').to('"'),
        just('\\').to('\\'),
        just('n').to('\n'),
        just('t').to('\t'),
    )));

    let string = just('"')
        .ignore_then(
            filter(|c: &char| *c != '"' && *c != '\\')
                .or(escape)
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'))
        .map(LitValue::Str);

    let int = text::int(10).try_map(|digits: String, span: Span| {
        digits
            .parse::<i64>()
            .map(LitValue::Int)
            .map_err(|e| Simple::custom(span, format!("invalid integer literal: {}", e)))
    });

    let boolean = choice((
        text::keyword("true").to(LitValue::Bool(true)),
        text::keyword("false").to(LitValue::Bool(false)),
    ));

    choice((string, int, boolean))
        .map_with_span(|value, span: Span| Expr::Lit(Lit { value, span }))
        .then_ignore(ws())
        .labelled("literal")
}

/// Parser for a block statement (statements in braces).
pub fn block_parser(
    stmt: impl Parser<char, Stmt, Error = Simple<char>> + Clone,
) -> impl Parser<char, BlockStmt, Error = Simple<char>> + Clone {
    stmt.repeated()
        .collect::<Vec<_>>()
        .delimited_by(sym("{"), just('}'))
        .map_with_span(|stmts, span: Span| BlockStmt { stmts, span })
        .then_ignore(ws())
}
