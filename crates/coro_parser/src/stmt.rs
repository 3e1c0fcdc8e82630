//! Statement parsers
//!
//! `stmt_parser` is the main dispatcher; the keyword-led statements are tried
//! before the assignment/expression fallback.

use super::common::{block_parser, ident_parser, int_parser, kw, label_parser, sym};
use super::expr::expr_parser;
use chumsky::prelude::*;
use coro_ast::*;

/// Parser for statements.
pub fn stmt_parser() -> impl Parser<char, Stmt, Error = Simple<char>> + Clone {
    recursive(|stmt| {
        let block = block_parser(stmt).boxed();
        let simple = simple_stmt_parser().boxed();

        choice((
            if_stmt_parser(block.clone()).map(Stmt::If),
            for_stmt_parser(simple.clone(), block.clone()).map(Stmt::For),
            while_stmt_parser(block.clone()).map(Stmt::For),
            loop_stmt_parser(block.clone()).map(Stmt::Loop),
            break_stmt_parser().map(Stmt::Break),
            continue_stmt_parser().map(Stmt::Continue),
            switch_stmt_parser(block.clone()).map(Stmt::Switch),
            return_stmt_parser().map(Stmt::Return),
            block.map(Stmt::Block),
            simple.then_ignore(sym(";")),
        ))
    })
    .labelled("statement")
}

/// Statements that may appear in a `for` header: `let`, assignment or a
/// bare expression, without the trailing semicolon.
pub fn simple_stmt_parser() -> impl Parser<char, Stmt, Error = Simple<char>> + Clone {
    let let_stmt = kw("let")
        .ignore_then(ident_parser())
        .then_ignore(sym("="))
        .then(expr_parser())
        .map_with_span(|(ident, init), span: Span| Stmt::Let(LetStmt { ident, init, span }));

    let assign_or_expr = expr_parser()
        .then(sym("=").ignore_then(expr_parser()).or_not())
        .try_map(|(lhs, rhs), span: Span| match rhs {
            None => Ok(Stmt::ExprStmt(ExprStmt { expr: lhs, span })),
            Some(value) => match lhs {
                Expr::Ident(_) | Expr::Member(_) => Ok(Stmt::Assign(AssignStmt {
                    target: lhs,
                    value,
                    span,
                })),
                other => Err(Simple::custom(
                    other.span(),
                    "invalid assignment target; expected a name or a field",
                )),
            },
        });

    let_stmt.or(assign_or_expr)
}

/// Pattern: `if test { .. } else if test { .. } else { .. }`
pub fn if_stmt_parser<'a>(
    block: BoxedParser<'a, char, BlockStmt, Simple<char>>,
) -> impl Parser<char, IfStmt, Error = Simple<char>> + Clone + 'a {
    recursive(move |if_stmt| {
        let else_if = if_stmt.map(|s: IfStmt| {
            let span = s.span.clone();
            BlockStmt {
                stmts: vec![Stmt::If(s)],
                span,
            }
        });
        kw("if")
            .ignore_then(expr_parser())
            .then(block.clone())
            .then(kw("else").ignore_then(else_if.or(block.clone())).or_not())
            .map_with_span(|((test, cons), alt), span: Span| IfStmt {
                test,
                cons,
                alt,
                span,
            })
    })
}

/// Pattern: `for init?; test?; update? { .. }`
pub fn for_stmt_parser<'a>(
    simple: BoxedParser<'a, char, Stmt, Simple<char>>,
    block: BoxedParser<'a, char, BlockStmt, Simple<char>>,
) -> impl Parser<char, ForStmt, Error = Simple<char>> + Clone + 'a {
    kw("for")
        .ignore_then(simple.clone().or_not())
        .then_ignore(sym(";"))
        .then(expr_parser().or_not())
        .then_ignore(sym(";"))
        .then(simple.or_not())
        .then(block)
        .map_with_span(|(((init, test), update), body), span: Span| ForStmt {
            init: init.map(Box::new),
            test,
            update: update.map(Box::new),
            body,
            span,
        })
}

/// Pattern: `while test { .. }`, stored as a `for` without header statements.
pub fn while_stmt_parser<'a>(
    block: BoxedParser<'a, char, BlockStmt, Simple<char>>,
) -> impl Parser<char, ForStmt, Error = Simple<char>> + Clone + 'a {
    kw("while")
        .ignore_then(expr_parser())
        .then(block)
        .map_with_span(|(test, body), span: Span| ForStmt {
            init: None,
            test: Some(test),
            update: None,
            body,
            span,
        })
}

/// Pattern: `loop 'label { .. }`
pub fn loop_stmt_parser<'a>(
    block: BoxedParser<'a, char, BlockStmt, Simple<char>>,
) -> impl Parser<char, LoopStmt, Error = Simple<char>> + Clone + 'a {
    kw("loop")
        .ignore_then(label_parser())
        .then(block)
        .map_with_span(|(label, body), span: Span| LoopStmt { label, body, span })
}

pub fn break_stmt_parser() -> impl Parser<char, BreakStmt, Error = Simple<char>> + Clone {
    kw("break")
        .ignore_then(label_parser())
        .then_ignore(sym(";"))
        .map_with_span(|label, span: Span| BreakStmt { label, span })
}

pub fn continue_stmt_parser() -> impl Parser<char, ContinueStmt, Error = Simple<char>> + Clone {
    kw("continue")
        .ignore_then(label_parser())
        .then_ignore(sym(";"))
        .map_with_span(|label, span: Span| ContinueStmt { label, span })
}

/// Pattern: `switch expr { case 1, 2 { .. } default { .. } }`
pub fn switch_stmt_parser<'a>(
    block: BoxedParser<'a, char, BlockStmt, Simple<char>>,
) -> impl Parser<char, SwitchStmt, Error = Simple<char>> + Clone + 'a {
    let case = kw("case")
        .ignore_then(int_parser().separated_by(sym(",")).at_least(1))
        .then(block.clone())
        .map_with_span(|(tests, body), span: Span| SwitchCase { tests, body, span });

    let default = kw("default").ignore_then(block);

    kw("switch")
        .ignore_then(expr_parser())
        .then(
            case.repeated()
                .then(default.or_not())
                .delimited_by(sym("{"), sym("}")),
        )
        .map_with_span(|(discriminant, (cases, default)), span: Span| SwitchStmt {
            discriminant,
            cases,
            default,
            span,
        })
}

pub fn return_stmt_parser() -> impl Parser<char, ReturnStmt, Error = Simple<char>> + Clone {
    kw("return")
        .ignore_then(expr_parser().or_not())
        .then_ignore(sym(";"))
        .map_with_span(|arg, span: Span| ReturnStmt { arg, span })
}
