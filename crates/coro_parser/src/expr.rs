//! Expression parsers
//!
//! Precedence order (highest to lowest):
//! 1. Primary (literals, identifiers, parentheses) with postfix member
//!    access and calls
//! 2. Unary operators (`-`, `!`)
//! 3. Multiplicative (`*`, `/`, `%`)
//! 4. Additive (`+`, `-`)
//! 5. Comparison (`==`, `!=`, `<`, `<=`, `>`, `>=`)
//! 6. Logical and (`&&`)
//! 7. Logical or (`||`)
//!
//! All binary operators are left-associative.

use super::common::{ident_parser, literal_parser, sym};
use chumsky::prelude::*;
use coro_ast::*;

type BoxedExpr<'a> = BoxedParser<'a, char, Expr, Simple<char>>;

enum Postfix {
    Member(Ident),
    Call(Vec<Expr>, Span),
}

pub fn expr_parser() -> impl Parser<char, Expr, Error = Simple<char>> + Clone {
    recursive(|expr| {
        let paren = expr
            .clone()
            .delimited_by(sym("("), just(')'))
            .map_with_span(|e, span: Span| {
                Expr::Paren(ParenExpr {
                    expr: Box::new(e),
                    span,
                })
            })
            .then_ignore(super::common::ws());

        let primary = choice((literal_parser(), ident_parser().map(Expr::Ident), paren));

        let args = expr
            .clone()
            .separated_by(sym(","))
            .allow_trailing()
            .delimited_by(sym("("), just(')'))
            .map_with_span(|args, span: Span| Postfix::Call(args, span))
            .then_ignore(super::common::ws());

        let postfix = primary
            .then(
                choice((sym(".").ignore_then(ident_parser()).map(Postfix::Member), args))
                    .repeated(),
            )
            .foldl(|lhs, op| {
                let start = lhs.span().start;
                match op {
                    Postfix::Member(prop) => {
                        let span = start..prop.span.end;
                        Expr::Member(MemberExpr {
                            obj: Box::new(lhs),
                            prop,
                            span,
                        })
                    }
                    Postfix::Call(args, call_span) => Expr::Call(CallExpr {
                        callee: Box::new(lhs),
                        args,
                        span: start..call_span.end,
                    }),
                }
            })
            .boxed();

        let unary = choice((
            sym("-").to(UnaryOp::Minus),
            sym("!").to(UnaryOp::Not),
        ))
        .map_with_span(|op, span: Span| (op, span))
        .repeated()
        .then(postfix)
        .foldr(|(op, span), arg| {
            let end = arg.span().end;
            Expr::Unary(UnaryExpr {
                op,
                arg: Box::new(arg),
                span: span.start..end,
            })
        })
        .boxed();

        let product = binary_level(
            unary,
            choice((
                sym("*").to(BinaryOp::Mul),
                sym("/").to(BinaryOp::Div),
                sym("%").to(BinaryOp::Mod),
            )),
        );
        let sum = binary_level(
            product,
            choice((sym("+").to(BinaryOp::Plus), sym("-").to(BinaryOp::Minus))),
        );
        let comparison = binary_level(
            sum,
            choice((
                sym("==").to(BinaryOp::EqEq),
                sym("!=").to(BinaryOp::NotEq),
                sym("<=").to(BinaryOp::LtEq),
                sym(">=").to(BinaryOp::GtEq),
                sym("<").to(BinaryOp::Lt),
                sym(">").to(BinaryOp::Gt),
            )),
        );
        let and = binary_level(comparison, sym("&&").to(BinaryOp::And));
        binary_level(and, sym("||").to(BinaryOp::Or))
    })
    .labelled("expression")
}

/// One left-associative precedence level: `operand (op operand)*`.
fn binary_level<'a>(
    operand: BoxedExpr<'a>,
    op: impl Parser<char, BinaryOp, Error = Simple<char>> + Clone + 'a,
) -> BoxedExpr<'a> {
    operand
        .clone()
        .then(op.then(operand).repeated())
        .foldl(|left, (op, right)| {
            let span = left.span().start..right.span().end;
            Expr::Bin(BinExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            })
        })
        .boxed()
}
