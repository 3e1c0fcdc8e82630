//! Type annotation parsers
//!
//! Types are references (`&T`, `&mut T`) or names with optional generic
//! arguments (`Coroutine<int, int>`).

use super::common::{ident_parser, kw, sym, ws};
use chumsky::prelude::*;
use coro_ast::*;

pub fn type_parser() -> impl Parser<char, TypeExpr, Error = Simple<char>> + Clone {
    recursive(|ty| {
        let named = ident_parser()
            .then(
                ty.clone()
                    .separated_by(sym(","))
                    .at_least(1)
                    .delimited_by(sym("<"), sym(">"))
                    .or_not(),
            )
            .map_with_span(|(ident, args), span: Span| {
                TypeExpr::Named(NamedType {
                    ident,
                    args: args.unwrap_or_default(),
                    span,
                })
            });

        let reference = just('&')
            .ignore_then(ws())
            .ignore_then(kw("mut").or_not())
            .then(ty)
            .map_with_span(|(mutable, inner), span: Span| {
                TypeExpr::Ref(RefType {
                    mutable: mutable.is_some(),
                    inner: Box::new(inner),
                    span,
                })
            });

        reference.or(named)
    })
    .labelled("type")
}
