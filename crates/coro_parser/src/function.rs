//! Function-related parsers

use super::common::{block_parser, ident_parser, kw, sym};
use super::stmt::stmt_parser;
use super::types::type_parser;
use chumsky::prelude::*;
use coro_ast::*;

/// Parameters follow the pattern: `ident: type`
pub fn param_parser() -> impl Parser<char, Param, Error = Simple<char>> + Clone {
    ident_parser()
        .then_ignore(sym(":"))
        .then(type_parser())
        .map_with_span(|(ident, ty), span: Span| Param { ident, ty, span })
}

/// Pattern: `(param1, param2, ...)`
pub fn param_list_parser() -> impl Parser<char, Vec<Param>, Error = Simple<char>> + Clone {
    param_parser()
        .separated_by(sym(","))
        .allow_trailing()
        .delimited_by(sym("("), sym(")"))
}

/// Parser for function declarations.
///
/// Pattern: `fn name(params) -> type? { body }`
pub fn fn_decl_parser() -> impl Parser<char, FnDecl, Error = Simple<char>> + Clone {
    kw("fn")
        .ignore_then(ident_parser())
        .then(param_list_parser())
        .then(sym("->").ignore_then(type_parser()).or_not())
        .then(block_parser(stmt_parser()))
        .map_with_span(|(((ident, params), return_type), body), span: Span| FnDecl {
            ident,
            params,
            return_type,
            body,
            span,
        })
        .labelled("function")
}
