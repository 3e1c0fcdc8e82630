//! Code emitter.
//!
//! Splits the body after `begin()` into top-level segments, lowers each one
//! into a depth-0 layer and assembles the single `switch c.state` dispatch.

use coro_ast::build::{
    assign, bin, block, call, expr_stmt, ident, if_then, int, let_stmt, name, path, ret, switch,
};
use coro_ast::{BinaryOp, FnDecl, Stmt};

use coro_runtime::{NO_RESUME, STATE_DONE};

use super::alloc::RESUME_VAR;
use super::hoist::{Hoister, finish};
use super::lower::{Lowerer, payload};
use super::scanner::{Scan, suspension_stmt};

/// Constant resolved at program load; true for generated modules.
pub const HAS_GEN: &str = "HAS_GEN";

/// A run of top-level statements and the suspension point ending it. The
/// last segment has no terminator.
struct Segment {
    stmts: Vec<Stmt>,
    terminator: Option<Stmt>,
}

fn split_segments(stmts: Vec<Stmt>, handle: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for stmt in stmts {
        if suspension_stmt(&stmt, handle).is_some() {
            segments.push(Segment {
                stmts: std::mem::take(&mut current),
                terminator: Some(stmt),
            });
        } else {
            current.push(stmt);
        }
    }
    segments.push(Segment {
        stmts: current,
        terminator: None,
    });
    segments
}

/// Build the resumable body for a scanned coroutine. `stmts` is the original
/// body without the feature-detection guard.
pub fn emit_body(scan: &Scan, mut stmts: Vec<Stmt>) -> Vec<Stmt> {
    let handle = scan.handle.as_str();
    let rest = stmts.split_off(scan.begin_index + 1);
    stmts.pop();
    let prelude = stmts;

    let rest = Hoister::new(handle).stmts(rest);

    let mut lowerer = Lowerer::new(handle);
    let segments = split_segments(rest, handle);
    let last = segments.len() - 1;
    let mut cases = Vec::with_capacity(segments.len());
    for (k, segment) in segments.into_iter().enumerate() {
        let state = k as i64;
        let layer = lowerer.lower_layer(segment.stmts, 0, state);
        let mut body = layer.dispatch();
        match segment.terminator {
            Some(term) => {
                body.extend(layer.into_pieces());
                body.push(assign(path(handle, &["state"]), int(state + 1)));
                body.push(assign(path(handle, &["sub_state"]), int(NO_RESUME)));
                if let Some(call) = suspension_stmt(&term, handle) {
                    body.extend(payload(handle, &call));
                }
                body.push(ret());
            }
            None => {
                debug_assert_eq!(k, last);
                body.extend(finish(handle));
                body.extend(layer.into_pieces());
            }
        }
        cases.push((vec![state], body));
    }

    let mut out = vec![if_then(
        bin(BinaryOp::EqEq, path(handle, &["state"]), int(STATE_DONE)),
        vec![ret()],
    )];
    out.extend(prelude);
    out.push(let_stmt(RESUME_VAR, path(handle, &["sub_state"])));
    let mut default = finish(handle);
    default.push(ret());
    out.push(switch(path(handle, &["state"]), cases, Some(default)));
    out
}

/// The generated sibling: same signature, lowered body.
pub fn generated_fn(func: &FnDecl, gen_name: &str, body: Vec<Stmt>) -> FnDecl {
    let mut ident = name(gen_name);
    ident.span = func.ident.span.clone();
    FnDecl {
        ident,
        params: func.params.clone(),
        return_type: func.return_type.clone(),
        body: block(body),
        span: func.span.clone(),
    }
}

/// `if HAS_GEN { <gen>(c); return; }`
pub fn guard(gen_name: &str, handle: &str) -> Stmt {
    if_then(
        ident(HAS_GEN),
        vec![expr_stmt(call(gen_name, vec![ident(handle)])), ret()],
    )
}

/// True for a guard inserted by an earlier run.
pub fn is_guard(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::If(s) if s.alt.is_none() && s.test.as_ident() == Some(HAS_GEN))
}
