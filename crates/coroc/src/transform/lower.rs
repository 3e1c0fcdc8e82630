//! Recursive block lowering.
//!
//! Blocks are lowered bottom-up: a nested statement that holds a suspension
//! point is lowered into its own layer first, and the resume codes it owns
//! are then mapped by every enclosing layer to the piece holding it.

use coro_ast::build::{assign, bin, block, break_stmt, ident, if_then, int, loop_stmt, not, path, ret};
use coro_ast::{BinaryOp, Expr, ForStmt, IfStmt, Stmt};

use super::alloc::Allocator;
use super::layer::Layer;
use super::scanner::{Marker, MarkerCall, contains_suspension, suspension_stmt};

/// Statements that store the suspension payload: the output for `yield(v)`,
/// the delegate for `yield_to(e)`, nothing otherwise.
pub fn payload(handle: &str, call: &MarkerCall<'_>) -> Vec<Stmt> {
    match (call.marker, call.args) {
        (Marker::Yield, [value]) => vec![assign(path(handle, &["out"]), value.clone())],
        (Marker::YieldTo, [delegate]) => vec![assign(path(handle, &["yielder"]), delegate.clone())],
        _ => Vec::new(),
    }
}

pub struct Lowerer<'a> {
    pub handle: &'a str,
    pub alloc: Allocator,
}

impl<'a> Lowerer<'a> {
    pub fn new(handle: &'a str) -> Self {
        Self {
            handle,
            alloc: Allocator::new(),
        }
    }

    /// Lower `stmts` into a layer at `depth`. `segment` is the top-level
    /// state that nested suspension points resume into.
    pub fn lower_layer(&mut self, stmts: Vec<Stmt>, depth: usize, segment: i64) -> Layer {
        let mut layer = Layer::new(self.alloc.layer_label(depth));
        for stmt in stmts {
            if let Some(call) = suspension_stmt(&stmt, self.handle) {
                let code = self.alloc.resume_code();
                layer.extend(self.suspend(segment, code, &call));
                let piece = layer.start_piece();
                layer.add_case(code, piece, true);
            } else if contains_suspension(&stmt, self.handle) {
                let piece = layer.start_piece_unless_empty();
                let (lowered, codes) = self.lower_resumable(stmt, depth + 1, segment);
                layer.extend(lowered);
                for code in codes {
                    layer.add_case(code, piece, false);
                }
            } else {
                layer.push(stmt);
            }
        }
        layer
    }

    /// `c.state = segment; c.sub_state = code; <payload>; return;`
    fn suspend(&self, segment: i64, code: i64, call: &MarkerCall<'_>) -> Vec<Stmt> {
        let mut out = vec![
            assign(path(self.handle, &["state"]), int(segment)),
            assign(path(self.handle, &["sub_state"]), int(code)),
        ];
        out.extend(payload(self.handle, call));
        out.push(ret());
        out
    }

    /// Lower a statement whose subtree holds a suspension point. Returns the
    /// replacement statements and the resume codes they own.
    fn lower_resumable(&mut self, stmt: Stmt, depth: usize, segment: i64) -> (Vec<Stmt>, Vec<i64>) {
        match stmt {
            Stmt::Block(b) => {
                let layer = self.lower_layer(b.stmts, depth, segment);
                let codes = layer.codes();
                (vec![layer.into_block()], codes)
            }
            Stmt::If(s) => self.lower_if(s, depth, segment),
            Stmt::For(f) => self.lower_for(f, depth, segment),
            // Suspension inside `switch` or `loop` is rejected by the scanner.
            other => (vec![other], Vec::new()),
        }
    }

    fn lower_if(&mut self, s: IfStmt, depth: usize, segment: i64) -> (Vec<Stmt>, Vec<i64>) {
        let handle = self.handle;
        let resumable = |b: &coro_ast::BlockStmt| b.stmts.iter().any(|st| contains_suspension(st, handle));

        let cons = if resumable(&s.cons) {
            Ok(self.lower_layer(s.cons.stmts, depth, segment))
        } else {
            Err(s.cons)
        };
        let alt = match s.alt {
            Some(alt) if resumable(&alt) => Some(Ok(self.lower_layer(alt.stmts, depth, segment))),
            Some(alt) => Some(Err(alt)),
            None => None,
        };

        let mut out = Vec::new();
        let mut codes = Vec::new();
        let mut test = s.test;
        let cons_pc = cons.as_ref().ok().map(|l| l.pc_var());
        let alt_pc = alt.as_ref().and_then(|a| a.as_ref().ok()).map(|l| l.pc_var());

        // Dispatch both branches before the test so a resumed entry picks its
        // branch without re-evaluating the condition.
        for layer in [cons.as_ref().ok(), alt.as_ref().and_then(|a| a.as_ref().ok())]
            .into_iter()
            .flatten()
        {
            out.extend(layer.dispatch());
            codes.extend(layer.codes());
        }
        if let Some(pc) = &alt_pc {
            test = bin(BinaryOp::And, fresh(pc), test);
        }
        if let Some(pc) = &cons_pc {
            test = bin(BinaryOp::Or, bin(BinaryOp::Gt, ident(pc), int(0)), test);
        }

        let cons = match cons {
            Ok(layer) => block(layer.into_pieces()),
            Err(b) => b,
        };
        let alt = alt.map(|a| match a {
            Ok(layer) => block(layer.into_pieces()),
            Err(b) => b,
        });
        out.push(Stmt::If(IfStmt {
            test,
            cons,
            alt,
            span: s.span,
        }));
        (out, codes)
    }

    fn lower_for(&mut self, f: ForStmt, depth: usize, segment: i64) -> (Vec<Stmt>, Vec<i64>) {
        let layer = self.lower_layer(f.body.stmts, depth, segment);
        let pc = layer.pc_var();
        let label = layer.label().to_string();
        let codes = layer.codes();

        let mut out = layer.dispatch();
        if let Some(init) = f.init {
            out.push(if_then(fresh(&pc), vec![*init]));
        }

        let mut body = Vec::new();
        if let Some(test) = f.test {
            body.push(if_then(
                fresh(&pc),
                vec![if_then(not(test), vec![break_stmt(&label)])],
            ));
        }
        body.extend(layer.into_pieces());
        body.push(assign(ident(&pc), int(0)));
        if let Some(update) = f.update {
            body.push(*update);
        }
        out.push(loop_stmt(&label, body));
        (out, codes)
    }
}

/// `__pc_<label> == 0`: the layer was entered fresh.
fn fresh(pc: &str) -> Expr {
    bin(BinaryOp::EqEq, ident(pc), int(0))
}
