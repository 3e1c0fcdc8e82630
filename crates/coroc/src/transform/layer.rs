//! Dispatch layers.
//!
//! A layer owns the statements of one block whose subtree holds a suspension
//! point. The statements are split into numbered pieces (starting at 1); a
//! resume code selects the piece to re-enter through the layer's pc variable.

use coro_ast::Stmt;
use coro_ast::build::{assign, bin, block_stmt, ident, if_then, int, let_stmt, switch};
use coro_ast::BinaryOp;

use coro_runtime::NO_RESUME;

use super::alloc::{PC_PREFIX, RESUME_VAR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Case {
    code: i64,
    piece: usize,
    /// The innermost owner clears `__resume` so later passes through nested
    /// layers start fresh.
    consume: bool,
}

#[derive(Debug)]
pub struct Layer {
    label: String,
    pieces: Vec<Vec<Stmt>>,
    cases: Vec<Case>,
}

impl Layer {
    pub fn new(label: String) -> Self {
        Self {
            label,
            pieces: vec![Vec::new()],
            cases: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pc_var(&self) -> String {
        format!("{}{}", PC_PREFIX, self.label)
    }

    pub fn push(&mut self, stmt: Stmt) {
        if let Some(piece) = self.pieces.last_mut() {
            piece.push(stmt);
        }
    }

    pub fn extend(&mut self, stmts: impl IntoIterator<Item = Stmt>) {
        for stmt in stmts {
            self.push(stmt);
        }
    }

    /// Open a new piece and return its number.
    pub fn start_piece(&mut self) -> usize {
        self.pieces.push(Vec::new());
        self.pieces.len()
    }

    /// Like [`Layer::start_piece`], but reuse the current piece while it is
    /// still empty.
    pub fn start_piece_unless_empty(&mut self) -> usize {
        match self.pieces.last() {
            Some(piece) if piece.is_empty() => self.pieces.len(),
            _ => self.start_piece(),
        }
    }

    pub fn add_case(&mut self, code: i64, piece: usize, consume: bool) {
        debug_assert!(self.cases.last().is_none_or(|c| c.code < code));
        self.cases.push(Case {
            code,
            piece,
            consume,
        });
    }

    /// Resume codes this layer can re-enter, in increasing order.
    pub fn codes(&self) -> Vec<i64> {
        self.cases.iter().map(|c| c.code).collect()
    }

    pub fn has_cases(&self) -> bool {
        !self.cases.is_empty()
    }

    /// `let __pc_<label> = 0; switch __resume { case k { __pc_<label> = p; } }`
    ///
    /// Consecutive codes selecting the same piece share one case. Empty for a
    /// layer that is never re-entered.
    pub fn dispatch(&self) -> Vec<Stmt> {
        if self.cases.is_empty() {
            return Vec::new();
        }
        let pc = self.pc_var();
        let mut out = vec![let_stmt(&pc, int(0))];

        let mut groups: Vec<(Vec<i64>, usize, bool)> = Vec::new();
        for case in &self.cases {
            match groups.last_mut() {
                Some((codes, piece, consume)) if *piece == case.piece && *consume == case.consume => {
                    codes.push(case.code)
                }
                _ => groups.push((vec![case.code], case.piece, case.consume)),
            }
        }

        let cases = groups
            .into_iter()
            .map(|(codes, piece, consume)| {
                let mut body = vec![assign(ident(&pc), int(piece as i64))];
                if consume {
                    body.push(assign(ident(RESUME_VAR), int(NO_RESUME)));
                }
                (codes, body)
            })
            .collect();
        out.push(switch(ident(RESUME_VAR), cases, None));
        out
    }

    /// The pieces, each gated by `if __pc_<label> <= i { .. }`. A layer that
    /// never needs re-entry emits its statements as they are.
    pub fn into_pieces(self) -> Vec<Stmt> {
        if self.cases.is_empty() {
            return self.pieces.into_iter().flatten().collect();
        }
        let pc = self.pc_var();
        self.pieces
            .into_iter()
            .enumerate()
            .filter(|(_, piece)| !piece.is_empty())
            .map(|(i, piece)| {
                if_then(bin(BinaryOp::LtEq, ident(&pc), int(i as i64 + 1)), piece)
            })
            .collect()
    }

    /// Dispatch followed by the gated pieces, as one block statement.
    pub fn into_block(self) -> Stmt {
        let mut stmts = self.dispatch();
        stmts.extend(self.into_pieces());
        block_stmt(stmts)
    }
}
