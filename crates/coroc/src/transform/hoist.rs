//! Frame hoisting.
//!
//! Locals bound after `begin()` must survive across ticks, so they move into
//! the coroutine's `locals` frame. `return;` must also leave the coroutine in
//! the finished state.
//!
//! Every `let` gets its own frame slot. The first binding of `x` keeps the
//! name `x` and later ones become `x_1`, `x_2` and so on, so shadowing in an
//! inner block never clobbers the outer variable. Uses are resolved against
//! the enclosing block scopes; a name with no binding after `begin()` refers
//! to a prelude local or a parameter and is left alone.

use std::collections::{BTreeSet, HashMap};

use coro_ast::build::{assign, int, path};
use coro_ast::*;

use coro_runtime::{NO_RESUME, STATE_DONE};

/// Statements that mark the coroutine finished: `c.state = -1; c.sub_state = -1;`.
pub fn finish(handle: &str) -> Vec<Stmt> {
    vec![
        assign(path(handle, &["state"]), int(STATE_DONE)),
        assign(path(handle, &["sub_state"]), int(NO_RESUME)),
    ]
}

pub struct Hoister<'a> {
    handle: &'a str,
    /// Source name to frame slot, one map per open block.
    scopes: Vec<HashMap<String, String>>,
    slots: BTreeSet<String>,
}

impl<'a> Hoister<'a> {
    pub fn new(handle: &'a str) -> Self {
        Self {
            handle,
            scopes: vec![HashMap::new()],
            slots: BTreeSet::new(),
        }
    }

    /// Frame slots handed out so far.
    pub fn slots(&self) -> &BTreeSet<String> {
        &self.slots
    }

    pub fn stmts(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        stmts.into_iter().flat_map(|s| self.stmt(s)).collect()
    }

    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push(HashMap::new());
        let out = f(self);
        self.scopes.pop();
        out
    }

    fn block(&mut self, block: BlockStmt) -> BlockStmt {
        self.scoped(|h| BlockStmt {
            stmts: h.stmts(block.stmts),
            span: block.span,
        })
    }

    fn single(&mut self, stmt: Stmt) -> Stmt {
        let mut out = self.stmt(stmt);
        match out.len() {
            1 => out.remove(0),
            _ => Stmt::Block(BlockStmt {
                stmts: out,
                span: 0..0,
            }),
        }
    }

    /// Bind `name` in the innermost scope to a slot no other binding uses.
    fn declare(&mut self, name: &str) -> String {
        let mut slot = name.to_string();
        let mut n = 0;
        while self.slots.contains(&slot) {
            n += 1;
            slot = format!("{}_{}", name, n);
        }
        self.slots.insert(slot.clone());
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), slot.clone());
        }
        slot
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        self.scopes.iter().rev().find_map(|s| s.get(name)).map(String::as_str)
    }

    fn stmt(&mut self, stmt: Stmt) -> Vec<Stmt> {
        let s = match stmt {
            Stmt::Let(l) => {
                // The initializer still sees the previous binding.
                let value = self.expr(l.init);
                let slot = self.declare(&l.ident.sym);
                Stmt::Assign(AssignStmt {
                    target: self.local(&slot),
                    value,
                    span: l.span,
                })
            }
            Stmt::Assign(a) => {
                let target = self.expr(a.target);
                Stmt::Assign(AssignStmt {
                    target,
                    value: self.expr(a.value),
                    span: a.span,
                })
            }
            Stmt::ExprStmt(e) => Stmt::ExprStmt(ExprStmt {
                expr: self.expr(e.expr),
                span: e.span,
            }),
            Stmt::If(s) => {
                let test = self.expr(s.test);
                let cons = self.block(s.cons);
                Stmt::If(IfStmt {
                    test,
                    cons,
                    alt: s.alt.map(|b| self.block(b)),
                    span: s.span,
                })
            }
            Stmt::For(f) => self.scoped(|h| {
                let init = f.init.map(|s| Box::new(h.single(*s)));
                let test = f.test.map(|e| h.expr(e));
                let body = h.block(f.body);
                let update = f.update.map(|s| Box::new(h.single(*s)));
                Stmt::For(ForStmt {
                    init,
                    test,
                    update,
                    body,
                    span: f.span,
                })
            }),
            Stmt::Block(b) => Stmt::Block(self.block(b)),
            Stmt::Return(r) => {
                let mut out = finish(self.handle);
                out.push(Stmt::Return(ReturnStmt {
                    arg: r.arg.map(|e| self.expr(e)),
                    span: r.span,
                }));
                return out;
            }
            Stmt::Switch(s) => {
                let discriminant = self.expr(s.discriminant);
                let cases = s
                    .cases
                    .into_iter()
                    .map(|c| SwitchCase {
                        tests: c.tests,
                        body: self.block(c.body),
                        span: c.span,
                    })
                    .collect();
                Stmt::Switch(SwitchStmt {
                    discriminant,
                    cases,
                    default: s.default.map(|b| self.block(b)),
                    span: s.span,
                })
            }
            Stmt::Loop(l) => Stmt::Loop(LoopStmt {
                label: l.label,
                body: self.block(l.body),
                span: l.span,
            }),
            s @ (Stmt::Break(_) | Stmt::Continue(_)) => s,
        };
        vec![s]
    }

    fn local(&self, name: &str) -> Expr {
        path(self.handle, &["locals", name])
    }

    fn expr(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Ident(i) => match self.resolve(&i.sym) {
                Some(slot) => {
                    let mut e = self.local(slot);
                    if let Expr::Member(m) = &mut e {
                        m.span = i.span;
                    }
                    e
                }
                None => Expr::Ident(i),
            },
            e @ Expr::Lit(_) => e,
            Expr::Unary(u) => Expr::Unary(UnaryExpr {
                op: u.op,
                arg: Box::new(self.expr(*u.arg)),
                span: u.span,
            }),
            Expr::Bin(b) => Expr::Bin(BinExpr {
                op: b.op,
                left: Box::new(self.expr(*b.left)),
                right: Box::new(self.expr(*b.right)),
                span: b.span,
            }),
            Expr::Call(c) => {
                // A bare callee names a function, never a local.
                let callee = match *c.callee {
                    callee @ Expr::Ident(_) => callee,
                    other => self.expr(other),
                };
                Expr::Call(CallExpr {
                    callee: Box::new(callee),
                    args: c.args.into_iter().map(|a| self.expr(a)).collect(),
                    span: c.span,
                })
            }
            Expr::Member(m) => Expr::Member(MemberExpr {
                obj: Box::new(self.expr(*m.obj)),
                prop: m.prop,
                span: m.span,
            }),
            Expr::Paren(p) => Expr::Paren(ParenExpr {
                expr: Box::new(self.expr(*p.expr)),
                span: p.span,
            }),
        }
    }
}
