//! Node synthesis helpers.
//!
//! Synthesized nodes carry the empty span; they never point at user source.

use crate::*;

fn nospan() -> Span {
    0..0
}

pub fn name(sym: &str) -> Ident {
    Ident::new(sym, nospan())
}

pub fn label(name: &str) -> Label {
    Label {
        name: name.to_string(),
        span: nospan(),
    }
}

pub fn ident(sym: &str) -> Expr {
    Expr::Ident(name(sym))
}

pub fn int(v: i64) -> Expr {
    Expr::Lit(Lit {
        value: LitValue::Int(v),
        span: nospan(),
    })
}

pub fn boolean(v: bool) -> Expr {
    Expr::Lit(Lit {
        value: LitValue::Bool(v),
        span: nospan(),
    })
}

pub fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(MemberExpr {
        obj: Box::new(obj),
        prop: name(prop),
        span: nospan(),
    })
}

/// `c.state`, `c.locals.x` and friends: a member chain rooted at an identifier.
pub fn path(root: &str, props: &[&str]) -> Expr {
    props
        .iter()
        .fold(ident(root), |acc, prop| member(acc, prop))
}

pub fn call(callee: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        callee: Box::new(ident(callee)),
        args,
        span: nospan(),
    })
}

pub fn method_call(recv: Expr, method: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        callee: Box::new(member(recv, method)),
        args,
        span: nospan(),
    })
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Bin(BinExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span: nospan(),
    })
}

pub fn not(arg: Expr) -> Expr {
    Expr::Unary(UnaryExpr {
        op: UnaryOp::Not,
        arg: Box::new(paren(arg)),
        span: nospan(),
    })
}

pub fn paren(expr: Expr) -> Expr {
    match expr {
        // Atoms never need grouping.
        e @ (Expr::Lit(_) | Expr::Ident(_) | Expr::Paren(_) | Expr::Member(_) | Expr::Call(_)) => {
            e
        }
        e => Expr::Paren(ParenExpr {
            expr: Box::new(e),
            span: nospan(),
        }),
    }
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::ExprStmt(ExprStmt {
        expr,
        span: nospan(),
    })
}

pub fn let_stmt(sym: &str, init: Expr) -> Stmt {
    Stmt::Let(LetStmt {
        ident: name(sym),
        init,
        span: nospan(),
    })
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    Stmt::Assign(AssignStmt {
        target,
        value,
        span: nospan(),
    })
}

pub fn block(stmts: Vec<Stmt>) -> BlockStmt {
    BlockStmt {
        stmts,
        span: nospan(),
    }
}

pub fn block_stmt(stmts: Vec<Stmt>) -> Stmt {
    Stmt::Block(block(stmts))
}

pub fn if_then(test: Expr, cons: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        test,
        cons: block(cons),
        alt: None,
        span: nospan(),
    })
}

pub fn if_else(test: Expr, cons: Vec<Stmt>, alt: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        test,
        cons: block(cons),
        alt: Some(block(alt)),
        span: nospan(),
    })
}

pub fn ret() -> Stmt {
    Stmt::Return(ReturnStmt {
        arg: None,
        span: nospan(),
    })
}

pub fn loop_stmt(name: &str, body: Vec<Stmt>) -> Stmt {
    Stmt::Loop(LoopStmt {
        label: label(name),
        body: block(body),
        span: nospan(),
    })
}

pub fn break_stmt(name: &str) -> Stmt {
    Stmt::Break(BreakStmt {
        label: label(name),
        span: nospan(),
    })
}

/// Switch over `discriminant`; each case may match several codes.
pub fn switch(discriminant: Expr, cases: Vec<(Vec<i64>, Vec<Stmt>)>, default: Option<Vec<Stmt>>) -> Stmt {
    Stmt::Switch(SwitchStmt {
        discriminant,
        cases: cases
            .into_iter()
            .map(|(tests, body)| SwitchCase {
                tests,
                body: block(body),
                span: nospan(),
            })
            .collect(),
        default: default.map(block),
        span: nospan(),
    })
}
