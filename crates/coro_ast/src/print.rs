//! Source printer.
//!
//! Renders a [`Module`] back to `.coro` text that the parser accepts. Used to
//! write generated modules and to show lowered bodies in diagnostics.

use crate::*;

const INDENT: &str = "    ";

// Binding levels for operands of unary and postfix operators.
const UNARY: u8 = u8::MAX - 1;
const POSTFIX: u8 = u8::MAX;

/// Render a whole module.
pub fn print_module(module: &Module) -> String {
    let mut p = Printer::default();
    if module.generated {
        p.out.push_str("#![generated]\n\n");
    }
    for (i, f) in module.items.iter().enumerate() {
        if i > 0 {
            p.out.push('\n');
        }
        p.fn_decl(f);
    }
    p.out
}

/// Render a single function declaration.
pub fn print_fn(f: &FnDecl) -> String {
    let mut p = Printer::default();
    p.fn_decl(f);
    p.out
}

/// Render a single statement at indentation level zero.
pub fn print_stmt(stmt: &Stmt) -> String {
    let mut p = Printer::default();
    p.stmt(stmt);
    p.out
}

/// Render an expression.
pub fn print_expr(expr: &Expr) -> String {
    let mut s = String::new();
    expr_into(&mut s, expr);
    s
}

pub fn print_type(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Named(n) if n.args.is_empty() => n.ident.sym.clone(),
        TypeExpr::Named(n) => {
            let args: Vec<String> = n.args.iter().map(print_type).collect();
            format!("{}<{}>", n.ident.sym, args.join(", "))
        }
        TypeExpr::Ref(r) if r.mutable => format!("&mut {}", print_type(&r.inner)),
        TypeExpr::Ref(r) => format!("&{}", print_type(&r.inner)),
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn fn_decl(&mut self, f: &FnDecl) {
        let params: Vec<String> = f
            .params
            .iter()
            .map(|p| format!("{}: {}", p.ident.sym, print_type(&p.ty)))
            .collect();
        let ret = f
            .return_type
            .as_ref()
            .map(|t| format!(" -> {}", print_type(t)))
            .unwrap_or_default();
        self.line(&format!("fn {}({}){} {{", f.ident.sym, params.join(", "), ret));
        self.body(&f.body);
        self.line("}");
    }

    fn body(&mut self, block: &BlockStmt) {
        self.depth += 1;
        for s in &block.stmts {
            self.stmt(s);
        }
        self.depth -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let(_) | Stmt::Assign(_) | Stmt::ExprStmt(_) => {
                let text = format!("{};", simple(stmt));
                self.line(&text);
            }
            Stmt::If(s) => self.if_chain(s, "if"),
            Stmt::For(s) => {
                let head = match (&s.init, &s.test, &s.update) {
                    (None, Some(test), None) => format!("while {} {{", print_expr(test)),
                    (init, test, update) => format!(
                        "for {}; {}; {} {{",
                        init.as_deref().map(simple).unwrap_or_default(),
                        test.as_ref().map(print_expr).unwrap_or_default(),
                        update.as_deref().map(simple).unwrap_or_default(),
                    ),
                };
                self.line(&head);
                self.body(&s.body);
                self.line("}");
            }
            Stmt::Block(b) => {
                self.line("{");
                self.body(b);
                self.line("}");
            }
            Stmt::Return(r) => match &r.arg {
                Some(e) => self.line(&format!("return {};", print_expr(e))),
                None => self.line("return;"),
            },
            Stmt::Switch(s) => {
                self.line(&format!("switch {} {{", print_expr(&s.discriminant)));
                self.depth += 1;
                for case in &s.cases {
                    let tests: Vec<String> = case.tests.iter().map(|t| t.to_string()).collect();
                    self.line(&format!("case {} {{", tests.join(", ")));
                    self.body(&case.body);
                    self.line("}");
                }
                if let Some(d) = &s.default {
                    self.line("default {");
                    self.body(d);
                    self.line("}");
                }
                self.depth -= 1;
                self.line("}");
            }
            Stmt::Loop(l) => {
                self.line(&format!("loop '{} {{", l.label.name));
                self.body(&l.body);
                self.line("}");
            }
            Stmt::Break(b) => self.line(&format!("break '{};", b.label.name)),
            Stmt::Continue(c) => self.line(&format!("continue '{};", c.label.name)),
        }
    }

    fn if_chain(&mut self, s: &IfStmt, keyword: &str) {
        self.line(&format!("{} {} {{", keyword, print_expr(&s.test)));
        self.body(&s.cons);
        let mut alt = s.alt.as_ref();
        loop {
            match alt {
                None => {
                    self.line("}");
                    return;
                }
                Some(b) => match b.stmts.as_slice() {
                    [Stmt::If(inner)] => {
                        self.line(&format!("}} else if {} {{", print_expr(&inner.test)));
                        self.body(&inner.cons);
                        alt = inner.alt.as_ref();
                    }
                    _ => {
                        self.line("} else {");
                        self.body(b);
                        self.line("}");
                        return;
                    }
                },
            }
        }
    }
}

/// Statements allowed in a `for` header, rendered without the semicolon.
fn simple(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Let(l) => format!("let {} = {}", l.ident.sym, print_expr(&l.init)),
        Stmt::Assign(a) => format!("{} = {}", print_expr(&a.target), print_expr(&a.value)),
        Stmt::ExprStmt(e) => print_expr(&e.expr),
        other => print_stmt(other).trim_end().to_string(),
    }
}

fn expr_into(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Lit(l) => match &l.value {
            LitValue::Int(v) => out.push_str(&v.to_string()),
            LitValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            LitValue::Str(s) => {
                out.push('"');
                for ch in s.chars() {
                    match ch {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\t' => out.push_str("\\t"),
                        c => out.push(c),
                    }
                }
                out.push('"');
            }
        },
        Expr::Ident(i) => out.push_str(&i.sym),
        Expr::Unary(u) => {
            out.push(match u.op {
                UnaryOp::Minus => '-',
                UnaryOp::Not => '!',
            });
            operand(out, &u.arg, UNARY);
        }
        Expr::Bin(b) => {
            let prec = b.op.precedence();
            operand(out, &b.left, prec);
            out.push(' ');
            out.push_str(b.op.as_str());
            out.push(' ');
            // Operators are left-associative, so an equal-precedence right
            // operand needs grouping.
            operand(out, &b.right, prec + 1);
        }
        Expr::Call(c) => {
            operand(out, &c.callee, POSTFIX);
            out.push('(');
            for (i, a) in c.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                expr_into(out, a);
            }
            out.push(')');
        }
        Expr::Member(m) => {
            operand(out, &m.obj, POSTFIX);
            out.push('.');
            out.push_str(&m.prop.sym);
        }
        Expr::Paren(p) => {
            out.push('(');
            expr_into(out, &p.expr);
            out.push(')');
        }
    }
}

/// Print `expr`, adding parentheses when it binds looser than `min_prec`.
fn operand(out: &mut String, expr: &Expr, min_prec: u8) {
    let needs_parens = match expr {
        Expr::Bin(b) => b.op.precedence() < min_prec,
        Expr::Unary(_) => min_prec == POSTFIX,
        _ => false,
    };
    if needs_parens {
        out.push('(');
        expr_into(out, expr);
        out.push(')');
    } else {
        expr_into(out, expr);
    }
}
