//! Statement and expression evaluation.

use std::collections::HashMap;
use std::rc::Rc;

use coro_ast::*;
use coro_runtime::{CoroutineRef, Value};

use super::{EvalError, Program, builtins};

type Result<T> = std::result::Result<T, EvalError>;

/// How a statement finished.
enum Flow {
    Normal,
    Return(Value),
    Break(String),
    Continue(String),
}

/// One function activation: lexical scopes over a loaded program.
pub struct Evaluator<'p> {
    program: &'p Rc<Program>,
    scopes: Vec<HashMap<String, Value>>,
}

impl<'p> Evaluator<'p> {
    pub fn new(program: &'p Rc<Program>) -> Self {
        Self {
            program,
            scopes: vec![HashMap::new()],
        }
    }

    pub(super) fn program(&self) -> &'p Rc<Program> {
        self.program
    }

    /// Bind `args` to the parameters of `func` and run its body.
    pub fn call(mut self, func: &FnDecl, args: Vec<Value>) -> Result<Value> {
        if func.params.len() != args.len() {
            return Err(EvalError::Arity {
                function: func.ident.sym.clone(),
                expected: func.params.len().to_string(),
                got: args.len(),
            });
        }
        for (param, arg) in func.params.iter().zip(args) {
            self.declare(&param.ident.sym, arg);
        }
        match self.block(&func.body)? {
            Flow::Normal => Ok(Value::Unit),
            Flow::Return(v) => Ok(v),
            Flow::Break(label) | Flow::Continue(label) => Err(EvalError::UnknownLabel(label)),
        }
    }

    fn declare(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.scopes.push(HashMap::new());
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn block(&mut self, block: &BlockStmt) -> Result<Flow> {
        self.scoped(|ev| ev.stmts(&block.stmts))
    }

    fn stmts(&mut self, stmts: &[Stmt]) -> Result<Flow> {
        for stmt in stmts {
            match self.stmt(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Let(s) => {
                let value = self.expr(&s.init)?;
                self.declare(&s.ident.sym, value);
            }
            Stmt::Assign(s) => {
                let value = self.expr(&s.value)?;
                self.assign(&s.target, value)?;
            }
            Stmt::ExprStmt(s) => {
                self.expr(&s.expr)?;
            }
            Stmt::If(s) => {
                if self.condition(&s.test)? {
                    return self.block(&s.cons);
                } else if let Some(alt) = &s.alt {
                    return self.block(alt);
                }
            }
            Stmt::For(s) => return self.scoped(|ev| ev.for_loop(s)),
            Stmt::Block(b) => return self.block(b),
            Stmt::Return(s) => {
                let value = match &s.arg {
                    Some(e) => self.expr(e)?,
                    None => Value::Unit,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Switch(s) => {
                let disc = self.int(&s.discriminant)?;
                let body = s
                    .cases
                    .iter()
                    .find(|c| c.tests.contains(&disc))
                    .map(|c| &c.body)
                    .or(s.default.as_ref());
                if let Some(body) = body {
                    return self.block(body);
                }
            }
            Stmt::Loop(s) => loop {
                match self.block(&s.body)? {
                    Flow::Break(label) if label == s.label.name => return Ok(Flow::Normal),
                    Flow::Continue(label) if label == s.label.name => {}
                    Flow::Normal => {}
                    flow => return Ok(flow),
                }
            },
            Stmt::Break(s) => return Ok(Flow::Break(s.label.name.clone())),
            Stmt::Continue(s) => return Ok(Flow::Continue(s.label.name.clone())),
        }
        Ok(Flow::Normal)
    }

    fn for_loop(&mut self, s: &ForStmt) -> Result<Flow> {
        if let Some(init) = &s.init {
            self.stmt(init)?;
        }
        loop {
            if let Some(test) = &s.test
                && !self.condition(test)?
            {
                return Ok(Flow::Normal);
            }
            match self.block(&s.body)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
            if let Some(update) = &s.update {
                self.stmt(update)?;
            }
        }
    }

    fn assign(&mut self, target: &Expr, value: Value) -> Result<()> {
        match target {
            Expr::Ident(i) => {
                let slot = self
                    .scopes
                    .iter_mut()
                    .rev()
                    .find_map(|s| s.get_mut(&i.sym))
                    .ok_or_else(|| EvalError::UndefinedVariable(i.sym.clone()))?;
                *slot = value;
                Ok(())
            }
            Expr::Member(m) => {
                let obj = self.expr(&m.obj)?;
                set_field(obj, &m.prop.sym, value)
            }
            Expr::Paren(p) => self.assign(&p.expr, value),
            other => Err(EvalError::Type(format!(
                "cannot assign to `{}`",
                print::print_expr(other)
            ))),
        }
    }

    fn condition(&mut self, expr: &Expr) -> Result<bool> {
        let v = self.expr(expr)?;
        v.as_bool()
            .ok_or_else(|| EvalError::Type(format!("condition must be bool, found {}", v.type_name())))
    }

    fn int(&mut self, expr: &Expr) -> Result<i64> {
        let v = self.expr(expr)?;
        v.as_int()
            .ok_or_else(|| EvalError::Type(format!("expected int, found {}", v.type_name())))
    }

    pub(super) fn expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Lit(l) => Ok(match &l.value {
                LitValue::Int(v) => Value::Int(*v),
                LitValue::Str(s) => Value::Str(s.clone()),
                LitValue::Bool(b) => Value::Bool(*b),
            }),
            Expr::Ident(i) => match self.lookup(&i.sym) {
                Some(v) => Ok(v.clone()),
                None if i.sym == crate::transform::HAS_GEN => Ok(Value::Bool(self.program.has_gen())),
                None => Err(EvalError::UndefinedVariable(i.sym.clone())),
            },
            Expr::Unary(u) => {
                let v = self.expr(&u.arg)?;
                match (u.op, v) {
                    (UnaryOp::Minus, Value::Int(n)) => n.checked_neg().map(Value::Int).ok_or(EvalError::Overflow),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (op, v) => Err(EvalError::Type(format!(
                        "cannot apply `{}` to {}",
                        if op == UnaryOp::Minus { "-" } else { "!" },
                        v.type_name()
                    ))),
                }
            }
            Expr::Bin(b) => self.binary(b),
            Expr::Call(c) => self.call_expr(c),
            Expr::Member(m) => {
                let obj = self.expr(&m.obj)?;
                get_field(obj, &m.prop.sym)
            }
            Expr::Paren(p) => self.expr(&p.expr),
        }
    }

    fn binary(&mut self, b: &BinExpr) -> Result<Value> {
        match b.op {
            BinaryOp::And => {
                return Ok(Value::Bool(self.condition(&b.left)? && self.condition(&b.right)?));
            }
            BinaryOp::Or => {
                return Ok(Value::Bool(self.condition(&b.left)? || self.condition(&b.right)?));
            }
            _ => {}
        }
        let left = self.expr(&b.left)?;
        let right = self.expr(&b.right)?;
        match (b.op, left, right) {
            (BinaryOp::EqEq, l, r) => Ok(Value::Bool(l == r)),
            (BinaryOp::NotEq, l, r) => Ok(Value::Bool(l != r)),
            (BinaryOp::Plus, Value::Str(s), r) => Ok(Value::Str(format!("{}{}", s, r))),
            (op, Value::Int(l), Value::Int(r)) => arith(op, l, r),
            (op, l, r) => Err(EvalError::Type(format!(
                "cannot apply `{}` to {} and {}",
                op.as_str(),
                l.type_name(),
                r.type_name()
            ))),
        }
    }

    fn call_expr(&mut self, c: &CallExpr) -> Result<Value> {
        match &*c.callee {
            Expr::Member(m) => {
                let recv = self.expr(&m.obj)?;
                let args = self.args(&c.args)?;
                method_call(recv, &m.prop.sym, args)
            }
            Expr::Ident(name) => {
                let program = self.program;
                if let Some(func) = program.function(&name.sym) {
                    let args = self.args(&c.args)?;
                    return Evaluator::new(program).call(func, args);
                }
                builtins::call(self, &name.sym, &c.args)
                    .unwrap_or_else(|| Err(EvalError::UnknownFunction(name.sym.clone())))
            }
            other => Err(EvalError::Type(format!(
                "`{}` is not callable",
                print::print_expr(other)
            ))),
        }
    }

    pub(super) fn args(&mut self, args: &[Expr]) -> Result<Vec<Value>> {
        args.iter().map(|a| self.expr(a)).collect()
    }
}

fn arith(op: BinaryOp, l: i64, r: i64) -> Result<Value> {
    let checked = |v: Option<i64>| v.map(Value::Int).ok_or(EvalError::Overflow);
    match op {
        BinaryOp::Plus => checked(l.checked_add(r)),
        BinaryOp::Minus => checked(l.checked_sub(r)),
        BinaryOp::Mul => checked(l.checked_mul(r)),
        BinaryOp::Div if r == 0 => Err(EvalError::DivisionByZero),
        BinaryOp::Div => checked(l.checked_div(r)),
        BinaryOp::Mod if r == 0 => Err(EvalError::DivisionByZero),
        BinaryOp::Mod => checked(l.checked_rem(r)),
        BinaryOp::Lt => Ok(Value::Bool(l < r)),
        BinaryOp::LtEq => Ok(Value::Bool(l <= r)),
        BinaryOp::Gt => Ok(Value::Bool(l > r)),
        BinaryOp::GtEq => Ok(Value::Bool(l >= r)),
        BinaryOp::EqEq => Ok(Value::Bool(l == r)),
        BinaryOp::NotEq => Ok(Value::Bool(l != r)),
        BinaryOp::And | BinaryOp::Or => Err(EvalError::Type(format!(
            "cannot apply `{}` to int and int",
            op.as_str()
        ))),
    }
}

fn int_register(field: &str, value: &Value) -> Result<i64> {
    value
        .as_int()
        .ok_or_else(|| EvalError::Type(format!("`{}` must be an int, found {}", field, value.type_name())))
}

fn get_field(obj: Value, field: &str) -> Result<Value> {
    match obj {
        Value::Coroutine(co) => match field {
            "state" => Ok(Value::Int(co.with_regs(|r| r.state))),
            "sub_state" => Ok(Value::Int(co.with_regs(|r| r.sub_state))),
            "out" => Ok(co.output()),
            "input" => Ok(co.with_regs(|r| r.input.clone())),
            "locals" => Ok(Value::Locals(co)),
            "yielder" => Err(EvalError::WriteOnly(field.to_string())),
            _ => Err(EvalError::NoField {
                field: field.to_string(),
                ty: "coroutine",
            }),
        },
        Value::Locals(co) => co
            .with_regs(|r| r.locals.get(field).cloned())
            .ok_or_else(|| EvalError::UndefinedLocal {
                coroutine: co.name(),
                name: field.to_string(),
            }),
        other => Err(EvalError::NoField {
            field: field.to_string(),
            ty: other.type_name(),
        }),
    }
}

fn set_field(obj: Value, field: &str, value: Value) -> Result<()> {
    match obj {
        Value::Coroutine(co) => set_register(&co, field, value),
        Value::Locals(co) => {
            co.with_regs(|r| r.locals.insert(field.to_string(), value));
            Ok(())
        }
        other => Err(EvalError::NoField {
            field: field.to_string(),
            ty: other.type_name(),
        }),
    }
}

fn set_register(co: &CoroutineRef, field: &str, value: Value) -> Result<()> {
    match field {
        "state" => {
            let v = int_register(field, &value)?;
            co.with_regs(|r| r.state = v);
        }
        "sub_state" => {
            let v = int_register(field, &value)?;
            co.with_regs(|r| r.sub_state = v);
        }
        "out" => co.with_regs(|r| r.out = value),
        "input" => co.with_regs(|r| r.input = value),
        "yielder" => {
            let delegate = match value {
                Value::Unit => None,
                v => {
                    let ty = v.type_name();
                    Some(
                        v.into_yielder()
                            .ok_or_else(|| EvalError::Type(format!("cannot delegate to {}", ty)))?,
                    )
                }
            };
            co.with_regs(|r| r.yielder = delegate);
        }
        _ => {
            return Err(EvalError::NoField {
                field: field.to_string(),
                ty: "coroutine",
            });
        }
    }
    Ok(())
}

fn method_call(recv: Value, method: &str, mut args: Vec<Value>) -> Result<Value> {
    let co = match recv {
        Value::Coroutine(co) => co,
        other => {
            return Err(EvalError::NoField {
                field: method.to_string(),
                ty: other.type_name(),
            });
        }
    };
    match method {
        "begin" => coro_runtime::begin(&co)?,
        "yield" => coro_runtime::yield_(&co, args.pop())?,
        "yield_to" => coro_runtime::yield_to(&co, args.pop().unwrap_or_default())?,
        "yield_none" => coro_runtime::yield_none(&co)?,
        _ => {
            return Err(EvalError::NoField {
                field: method.to_string(),
                ty: "coroutine",
            });
        }
    }
    Ok(Value::Unit)
}
