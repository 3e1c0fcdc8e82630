//! Coro AST definitions
//!
//! This crate defines the abstract syntax tree (AST) for `.coro` sources.
//! It serves as the contract between the parser, the coroutine lowering pass
//! and the printer that writes generated modules back to disk.

pub mod build;
pub mod print;

use std::ops::Range;

/// Represents a source code span as a range of character offsets.
///
/// Nodes synthesized by the lowering pass carry the empty span `0..0`.
pub type Span = Range<usize>;

/// The top-level module AST node.
#[derive(Debug, Clone)]
pub struct Module {
    pub items: Vec<FnDecl>,
    /// Set for modules written by the code generator (`#![generated]`).
    pub generated: bool,
    pub span: Span,
}

impl Module {
    /// Look up a function declaration by name.
    pub fn function(&self, name: &str) -> Option<&FnDecl> {
        self.items.iter().find(|f| f.ident.sym == name)
    }
}

/// Function declaration.
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub ident: Ident,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub body: BlockStmt,
    pub span: Span,
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ident: Ident,
    pub ty: TypeExpr,
    pub span: Span,
}

/// Type expressions. Types are only inspected structurally; the
/// interpreter is dynamically typed.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named(NamedType),
    Ref(RefType),
}

/// Named type with optional generic arguments, e.g. `Coroutine<int, int>`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub ident: Ident,
    pub args: Vec<TypeExpr>,
    pub span: Span,
}

/// Reference type, e.g. `&mut Coroutine<int, int>`.
#[derive(Debug, Clone, PartialEq)]
pub struct RefType {
    pub mutable: bool,
    pub inner: Box<TypeExpr>,
    pub span: Span,
}

impl TypeExpr {
    /// Strip any number of reference layers.
    pub fn referent(&self) -> Option<&TypeExpr> {
        match self {
            TypeExpr::Ref(r) => Some(&r.inner),
            TypeExpr::Named(_) => None,
        }
    }

    /// Return the named type when this is `Name<..>`.
    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            TypeExpr::Named(n) => Some(n),
            TypeExpr::Ref(_) => None,
        }
    }
}

/// Identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub sym: String,
    pub span: Span,
}

impl Ident {
    pub fn new(sym: impl Into<String>, span: Span) -> Self {
        Self {
            sym: sym.into(),
            span,
        }
    }
}

/// Loop label, written `'name` in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub span: Span,
}

/// Statements in the AST.
#[derive(Debug, Clone)]
pub enum Stmt {
    Let(LetStmt),
    Assign(AssignStmt),
    ExprStmt(ExprStmt),
    If(IfStmt),
    For(ForStmt),
    Block(BlockStmt),
    Return(ReturnStmt),
    Switch(SwitchStmt),
    Loop(LoopStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
}

/// `let name = init;`
#[derive(Debug, Clone)]
pub struct LetStmt {
    pub ident: Ident,
    pub init: Expr,
    pub span: Span,
}

/// `target = value;` where target is an identifier or a member chain.
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub target: Expr,
    pub value: Expr,
    pub span: Span,
}

/// Expression statement.
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// If statement. `else if` chains are stored as an `alt` block holding a
/// single `if`.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub test: Expr,
    pub cons: BlockStmt,
    pub alt: Option<BlockStmt>,
    pub span: Span,
}

/// Bounded loop: `for init; test; update { body }`. `while` loops parse
/// into this form with no init and no update.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub test: Option<Expr>,
    pub update: Option<Box<Stmt>>,
    pub body: BlockStmt,
    pub span: Span,
}

/// Block statement.
#[derive(Debug, Clone, Default)]
pub struct BlockStmt {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Return statement.
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub arg: Option<Expr>,
    pub span: Span,
}

/// Integer switch without fallthrough.
#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
    pub default: Option<BlockStmt>,
    pub span: Span,
}

/// Switch case.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub tests: Vec<i64>,
    pub body: BlockStmt,
    pub span: Span,
}

/// Labeled infinite loop.
#[derive(Debug, Clone)]
pub struct LoopStmt {
    pub label: Label,
    pub body: BlockStmt,
    pub span: Span,
}

/// Break statement.
#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub label: Label,
    pub span: Span,
}

/// Continue statement.
#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub label: Label,
    pub span: Span,
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(s) => s.span.clone(),
            Stmt::Assign(s) => s.span.clone(),
            Stmt::ExprStmt(s) => s.span.clone(),
            Stmt::If(s) => s.span.clone(),
            Stmt::For(s) => s.span.clone(),
            Stmt::Block(s) => s.span.clone(),
            Stmt::Return(s) => s.span.clone(),
            Stmt::Switch(s) => s.span.clone(),
            Stmt::Loop(s) => s.span.clone(),
            Stmt::Break(s) => s.span.clone(),
            Stmt::Continue(s) => s.span.clone(),
        }
    }

    /// True for statements that own nested statement lists.
    pub fn is_block_like(&self) -> bool {
        matches!(
            self,
            Stmt::If(_) | Stmt::For(_) | Stmt::Block(_) | Stmt::Switch(_) | Stmt::Loop(_)
        )
    }

    /// Nested statement lists owned directly by this statement, in source
    /// order. Loop initializers and update steps are single statements and
    /// are not included.
    pub fn nested_blocks(&self) -> Vec<&BlockStmt> {
        match self {
            Stmt::If(s) => {
                let mut blocks = vec![&s.cons];
                if let Some(alt) = &s.alt {
                    blocks.push(alt);
                }
                blocks
            }
            Stmt::For(s) => vec![&s.body],
            Stmt::Block(b) => vec![b],
            Stmt::Switch(s) => {
                let mut blocks: Vec<&BlockStmt> = s.cases.iter().map(|c| &c.body).collect();
                if let Some(d) = &s.default {
                    blocks.push(d);
                }
                blocks
            }
            Stmt::Loop(s) => vec![&s.body],
            _ => Vec::new(),
        }
    }

    /// Expressions evaluated directly by this statement (not those inside
    /// nested blocks).
    pub fn direct_exprs(&self) -> Vec<&Expr> {
        match self {
            Stmt::Let(s) => vec![&s.init],
            Stmt::Assign(s) => vec![&s.target, &s.value],
            Stmt::ExprStmt(s) => vec![&s.expr],
            Stmt::If(s) => vec![&s.test],
            Stmt::For(s) => s.test.iter().collect(),
            Stmt::Return(s) => s.arg.iter().collect(),
            Stmt::Switch(s) => vec![&s.discriminant],
            Stmt::Block(_) | Stmt::Loop(_) | Stmt::Break(_) | Stmt::Continue(_) => Vec::new(),
        }
    }

    /// Loop header statements (`init` and `update`) of a `for` loop.
    pub fn header_stmts(&self) -> Vec<&Stmt> {
        match self {
            Stmt::For(s) => s.init.iter().chain(s.update.iter()).map(|b| &**b).collect(),
            _ => Vec::new(),
        }
    }
}

/// Expressions.
#[derive(Debug, Clone)]
pub enum Expr {
    Lit(Lit),
    Ident(Ident),
    Unary(UnaryExpr),
    Bin(BinExpr),
    Call(CallExpr),
    Member(MemberExpr),
    Paren(ParenExpr),
}

/// Literal.
#[derive(Debug, Clone)]
pub struct Lit {
    pub value: LitValue,
    pub span: Span,
}

/// Literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum LitValue {
    Int(i64),
    Str(String),
    Bool(bool),
}

/// Unary expression.
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub arg: Box<Expr>,
    pub span: Span,
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Not,
}

/// Binary expression.
#[derive(Debug, Clone)]
pub struct BinExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding power used by the printer; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::EqEq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => 3,
            BinaryOp::Plus | BinaryOp::Minus => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 5,
        }
    }
}

/// Call expression. Method calls are calls whose callee is a member
/// expression.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Member access `obj.prop`.
#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub obj: Box<Expr>,
    pub prop: Ident,
    pub span: Span,
}

/// Parenthesized expression.
#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Lit(l) => l.span.clone(),
            Expr::Ident(i) => i.span.clone(),
            Expr::Unary(u) => u.span.clone(),
            Expr::Bin(b) => b.span.clone(),
            Expr::Call(c) => c.span.clone(),
            Expr::Member(m) => m.span.clone(),
            Expr::Paren(p) => p.span.clone(),
        }
    }

    /// Identifier name if this is a bare identifier.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(i) => Some(&i.sym),
            _ => None,
        }
    }

    /// Split `recv.method(args)` into its parts.
    pub fn as_method_call(&self) -> Option<(&Expr, &Ident, &[Expr])> {
        match self {
            Expr::Call(call) => match &*call.callee {
                Expr::Member(m) => Some((&m.obj, &m.prop, &call.args)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Split `name(args)` into its parts.
    pub fn as_fn_call(&self) -> Option<(&Ident, &[Expr])> {
        match self {
            Expr::Call(call) => match &*call.callee {
                Expr::Ident(i) => Some((i, &call.args)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Visit this expression and every sub-expression, outermost first.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::Lit(_) | Expr::Ident(_) => {}
            Expr::Unary(u) => u.arg.walk(f),
            Expr::Bin(b) => {
                b.left.walk(f);
                b.right.walk(f);
            }
            Expr::Call(c) => {
                c.callee.walk(f);
                for a in &c.args {
                    a.walk(f);
                }
            }
            Expr::Member(m) => m.obj.walk(f),
            Expr::Paren(p) => p.expr.walk(f),
        }
    }
}
