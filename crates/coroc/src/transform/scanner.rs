//! Suspension point scanner.
//!
//! Classifies a function as a coroutine body and validates where its markers
//! sit before any lowering happens. Every problem in a function is collected
//! so a single run reports all of them.

use coro_ast::{Expr, FnDecl, Span, Stmt, TypeExpr};

use super::error::TransformError;

/// Name of the runtime type a coroutine handle parameter must reference.
pub const COROUTINE_TYPE: &str = "Coroutine";

/// Marker method calls recognised on the coroutine handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Begin,
    Yield,
    YieldTo,
    YieldNone,
}

impl Marker {
    pub fn from_method(name: &str) -> Option<Self> {
        match name {
            "begin" => Some(Marker::Begin),
            "yield" => Some(Marker::Yield),
            "yield_to" => Some(Marker::YieldTo),
            "yield_none" => Some(Marker::YieldNone),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Begin => "begin",
            Marker::Yield => "yield",
            Marker::YieldTo => "yield_to",
            Marker::YieldNone => "yield_none",
        }
    }

    pub fn is_suspension(self) -> bool {
        self != Marker::Begin
    }

    /// Accepted argument counts, with the wording used when they are violated.
    fn arity(self) -> (usize, usize, &'static str) {
        match self {
            Marker::Begin => (0, 0, "takes no arguments"),
            Marker::Yield => (0, 1, "takes at most one argument"),
            Marker::YieldTo => (1, 1, "takes exactly one argument"),
            Marker::YieldNone => (0, 0, "takes no arguments"),
        }
    }
}

/// A marker call used as a statement: `c.yield(v);`.
#[derive(Debug, Clone, Copy)]
pub struct MarkerCall<'a> {
    pub marker: Marker,
    pub args: &'a [Expr],
    pub span: &'a Span,
}

/// Outcome of scanning a coroutine body that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    /// Name of the handle parameter.
    pub handle: String,
    /// Index of the top-level `begin()` statement.
    pub begin_index: usize,
    /// Number of suspension points in the whole body.
    pub points: usize,
}

/// Handle parameter name if `func` has the coroutine shape: exactly one
/// parameter of type `&Coroutine<In, Out>` or `&mut Coroutine<In, Out>`.
pub fn coroutine_handle(func: &FnDecl) -> Option<&str> {
    let [param] = func.params.as_slice() else {
        return None;
    };
    let named = match &param.ty {
        TypeExpr::Ref(r) => r.inner.as_named()?,
        TypeExpr::Named(_) => return None,
    };
    (named.ident.sym == COROUTINE_TYPE && named.args.len() == 2).then_some(param.ident.sym.as_str())
}

/// Marker call on `handle` in statement position.
pub fn marker_stmt<'a>(stmt: &'a Stmt, handle: &str) -> Option<MarkerCall<'a>> {
    let Stmt::ExprStmt(es) = stmt else {
        return None;
    };
    marker_expr(&es.expr, handle).map(|(marker, args)| MarkerCall {
        marker,
        args,
        span: &es.span,
    })
}

fn marker_expr<'a>(expr: &'a Expr, handle: &str) -> Option<(Marker, &'a [Expr])> {
    let (recv, method, args) = expr.as_method_call()?;
    if recv.as_ident() != Some(handle) {
        return None;
    }
    Marker::from_method(&method.sym).map(|m| (m, args))
}

/// Statement-level suspension (not `begin`).
pub fn suspension_stmt<'a>(stmt: &'a Stmt, handle: &str) -> Option<MarkerCall<'a>> {
    marker_stmt(stmt, handle).filter(|m| m.marker.is_suspension())
}

/// Number of statement-level suspension points in `stmt` and every block
/// nested under it.
pub fn count_suspensions(stmt: &Stmt, handle: &str) -> usize {
    if suspension_stmt(stmt, handle).is_some() {
        return 1;
    }
    if !stmt.is_block_like() {
        return 0;
    }
    stmt.nested_blocks()
        .into_iter()
        .flat_map(|b| b.stmts.iter())
        .map(|s| count_suspensions(s, handle))
        .sum()
}

pub fn contains_suspension(stmt: &Stmt, handle: &str) -> bool {
    count_suspensions(stmt, handle) > 0
}

/// Validate a function body. `stmts` is the body with any feature-detection
/// guard already removed.
///
/// Returns `Ok(None)` for functions that are not coroutines or use no
/// markers at all; such functions are left untouched.
pub fn scan(func: &FnDecl, stmts: &[Stmt]) -> Result<Option<Scan>, Vec<TransformError>> {
    let Some(handle) = coroutine_handle(func) else {
        return Ok(None);
    };
    let mut scanner = Scanner {
        function: &func.ident.sym,
        handle,
        begin: None,
        points: 0,
        saw_marker: false,
        errors: Vec::new(),
    };
    for (index, stmt) in stmts.iter().enumerate() {
        scanner.top_level(index, stmt);
    }

    if !scanner.saw_marker {
        return Ok(None);
    }
    if scanner.points == 0
        && let Some((_, span)) = scanner.begin.clone()
    {
        scanner.error(|function| TransformError::BeginWithoutSuspension { function, span });
    }
    match scanner.begin {
        Some((begin_index, _)) if scanner.errors.is_empty() => Ok(Some(Scan {
            handle: handle.to_string(),
            begin_index,
            points: scanner.points,
        })),
        _ => Err(scanner.errors),
    }
}

struct Scanner<'a> {
    function: &'a str,
    handle: &'a str,
    begin: Option<(usize, Span)>,
    points: usize,
    saw_marker: bool,
    errors: Vec<TransformError>,
}

impl Scanner<'_> {
    fn error(&mut self, make: impl FnOnce(String) -> TransformError) {
        self.errors.push(make(self.function.to_string()));
    }

    fn top_level(&mut self, index: usize, stmt: &Stmt) {
        if let Some(call) = marker_stmt(stmt, self.handle)
            && call.marker == Marker::Begin
        {
            self.saw_marker = true;
            self.check_marker_args(&call);
            let span = call.span.clone();
            if self.begin.is_some() {
                self.error(|function| TransformError::DuplicateBegin { function, span });
            } else {
                self.begin = Some((index, span));
            }
            return;
        }
        self.stmt(stmt, 0, None);
    }

    /// `unsupported` names the innermost enclosing construct that cannot
    /// hold a suspension point.
    fn stmt(&mut self, stmt: &Stmt, depth: usize, unsupported: Option<&'static str>) {
        if let Some(call) = marker_stmt(stmt, self.handle) {
            self.saw_marker = true;
            self.check_marker_args(&call);
            let span = call.span.clone();
            if call.marker == Marker::Begin {
                debug_assert!(depth > 0);
                self.error(|function| TransformError::NestedBegin { function, span });
                return;
            }
            if self.begin.is_none() {
                let span = span.clone();
                self.error(|function| TransformError::SuspensionWithoutBegin { function, span });
            }
            if let Some(construct) = unsupported {
                self.error(|function| TransformError::UnsupportedConstruct {
                    function,
                    construct,
                    span,
                });
            }
            self.points += 1;
            return;
        }

        match stmt {
            Stmt::Let(s) if s.ident.sym == self.handle => {
                let (handle, span) = (self.handle.to_string(), s.span.clone());
                self.error(|function| TransformError::ShadowedHandle {
                    function,
                    handle,
                    span,
                });
            }
            Stmt::Return(s) if s.arg.is_some() => {
                let span = s.span.clone();
                self.error(|function| TransformError::ValueReturn { function, span });
            }
            _ => {}
        }

        for expr in stmt.direct_exprs() {
            self.nested_markers(expr);
        }
        // Loop headers are evaluated as expressions, so even a
        // statement-shaped marker there is misplaced.
        for header in stmt.header_stmts() {
            if let Some(call) = marker_stmt(header, self.handle) {
                self.saw_marker = true;
                let (marker, span) = (call.marker.as_str().to_string(), call.span.clone());
                self.error(|function| TransformError::MarkerInExpression {
                    function,
                    marker,
                    span,
                });
            } else {
                self.stmt(header, depth, unsupported);
            }
        }

        let inner_unsupported = match stmt {
            Stmt::Switch(_) => Some("switch"),
            Stmt::Loop(_) => Some("loop"),
            _ => unsupported,
        };
        let before = self.points;
        for block in stmt.nested_blocks() {
            for s in &block.stmts {
                self.stmt(s, depth + 1, inner_unsupported);
            }
        }
        let count = self.points - before;
        if let Stmt::For(f) = stmt
            && count > 1
        {
            let span = f.span.clone();
            self.error(|function| TransformError::MultipleSuspensionsInLoop {
                function,
                count,
                span,
            });
        }
    }

    fn check_marker_args(&mut self, call: &MarkerCall<'_>) {
        let (min, max, expected) = call.marker.arity();
        if call.args.len() < min || call.args.len() > max {
            let (marker, span) = (call.marker.as_str().to_string(), call.span.clone());
            self.error(|function| TransformError::BadMarkerArity {
                function,
                marker,
                expected,
                span,
            });
        }
        for arg in call.args {
            self.nested_markers(arg);
        }
    }

    /// Report every marker call buried inside `expr`.
    fn nested_markers(&mut self, expr: &Expr) {
        let handle = self.handle;
        let mut found = Vec::new();
        expr.walk(&mut |e| {
            if let Some((marker, _)) = marker_expr(e, handle) {
                found.push((marker, e.span()));
            }
        });
        for (marker, span) in found {
            self.saw_marker = true;
            let marker = marker.as_str().to_string();
            self.error(|function| TransformError::MarkerInExpression {
                function,
                marker,
                span,
            });
        }
    }
}
