//! Tree-walking interpreter for `.coro` modules.
//!
//! Executes both hand-written and generated code. Coroutine functions become
//! [`coro_runtime::Body`] implementations, so ticking them goes through the
//! same runtime as any other coroutine.

mod builtins;
mod eval;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use coro_ast::{FnDecl, Module};
use coro_runtime::{Body, CoroutineRef, RuntimeError, Value};
use thiserror::Error;
use tracing::debug;

pub use eval::Evaluator;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("`{function}` expects {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: String,
        got: usize,
    },

    #[error("type error: {0}")]
    Type(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("no field `{field}` on {ty}")]
    NoField { field: String, ty: &'static str },

    #[error("field `{0}` is write-only")]
    WriteOnly(String),

    #[error("coroutine `{coroutine}` has no local `{name}`")]
    UndefinedLocal { coroutine: String, name: String },

    #[error("`{0}` does not name an enclosing loop")]
    UnknownLabel(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Where `print` writes.
#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    Capture(Rc<RefCell<Vec<String>>>),
}

impl Output {
    /// A capturing sink and the buffer it fills.
    pub fn capture() -> (Self, Rc<RefCell<Vec<String>>>) {
        let buf = Rc::new(RefCell::new(Vec::new()));
        (Output::Capture(Rc::clone(&buf)), buf)
    }

    fn emit(&self, line: String) {
        match self {
            Output::Stdout => println!("{}", line),
            Output::Capture(buf) => buf.borrow_mut().push(line),
        }
    }
}

/// A loaded module.
#[derive(Debug)]
pub struct Program {
    functions: HashMap<String, FnDecl>,
    has_gen: bool,
    output: Output,
}

impl Program {
    /// Load `module`. `HAS_GEN` is fixed here: true for generated modules.
    pub fn load(module: &Module, output: Output) -> Rc<Self> {
        let functions = module
            .items
            .iter()
            .map(|f| (f.ident.sym.clone(), f.clone()))
            .collect::<HashMap<_, _>>();
        debug!(functions = functions.len(), has_gen = module.generated, "program loaded");
        Rc::new(Self {
            functions,
            has_gen: module.generated,
            output,
        })
    }

    pub fn has_gen(&self) -> bool {
        self.has_gen
    }

    pub fn function(&self, name: &str) -> Option<&FnDecl> {
        self.functions.get(name)
    }

    /// Call a top-level function with already evaluated arguments.
    pub fn call_function(self: &Rc<Self>, name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        let func = self
            .functions
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        Evaluator::new(self).call(func, args)
    }

    /// Create a coroutine that runs function `name` on every tick.
    pub fn create_coroutine(self: &Rc<Self>, name: &str, input: Value) -> Result<CoroutineRef, EvalError> {
        let func = self
            .functions
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        if func.params.len() != 1 {
            return Err(EvalError::Arity {
                function: name.to_string(),
                expected: "1 (the coroutine handle)".to_string(),
                got: func.params.len(),
            });
        }
        let body: Rc<dyn Body> = Rc::new(FnBody {
            program: Rc::clone(self),
            func: name.to_string(),
        });
        Ok(coro_runtime::create(name, body, input))
    }
}

/// Runs a module function as a coroutine body.
struct FnBody {
    program: Rc<Program>,
    func: String,
}

impl Body for FnBody {
    fn resume(&self, co: &CoroutineRef) -> Result<(), RuntimeError> {
        match self
            .program
            .call_function(&self.func, vec![Value::Coroutine(co.clone())])
        {
            Ok(_) => Ok(()),
            Err(EvalError::Runtime(e)) => Err(e),
            Err(e) => Err(RuntimeError::Body {
                coroutine: co.name(),
                source: Box::new(e),
            }),
        }
    }
}
