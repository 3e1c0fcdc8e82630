//! Dynamically typed values stored in coroutine registers.

use std::fmt;

use crate::coroutine::CoroutineRef;
use crate::yielder::{SharedYielder, Yielder};

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Unit,
    Int(i64),
    Bool(bool),
    Str(String),
    Coroutine(CoroutineRef),
    /// View of a coroutine's hoisted locals frame (`c.locals`).
    Locals(CoroutineRef),
    Yielder(SharedYielder),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Coroutine(_) => "coroutine",
            Value::Locals(_) => "locals",
            Value::Yielder(_) => "yielder",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert into something a coroutine can delegate to. Coroutine handles
    /// and yielder values qualify.
    pub fn into_yielder(self) -> Option<Box<dyn Yielder>> {
        match self {
            Value::Coroutine(co) => Some(Box::new(co)),
            Value::Yielder(y) => Some(Box::new(y)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Coroutine(a), Value::Coroutine(b)) => a.ptr_eq(b),
            (Value::Locals(a), Value::Locals(b)) => a.ptr_eq(b),
            (Value::Yielder(a), Value::Yielder(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Coroutine(co) => write!(f, "Coroutine({})", co.name()),
            Value::Locals(co) => write!(f, "Locals({})", co.name()),
            Value::Yielder(y) => write!(f, "Yielder({})", y.describe()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Coroutine(co) => write!(f, "<coroutine {}>", co.name()),
            Value::Locals(co) => write!(f, "<locals of {}>", co.name()),
            Value::Yielder(y) => write!(f, "<{}>", y.describe()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}
