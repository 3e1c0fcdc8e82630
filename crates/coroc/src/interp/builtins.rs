//! Builtin functions.

use std::time::Duration;

use coro_ast::Expr;
use coro_runtime::{CoroutineRef, Countdown, SharedYielder, Sleeper, Value};

use super::EvalError;
use super::eval::Evaluator;

type Result<T> = std::result::Result<T, EvalError>;

/// Evaluate builtin `name`, or `None` if there is no such builtin.
pub(super) fn call(ev: &mut Evaluator<'_>, name: &str, args: &[Expr]) -> Option<Result<Value>> {
    let result = match name {
        "print" => print(ev, args),
        "new" => new(ev, args),
        "tick" => with_coroutine(ev, name, args, |co| Ok(Value::Bool(co.tick()?.done))),
        "output" => with_coroutine(ev, name, args, |co| Ok(co.output())),
        "done" => with_coroutine(ev, name, args, |co| Ok(Value::Bool(co.is_done()))),
        "sleep" => non_negative(ev, name, args).map(|ms| {
            Value::Yielder(SharedYielder::new(Sleeper::new(Duration::from_millis(ms))))
        }),
        "countdown" => {
            non_negative(ev, name, args).map(|n| Value::Yielder(SharedYielder::new(Countdown::new(n))))
        }
        _ => return None,
    };
    Some(result)
}

fn arity(name: &str, args: &[Expr], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::Arity {
            function: name.to_string(),
            expected: expected.to_string(),
            got: args.len(),
        })
    }
}

/// `print(a, b, ..)` writes its arguments separated by spaces.
fn print(ev: &mut Evaluator<'_>, args: &[Expr]) -> Result<Value> {
    let values = ev.args(args)?;
    let line = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    ev.program().output.emit(line);
    Ok(Value::Unit)
}

/// `new(worker)` or `new(worker, input)`. The function may be named directly
/// or given as a string.
fn new(ev: &mut Evaluator<'_>, args: &[Expr]) -> Result<Value> {
    let (target, input) = match args {
        [target] => (target, None),
        [target, input] => (target, Some(input)),
        _ => {
            return Err(EvalError::Arity {
                function: "new".to_string(),
                expected: "1 or 2".to_string(),
                got: args.len(),
            });
        }
    };
    let program = ev.program();
    let name = match target.as_ident() {
        Some(name) if program.function(name).is_some() => name.to_string(),
        _ => match ev.expr(target)? {
            Value::Str(s) => s,
            other => {
                return Err(EvalError::Type(format!(
                    "new() expects a function name, found {}",
                    other.type_name()
                )));
            }
        },
    };
    let input = match input {
        Some(e) => ev.expr(e)?,
        None => Value::Unit,
    };
    Ok(Value::Coroutine(program.create_coroutine(&name, input)?))
}

fn with_coroutine(
    ev: &mut Evaluator<'_>,
    name: &str,
    args: &[Expr],
    f: impl FnOnce(&CoroutineRef) -> Result<Value>,
) -> Result<Value> {
    arity(name, args, 1)?;
    match ev.expr(&args[0])? {
        Value::Coroutine(co) => f(&co),
        other => Err(EvalError::Type(format!(
            "{}() expects a coroutine, found {}",
            name,
            other.type_name()
        ))),
    }
}

fn non_negative(ev: &mut Evaluator<'_>, name: &str, args: &[Expr]) -> Result<u64> {
    arity(name, args, 1)?;
    let v = ev.expr(&args[0])?;
    v.as_int()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| EvalError::Type(format!("{}() expects a non-negative int, found {}", name, v)))
}
