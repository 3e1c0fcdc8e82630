//! Coroutine registers and the tick loop.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::value::Value;
use crate::yielder::Yielder;

/// State code of a finished coroutine.
pub const STATE_DONE: i64 = -1;
/// Sub-state meaning "no nested position to resume".
pub const NO_RESUME: i64 = -1;
/// State code of a fresh coroutine.
pub const STATE_START: i64 = 0;

/// The resumable state of one coroutine.
pub struct Registers {
    /// Top-level segment to run on the next tick.
    pub state: i64,
    /// Resume code of the innermost paused position, or [`NO_RESUME`].
    pub sub_state: i64,
    pub input: Value,
    pub out: Value,
    /// Pending delegate installed by `yield_to`.
    pub yielder: Option<Box<dyn Yielder>>,
    /// Hoisted locals frame.
    pub locals: BTreeMap<String, Value>,
}

impl Registers {
    fn new(input: Value) -> Self {
        Self {
            state: STATE_START,
            sub_state: NO_RESUME,
            input,
            out: Value::Unit,
            yielder: None,
            locals: BTreeMap::new(),
        }
    }
}

/// The code a coroutine runs on every tick. It reads and writes the
/// registers through the handle and returns at a suspension point.
pub trait Body {
    fn resume(&self, co: &CoroutineRef) -> Result<(), RuntimeError>;
}

impl<F> Body for F
where
    F: Fn(&CoroutineRef) -> Result<(), RuntimeError>,
{
    fn resume(&self, co: &CoroutineRef) -> Result<(), RuntimeError> {
        self(co)
    }
}

struct Coroutine {
    name: String,
    regs: Registers,
    body: Rc<dyn Body>,
    running: bool,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub output: Value,
    pub done: bool,
}

/// Shared handle to a coroutine. Cloning the handle does not copy the
/// registers.
#[derive(Clone)]
pub struct CoroutineRef(Rc<RefCell<Coroutine>>);

/// Create a coroutine that runs `body` with the given input.
pub fn create(name: impl Into<String>, body: Rc<dyn Body>, input: Value) -> CoroutineRef {
    let name = name.into();
    debug!(coroutine = %name, "created");
    CoroutineRef(Rc::new(RefCell::new(Coroutine {
        name,
        regs: Registers::new(input),
        body,
        running: false,
    })))
}

impl CoroutineRef {
    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn ptr_eq(&self, other: &CoroutineRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Run `f` with mutable access to the registers. The borrow ends when `f`
    /// returns, so `f` must not tick coroutines.
    pub fn with_regs<R>(&self, f: impl FnOnce(&mut Registers) -> R) -> R {
        f(&mut self.0.borrow_mut().regs)
    }

    pub fn state(&self) -> i64 {
        self.0.borrow().regs.state
    }

    pub fn output(&self) -> Value {
        self.0.borrow().regs.out.clone()
    }

    pub fn is_done(&self) -> bool {
        self.state() == STATE_DONE
    }

    /// Advance the coroutine by one tick.
    ///
    /// A finished coroutine reports done without running anything. A pending
    /// delegate is ticked first and the body only runs once it reports done.
    /// A delegate installed by the body is ticked once before returning.
    pub fn tick(&self) -> Result<Tick, RuntimeError> {
        {
            let mut co = self.0.borrow_mut();
            if co.running {
                return Err(RuntimeError::Reentrant(co.name.clone()));
            }
            if co.regs.state == STATE_DONE {
                return Ok(Tick {
                    output: co.regs.out.clone(),
                    done: true,
                });
            }
            co.running = true;
        }

        let result = self.advance();
        self.0.borrow_mut().running = false;
        result?;

        let co = self.0.borrow();
        let tick = Tick {
            output: co.regs.out.clone(),
            done: co.regs.state == STATE_DONE,
        };
        trace!(
            coroutine = %co.name,
            state = co.regs.state,
            sub_state = co.regs.sub_state,
            done = tick.done,
            "tick"
        );
        Ok(tick)
    }

    fn advance(&self) -> Result<(), RuntimeError> {
        let pending = self.with_regs(|r| r.yielder.take());
        if let Some(delegate) = pending {
            if !self.drive(delegate)? {
                return Ok(());
            }
            trace!(coroutine = %self.name(), "delegate finished");
        }

        let body = Rc::clone(&self.0.borrow().body);
        body.resume(self)?;

        let installed = self.with_regs(|r| r.yielder.take());
        if let Some(delegate) = installed {
            if delegate.as_coroutine().is_some_and(|c| c.ptr_eq(self)) {
                return Err(RuntimeError::SelfDelegation(self.name()));
            }
            debug!(coroutine = %self.name(), delegate = %delegate.describe(), "delegating");
            self.drive(delegate)?;
        }
        Ok(())
    }

    /// Tick a delegate once, keeping it installed while it is not done.
    fn drive(&self, mut delegate: Box<dyn Yielder>) -> Result<bool, RuntimeError> {
        let done = delegate.tick()?;
        if !done {
            self.with_regs(|r| r.yielder = Some(delegate));
        }
        Ok(done)
    }
}

impl Yielder for CoroutineRef {
    fn tick(&mut self) -> Result<bool, RuntimeError> {
        CoroutineRef::tick(self).map(|t| t.done)
    }

    fn describe(&self) -> String {
        format!("coroutine {}", self.name())
    }

    fn as_coroutine(&self) -> Option<&CoroutineRef> {
        Some(self)
    }
}

impl fmt::Debug for CoroutineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let co = self.0.borrow();
        f.debug_struct("Coroutine")
            .field("name", &co.name)
            .field("state", &co.regs.state)
            .field("sub_state", &co.regs.sub_state)
            .field("out", &co.regs.out)
            .finish()
    }
}
