//! Values a coroutine can delegate to with `yield_to`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::coroutine::CoroutineRef;
use crate::error::RuntimeError;

/// Something that can be ticked until it reports completion.
pub trait Yielder {
    /// Advance once. Returns `true` when done.
    fn tick(&mut self) -> Result<bool, RuntimeError>;

    /// Short human-readable description, used in logs and `Display`.
    fn describe(&self) -> String;

    /// The coroutine behind this yielder, if it is one.
    fn as_coroutine(&self) -> Option<&CoroutineRef> {
        None
    }
}

/// Reference-counted yielder that can live in a [`crate::Value`].
#[derive(Clone)]
pub struct SharedYielder(Rc<RefCell<dyn Yielder>>);

impl SharedYielder {
    pub fn new(y: impl Yielder + 'static) -> Self {
        Self(Rc::new(RefCell::new(y)))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Yielder for SharedYielder {
    fn tick(&mut self) -> Result<bool, RuntimeError> {
        self.0.borrow_mut().tick()
    }

    fn describe(&self) -> String {
        self.0.borrow().describe()
    }
}

/// Done once the wake-up instant has passed.
pub struct Sleeper {
    wakeup: Instant,
    duration: Duration,
}

impl Sleeper {
    pub fn new(duration: Duration) -> Self {
        Self {
            wakeup: Instant::now() + duration,
            duration,
        }
    }
}

impl Yielder for Sleeper {
    fn tick(&mut self) -> Result<bool, RuntimeError> {
        Ok(Instant::now() >= self.wakeup)
    }

    fn describe(&self) -> String {
        format!("sleeper {}ms", self.duration.as_millis())
    }
}

/// Done on its `n`-th tick; `Countdown::new(0)` is done immediately.
pub struct Countdown {
    remaining: u64,
}

impl Countdown {
    pub fn new(n: u64) -> Self {
        Self { remaining: n }
    }
}

impl Yielder for Countdown {
    fn tick(&mut self) -> Result<bool, RuntimeError> {
        self.remaining = self.remaining.saturating_sub(1);
        Ok(self.remaining == 0)
    }

    fn describe(&self) -> String {
        format!("countdown {}", self.remaining)
    }
}
