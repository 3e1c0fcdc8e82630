//! Runtime support for lowered coroutines.
//!
//! A coroutine is a [`Body`] plus its [`Registers`]. Each [`CoroutineRef::tick`]
//! runs the body until its next suspension point. Handles are `Rc`-based and
//! meant for a single thread.

mod coroutine;
mod error;
mod value;
mod yielder;

pub use coroutine::{
    Body, CoroutineRef, NO_RESUME, Registers, STATE_DONE, STATE_START, Tick, create,
};
pub use error::RuntimeError;
pub use value::Value;
pub use yielder::{Countdown, SharedYielder, Sleeper, Yielder};

// Suspension markers. The generator rewrites every call to these; they fail
// if a body that was never lowered reaches one.

pub fn begin(co: &CoroutineRef) -> Result<(), RuntimeError> {
    marker("begin", co)
}

pub fn yield_(co: &CoroutineRef, _out: Option<Value>) -> Result<(), RuntimeError> {
    marker("yield", co)
}

pub fn yield_to(co: &CoroutineRef, _delegate: Value) -> Result<(), RuntimeError> {
    marker("yield_to", co)
}

pub fn yield_none(co: &CoroutineRef) -> Result<(), RuntimeError> {
    marker("yield_none", co)
}

fn marker(marker: &'static str, co: &CoroutineRef) -> Result<(), RuntimeError> {
    tracing::error!(coroutine = %co.name(), marker, "suspension marker executed");
    Err(RuntimeError::MarkerInvoked {
        marker,
        coroutine: co.name(),
    })
}
