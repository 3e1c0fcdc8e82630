//! coroc - stackless coroutines for `.coro` sources
//!
//! Lowers functions written with suspension markers (`begin`, `yield`,
//! `yield_to`, `yield_none`) into resumable state machines, and runs the
//! result on the `coro_runtime` crate.

pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod interp;
pub mod logging;
pub mod parser;
pub mod transform;
