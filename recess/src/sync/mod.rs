//! Synchronization primitives for tasks.

mod event;
mod queue;

#[cfg(unix)]
pub(crate) mod signal;

pub use event::Event;
pub use queue::{Closed, Get, Put, Queue};

#[cfg(unix)]
pub use signal::{Signal, SignalEvent};
