//! The reactor thread.
//!
//! A single background thread that owns all timers and signal watches.
//! Futures talk to it by sending [`command::Command`] values through a
//! [`ReactorHandle`]; the reactor wakes the registered wakers when a
//! deadline passes or a watched signal arrives.

mod core;
mod timer;

pub(crate) mod command;

pub(crate) use self::core::{Reactor, ReactorHandle};
