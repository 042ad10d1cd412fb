//! Timer utilities backed by the reactor thread.

pub mod sleep;
pub mod timeout;

pub use sleep::{Sleep, sleep};
pub use timeout::{Elapsed, Timeout, timeout};
