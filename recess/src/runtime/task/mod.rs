//! Asynchronous task primitives.
//!
//! This module defines the abstractions the runtime uses to represent,
//! schedule, cancel, and join asynchronous tasks:
//! - task state management and cooperative cancellation,
//! - join handles for awaiting task outcomes,
//! - task groups that own a set of tasks and guarantee their joint
//!   termination.
//!
//! Most users interact with this module through [`spawn`], the returned
//! [`JoinHandle`], and [`TaskGroup`]; the lower-level pieces are used
//! internally by the scheduler.

pub(crate) mod handle;
pub(crate) mod state;

mod group;

pub(crate) use self::core::{Runnable, Task};

pub mod core;

pub use self::core::spawn;
pub use group::TaskGroup;
pub use handle::{JoinError, JoinHandle};
