//! The cooperative scheduler.
//!
//! This module contains the components that execute asynchronous tasks:
//! - [`core`]: the scheduler thread and its lifecycle,
//! - [`queue`]: the FIFO run queue shared with every task.
//!
//! The scheduler is deliberately single-threaded: all tasks interleave
//! on one thread and yield control only at suspension points. CPU-bound
//! work belongs on the offload pool, which is the sole separate
//! execution context.

pub(crate) mod core;
pub(crate) mod queue;
