//! Core runtime components.
//!
//! This module contains the fundamental building blocks of the runtime:
//! - the cooperative scheduler and its run queue,
//! - task spawning, joining, and cancellation,
//! - the runtime context and builder,
//! - cooperative yielding.
//!
//! Most users interact with higher-level APIs built on top of these
//! components rather than using this module directly.

mod core;
mod scheduler;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub mod task;

use self::core::Runtime;
