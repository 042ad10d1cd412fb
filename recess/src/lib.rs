//! A small cooperative task runtime.
//!
//! Tasks are spawned onto a single scheduler thread and cooperate by
//! yielding at await points. Timers and process signals are handled by
//! a reactor thread, and CPU-heavy work can be pushed to an offload
//! pool so the scheduler stays responsive.
//!
//! ```no_run
//! use recess::RuntimeBuilder;
//! use recess::time::sleep;
//! use std::time::Duration;
//!
//! let runtime = RuntimeBuilder::new().build();
//!
//! runtime.block_on(async {
//!     sleep(Duration::from_millis(10)).await;
//! });
//! ```

mod reactor;
mod runtime;

pub mod offload;
pub mod scenario;
pub mod sync;
pub mod time;
pub mod tools;

pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;
