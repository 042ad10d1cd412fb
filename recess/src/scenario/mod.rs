//! Ready-made orchestration scenarios.
//!
//! Small end-to-end programs built out of the runtime's primitives: a
//! queue-linked processing pipeline and a supervised task tree. Useful
//! as integration exercises and as worked examples of how the pieces
//! compose.

pub mod pipeline;
pub mod supervise;

/// Naive recursive Fibonacci.
///
/// Deliberately slow. Used as a stand-in for CPU-bound work that must
/// go through [`spawn_blocking`](crate::offload::spawn_blocking) to
/// keep the scheduler responsive.
pub fn fib(n: u64) -> u64 {
    if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
}
