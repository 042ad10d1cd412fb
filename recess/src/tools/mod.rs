//! Combinators for repeated asynchronous attempts.

mod retry;

pub use retry::{Retry, retry};
