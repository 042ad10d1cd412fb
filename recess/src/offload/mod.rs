//! Offloading synchronous work to a dedicated thread pool.
//!
//! [`spawn_blocking`] hands a closure to the pool and returns a future
//! that resolves with the closure's result once a worker has run it.
//! Meant for CPU-bound or otherwise blocking code that would stall the
//! cooperative scheduler if run inline.

pub(crate) mod pool;

use crate::runtime::context::CURRENT_OFFLOAD;
use crate::task::handle::{JoinError, panic_message};

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// Runs `f` on the offload pool.
///
/// The returned future resolves with the closure's return value, or
/// with [`JoinError::Panicked`] if the closure panics.
pub fn spawn_blocking<F, T>(f: F) -> Blocking<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let shared = Arc::new(BlockingShared {
        result: Mutex::new(None),
        waker: Mutex::new(None),
    });

    let job_shared = shared.clone();

    CURRENT_OFFLOAD.with(|cell| {
        let binding = cell.borrow();
        let pool = binding
            .as_ref()
            .expect("spawn_blocking must be called within the context of a runtime");

        pool.submit(Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(f));

            let result = match outcome {
                Ok(value) => Ok(value),
                Err(payload) => Err(JoinError::Panicked(panic_message(payload))),
            };

            *job_shared.result.lock().unwrap() = Some(result);

            if let Some(waker) = job_shared.waker.lock().unwrap().take() {
                waker.wake();
            }
        }));
    });

    Blocking { shared }
}

struct BlockingShared<T> {
    result: Mutex<Option<Result<T, JoinError>>>,
    waker: Mutex<Option<Waker>>,
}

/// Future returned by [`spawn_blocking`].
pub struct Blocking<T> {
    shared: Arc<BlockingShared<T>>,
}

impl<T> Future for Blocking<T> {
    type Output = Result<T, JoinError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Store the waker before checking the slot so a completion
        // racing with this poll cannot slip through unwoken.
        *self.shared.waker.lock().unwrap() = Some(cx.waker().clone());

        if let Some(result) = self.shared.result.lock().unwrap().take() {
            return Poll::Ready(result);
        }

        Poll::Pending
    }
}
