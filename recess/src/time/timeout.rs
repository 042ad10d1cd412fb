use crate::reactor::command::Command;
use crate::runtime::context::CURRENT_REACTOR;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Error returned when a [`timeout`] deadline passes before the inner
/// future resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline elapsed before the operation completed")]
pub struct Elapsed;

/// Races `future` against a deadline.
///
/// Resolves to `Ok(output)` if the future finishes in time, or
/// `Err(Elapsed)` once `duration` has passed. On timeout the inner
/// future is dropped along with the `Timeout`, which abandons whatever
/// it was doing.
pub fn timeout<F>(duration: Duration, future: F) -> Timeout<F>
where
    F: Future,
{
    Timeout::new(duration, future)
}

/// Future returned by [`timeout`].
pub struct Timeout<F> {
    future: F,
    deadline: Instant,
    registered: bool,
    cancelled: Arc<AtomicBool>,
}

impl<F> Timeout<F> {
    pub(crate) fn new(duration: Duration, future: F) -> Self {
        Timeout {
            future,
            deadline: Instant::now() + duration,
            registered: false,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<F: Future> Future for Timeout<F> {
    type Output = Result<F::Output, Elapsed>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if Instant::now() >= self.deadline {
            return Poll::Ready(Err(Elapsed));
        }

        // SAFETY: `future` is never moved out of the pinned struct.
        let future = unsafe { self.as_mut().map_unchecked_mut(|this| &mut this.future) };
        if let Poll::Ready(value) = future.poll(cx) {
            return Poll::Ready(Ok(value));
        }

        if !self.registered {
            let deadline = self.deadline;
            let waker = cx.waker().clone();
            let cancelled = self.cancelled.clone();

            CURRENT_REACTOR.with(|cell| {
                let binding = cell.borrow();
                let reactor = binding
                    .as_ref()
                    .expect("Timeout polled outside of runtime");

                let _ = reactor.send(Command::SetTimer {
                    deadline,
                    waker,
                    cancelled,
                });
            });

            // SAFETY: writing a bool field does not move the future.
            unsafe {
                self.as_mut().get_unchecked_mut().registered = true;
            }
        }

        Poll::Pending
    }
}

impl<F> Drop for Timeout<F> {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
