use crate::time::{Timeout, timeout};

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};
use std::time::Duration;

/// A one-shot event.
///
/// Starts unset. [`Event::set`] flips it permanently and wakes every
/// task blocked in [`Event::wait`]; tasks that wait after the event is
/// set return immediately. There is no reset.
pub struct Event {
    fired: AtomicBool,
    waiters: Mutex<Vec<Waker>>,
}

impl Event {
    pub fn new() -> Self {
        Event {
            fired: AtomicBool::new(false),
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Sets the event. Idempotent; waiters are woken exactly once.
    pub fn set(&self) {
        if self.fired.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut waiters = self.waiters.lock().unwrap();
        for waker in waiters.drain(..) {
            waker.wake();
        }
    }

    pub fn is_set(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Waits until the event is set.
    pub fn wait(&self) -> Wait<'_> {
        Wait { event: self }
    }

    /// Waits until the event is set, giving up after `duration`.
    pub fn wait_timeout(&self, duration: Duration) -> Timeout<Wait<'_>> {
        timeout(duration, self.wait())
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`Event::wait`].
pub struct Wait<'a> {
    event: &'a Event,
}

impl Future for Wait<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.event.is_set() {
            return Poll::Ready(());
        }

        self.event.waiters.lock().unwrap().push(cx.waker().clone());

        // Recheck after registering in case `set` raced with us.
        if self.event.is_set() {
            return Poll::Ready(());
        }

        Poll::Pending
    }
}
