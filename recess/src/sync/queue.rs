use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll, Waker};

use thiserror::Error;

/// Error returned by [`Queue::put`] and [`Queue::get`] once the queue
/// is closed and, for `get`, drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("queue is closed")]
pub struct Closed;

/// An async multi-producer multi-consumer FIFO queue.
///
/// `put` suspends when a bounded queue is full, `get` suspends when it
/// is empty. Closing the queue fails pending and future `put`s right
/// away; `get` keeps returning buffered items until the queue is empty
/// and only then reports [`Closed`].
pub struct Queue<T> {
    state: Mutex<State<T>>,
}

struct State<T> {
    items: VecDeque<T>,
    capacity: Option<usize>,
    closed: bool,
    putters: VecDeque<Waker>,
    getters: VecDeque<Waker>,
}

impl<T> Queue<T> {
    /// Creates an unbounded queue.
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Creates a bounded queue holding at most `capacity` items.
    pub fn bounded(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be > 0");
        Self::with_capacity(Some(capacity))
    }

    fn with_capacity(capacity: Option<usize>) -> Self {
        Queue {
            state: Mutex::new(State {
                items: VecDeque::new(),
                capacity,
                closed: false,
                putters: VecDeque::new(),
                getters: VecDeque::new(),
            }),
        }
    }

    /// Enqueues `item`, waiting for room if the queue is bounded and
    /// currently full.
    pub fn put(&self, item: T) -> Put<'_, T> {
        Put {
            queue: self,
            item: Some(item),
        }
    }

    /// Dequeues the oldest item, waiting if the queue is empty.
    pub fn get(&self) -> Get<'_, T> {
        Get { queue: self }
    }

    /// Closes the queue. Idempotent.
    ///
    /// Every waiter is woken so it can observe the closed state.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();

        if state.closed {
            return;
        }
        state.closed = true;

        for waker in state.putters.drain(..) {
            waker.wake();
        }
        for waker in state.getters.drain(..) {
            waker.wake();
        }
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`Queue::put`].
pub struct Put<'a, T> {
    queue: &'a Queue<T>,
    item: Option<T>,
}

impl<T> Unpin for Put<'_, T> {}

impl<T> Future for Put<'_, T> {
    type Output = Result<(), Closed>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.queue.state.lock().unwrap();

        if state.closed {
            return Poll::Ready(Err(Closed));
        }

        if let Some(capacity) = state.capacity {
            if state.items.len() >= capacity {
                state.putters.push_back(cx.waker().clone());
                return Poll::Pending;
            }
        }

        let item = self.item.take().expect("Put polled after completion");
        state.items.push_back(item);

        // Wake every getter rather than just one. A woken getter may
        // hold a stale waker or have been dropped, so waking all keeps
        // the queue from stalling with items buffered.
        for waker in state.getters.drain(..) {
            waker.wake();
        }

        Poll::Ready(Ok(()))
    }
}

/// Future returned by [`Queue::get`].
pub struct Get<'a, T> {
    queue: &'a Queue<T>,
}

impl<T> Unpin for Get<'_, T> {}

impl<T> Future for Get<'_, T> {
    type Output = Result<T, Closed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.queue.state.lock().unwrap();

        // Buffered items drain before the closed state is reported.
        if let Some(item) = state.items.pop_front() {
            for waker in state.putters.drain(..) {
                waker.wake();
            }
            return Poll::Ready(Ok(item));
        }

        if state.closed {
            return Poll::Ready(Err(Closed));
        }

        state.getters.push_back(cx.waker().clone());
        Poll::Pending
    }
}
