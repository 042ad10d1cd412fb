use super::handle::{JoinError, JoinHandle, panic_message};
use super::state::{
    CANCELLED, CANCELLING, COMPLETED, FAILED, IDLE, NOTIFIED, QUEUED, RUNNING,
};
use crate::runtime::context::CURRENT_QUEUE;
use crate::runtime::scheduler::queue::RunQueueHandle;

use std::cell::UnsafeCell;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Wake, Waker};

/// A runnable unit of work that can be executed by the scheduler.
///
/// The trait erases the task's output type so the run queue can hold
/// a heterogeneous collection of tasks through `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Executes one scheduling step of the task.
    fn run(self: Arc<Self>);
}

/// A spawned asynchronous task managed by the runtime.
///
/// A `Task` is the container for a future. It coordinates the future's
/// lifecycle: execution state, cancellation, waker delivery, and storage
/// of the final outcome for joiners.
pub(crate) struct Task<T> {
    /// The underlying future.
    ///
    /// `UnsafeCell` gives interior mutability during `poll`; the `Option`
    /// lets the scheduler drop the future early when a cancellation
    /// request is honored, running its destructors as cleanup.
    future: UnsafeCell<Option<Pin<Box<dyn Future<Output = T> + Send>>>>,

    /// Outcome of the task, written exactly once by the scheduler.
    pub(crate) result: UnsafeCell<Option<Result<T, JoinError>>>,

    /// The current lifecycle state (IDLE, QUEUED, RUNNING, ...).
    pub(crate) state: AtomicUsize,

    /// Run queue used for (re)scheduling this task.
    queue: RunQueueHandle,

    /// Wakers of `JoinHandle`s awaiting this task.
    pub(crate) waiters: Mutex<Vec<Waker>>,
}

unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a task in the `QUEUED` state, ready for the scheduler.
    pub(crate) fn new<F>(future: F, queue: RunQueueHandle) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: UnsafeCell::new(Some(Box::pin(future))),
            result: UnsafeCell::new(None),
            state: AtomicUsize::new(QUEUED),
            queue,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Executes one scheduling step of the task.
    ///
    /// A pending cancellation request is honored here, before the future
    /// is polled again: the future is dropped and the task finalized as
    /// `CANCELLED`. Otherwise the task transitions to `RUNNING`, the
    /// future is polled once, and the outcome is recorded:
    /// - `Poll::Pending`: back to `IDLE`, or re-queued if woken meanwhile.
    /// - `Poll::Ready`: result stored, waiters woken.
    /// - a panic: contained, stored as a failure, waiters woken.
    pub(crate) fn run(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                CANCELLING => {
                    self.finish_cancel();
                    return;
                }
                current @ (QUEUED | NOTIFIED) => {
                    if self
                        .state
                        .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        break;
                    }
                }
                _ => return,
            }
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: the RUNNING state guarantees exclusive access to the cell.
        let poll = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
            (*self.future.get())
                .as_mut()
                .expect("task polled after completion")
                .as_mut()
                .poll(&mut cx)
        }));

        match poll {
            Ok(Poll::Pending) => {
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    match self.state.load(Ordering::Acquire) {
                        // Woken during the poll; go around again.
                        NOTIFIED => {
                            self.state.store(QUEUED, Ordering::Release);
                            self.queue.push(self.clone());
                        }
                        // Cancelled during the poll.
                        CANCELLING => self.finish_cancel(),
                        _ => {}
                    }
                }
            }
            Ok(Poll::Ready(value)) => {
                // Safety: still the exclusive owner; the future is done.
                unsafe {
                    *self.future.get() = None;
                    *self.result.get() = Some(Ok(value));
                }
                self.state.store(COMPLETED, Ordering::Release);
                self.wake_waiters();
            }
            Err(payload) => {
                let message = panic_message(payload);
                log::trace!("task failed: {message}");

                unsafe {
                    *self.future.get() = None;
                    *self.result.get() = Some(Err(JoinError::Panicked(message)));
                }
                self.state.store(FAILED, Ordering::Release);
                self.wake_waiters();
            }
        }
    }

    /// Finalizes a cancellation request.
    ///
    /// Dropping the future here runs its destructors; that is the bounded,
    /// synchronous cleanup a cancelled task is granted. Only the scheduler
    /// calls this, so the access to the cell is exclusive.
    fn finish_cancel(&self) {
        unsafe {
            *self.future.get() = None;
        }
        self.state.store(CANCELLED, Ordering::Release);
        self.wake_waiters();
    }

    /// Requests that this task be rescheduled.
    ///
    /// An `IDLE` task moves to `QUEUED` and is pushed onto the run queue.
    /// A `RUNNING` task moves to `NOTIFIED` so it is re-queued right after
    /// its current poll. Any other state needs no action.
    pub(crate) fn schedule(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.queue.push(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Delivers a cancellation request.
    ///
    /// The request takes effect at the task's next scheduling point, never
    /// in the middle of a poll. Cancelling a terminal task, or one that is
    /// already being cancelled, is a no-op.
    pub(crate) fn cancel(self: &Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                COMPLETED | CANCELLING | CANCELLED | FAILED => return,
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, CANCELLING, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        // Not in the queue; schedule it so the request is seen.
                        self.queue.push(self.clone());
                        return;
                    }
                }
                QUEUED | NOTIFIED | RUNNING => {
                    // Already scheduled (or mid-poll); the existing queue
                    // entry or the post-poll check finalizes the request.
                    if self
                        .state
                        .compare_exchange(state, CANCELLING, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    fn wake_waiters(&self) {
        let mut waiters = self.waiters.lock().unwrap();
        for waker in waiters.drain(..) {
            waker.wake();
        }
    }
}

impl<T: Send + 'static> Wake for Task<T> {
    fn wake(self: Arc<Self>) {
        self.schedule();
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }
}

/// Spawns a future as a task onto the current runtime.
///
/// The task is pushed onto the run queue and begins executing without
/// suspending the caller. The returned [`JoinHandle`] resolves to the
/// task's outcome.
///
/// # Panics
/// Panics if called outside the context of a running runtime.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let queue = CURRENT_QUEUE.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a runtime")
            .clone()
    });

    let task = Arc::new(Task::new(future, queue.clone()));
    queue.push(task.clone());

    JoinHandle { task }
}
