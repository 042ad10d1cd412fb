use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Shared handle to the run queue.
pub(crate) type RunQueueHandle = Arc<RunQueue>;

/// The scheduler's FIFO run queue.
///
/// Newly spawned and re-woken tasks are pushed here and popped by the
/// scheduler thread in arrival order. The queue also coordinates the
/// scheduler's parking: when no task is runnable the scheduler sleeps on
/// the condition variable and is woken by the next push or by shutdown.
pub(crate) struct RunQueue {
    /// Tasks awaiting a scheduling step, in FIFO order.
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Wakes the parked scheduler when work arrives.
    condvar: Condvar,

    /// Indicates that the runtime is shutting down.
    shutdown: AtomicBool,
}

impl RunQueue {
    /// Creates a new empty run queue.
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals shutdown and wakes the scheduler if it is parked.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.condvar.notify_all();
    }

    /// Returns `true` once shutdown has been requested.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Pushes a task onto the back of the run queue.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.queue.lock().unwrap().push_back(task);
        self.condvar.notify_one();
    }

    /// Pops the next task from the front of the run queue.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.queue.lock().unwrap().pop_front()
    }

    /// Parks the scheduler thread until work arrives or shutdown begins.
    ///
    /// The wait is timed so a missed notification can never stall the
    /// scheduler for long.
    pub(crate) fn park(&self) {
        let guard = self.queue.lock().unwrap();

        if !guard.is_empty() || self.is_shutdown() {
            return;
        }

        let _ = self
            .condvar
            .wait_timeout(guard, Duration::from_millis(1))
            .unwrap();
    }
}
