use crate::offload::pool::OffloadHandle;
use crate::reactor::ReactorHandle;
use crate::runtime::context::enter_context;
use crate::runtime::scheduler::queue::{RunQueue, RunQueueHandle};
use crate::runtime::task::Task;

use std::future::Future;
use std::sync::Arc;
use std::thread;

/// The cooperative task scheduler.
///
/// One dedicated thread drives all tasks: it pops them from the run
/// queue in FIFO order and executes one scheduling step at a time.
/// Tasks interleave only at suspension points, so application state
/// shared between tasks needs no external locking. Blocking work must
/// go through the offload pool instead of being run on this thread.
pub(crate) struct Scheduler {
    /// Run queue shared with every spawned task.
    queue: RunQueueHandle,

    /// Join handle for the scheduler thread.
    handle: Option<thread::JoinHandle<()>>,
}

impl Scheduler {
    /// Starts the scheduler thread.
    ///
    /// The runtime execution context (reactor, run queue, offload pool)
    /// is installed for the thread so tasks can reach those components
    /// without explicit parameter passing.
    pub(crate) fn new(reactor: ReactorHandle, offload: OffloadHandle) -> Self {
        let queue = Arc::new(RunQueue::new());
        let scheduler_queue = queue.clone();

        let handle = thread::Builder::new()
            .name("recess-scheduler".to_string())
            .spawn(move || {
                enter_context(reactor, scheduler_queue.clone(), offload, || {
                    log::trace!("scheduler running");

                    loop {
                        if scheduler_queue.is_shutdown() {
                            break;
                        }

                        match scheduler_queue.pop() {
                            Some(task) => task.run(),
                            None => scheduler_queue.park(),
                        }
                    }

                    log::trace!("scheduler exiting");
                });
            })
            .expect("failed to start the scheduler thread");

        Self {
            queue,
            handle: Some(handle),
        }
    }

    /// Spawns a new asynchronous task onto the scheduler.
    ///
    /// Tasks spawned after shutdown has begun are silently ignored.
    pub(crate) fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.queue.is_shutdown() {
            return;
        }

        let task = Arc::new(Task::new(future, self.queue.clone()));
        self.queue.push(task);
    }

    /// Signals the scheduler thread to shut down.
    pub(crate) fn shutdown(&self) {
        self.queue.shutdown();
    }

    /// Waits for the scheduler thread to terminate.
    ///
    /// This should be called after initiating shutdown.
    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
