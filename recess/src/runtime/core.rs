use std::future::Future;
use std::sync::mpsc;
use std::thread;

use crate::offload::pool::OffloadPool;
use crate::reactor::command::Command;
use crate::reactor::{Reactor, ReactorHandle};
use crate::runtime::scheduler::core::Scheduler;

/// The main runtime handle.
///
/// `Runtime` owns the three execution components:
/// - the cooperative scheduler thread that drives all tasks,
/// - the reactor thread that fires timers and delivers signals,
/// - the offload pool that runs blocking work.
///
/// Dropping the runtime shuts these down in order and joins every
/// thread, so no work keeps running after the handle is gone.
pub struct Runtime {
    /// Cooperative scheduler driving all spawned tasks.
    scheduler: Scheduler,

    /// Handle to the reactor thread.
    reactor_handle: ReactorHandle,

    /// Join handle for the reactor thread.
    reactor_thread: Option<thread::JoinHandle<()>>,

    /// Pool of worker threads for blocking work.
    offload: OffloadPool,
}

impl Runtime {
    /// Creates a new runtime instance.
    ///
    /// # Arguments
    ///
    /// * `offload_threads` - Number of worker threads in the offload pool.
    ///
    /// The reactor and scheduler threads are started automatically.
    pub(crate) fn new(offload_threads: usize) -> Self {
        let (reactor_handle, reactor_thread) = Reactor::start();
        let offload = OffloadPool::new(offload_threads);
        let scheduler = Scheduler::new(reactor_handle.clone(), offload.handle());

        Self {
            scheduler,
            reactor_handle,
            reactor_thread: Some(reactor_thread),
            offload,
        }
    }

    /// Spawns a future onto the runtime.
    ///
    /// The future is executed asynchronously and runs until completion,
    /// cancellation, or failure.
    ///
    /// # Requirements
    ///
    /// - The future must be `Send`
    /// - The future must have `'static` lifetime
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.scheduler.spawn(future);
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// This is the synchronous entry point of the runtime, typically
    /// used in `main` or in tests. The future is spawned onto the
    /// scheduler and its result is sent back through a channel.
    ///
    /// # Panics
    ///
    /// Panics if the runtime shuts down before the future completes.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async { 42 });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (transmitter, receiver) = mpsc::channel();

        self.spawn(async move {
            let result = future.await;
            let _ = transmitter.send(result);
        });

        receiver.recv().expect("block_on failed")
    }
}

impl Drop for Runtime {
    /// Shuts down the runtime.
    ///
    /// This performs the following steps:
    /// 1. Stops task submission and signals the scheduler to shut down
    /// 2. Sends a shutdown command to the reactor
    /// 3. Signals the offload pool to stop accepting work
    /// 4. Joins the scheduler, reactor and pool threads
    fn drop(&mut self) {
        self.scheduler.shutdown();

        let _ = self.reactor_handle.send(Command::Shutdown);

        self.offload.shutdown();

        self.scheduler.join();

        if let Some(thread) = self.reactor_thread.take() {
            let _ = thread.join();
        }

        self.offload.join();
    }
}
