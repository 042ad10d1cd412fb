use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

pub(crate) type OffloadHandle = Arc<PoolShared>;

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Queue state shared between the pool's worker threads and the
/// futures submitting jobs.
pub(crate) struct PoolShared {
    jobs: Mutex<VecDeque<Job>>,
    condvar: Condvar,
    shutdown: AtomicBool,
}

impl PoolShared {
    fn new() -> Self {
        PoolShared {
            jobs: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Queues a job for the next free worker.
    ///
    /// Jobs submitted after shutdown are silently dropped.
    pub(crate) fn submit(&self, job: Job) {
        if self.shutdown.load(Ordering::Acquire) {
            return;
        }

        self.jobs.lock().unwrap().push_back(job);
        self.condvar.notify_one();
    }

    /// Blocks until a job is available or the pool shuts down.
    ///
    /// Jobs already queued are drained before workers exit.
    fn next_job(&self) -> Option<Job> {
        let mut jobs = self.jobs.lock().unwrap();

        loop {
            if let Some(job) = jobs.pop_front() {
                return Some(job);
            }

            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }

            jobs = self.condvar.wait(jobs).unwrap();
        }
    }

    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.condvar.notify_all();
    }
}

/// A fixed-size pool of threads for synchronous, CPU-heavy work.
///
/// Keeps long-running computations off the scheduler thread so
/// cooperative tasks stay responsive.
pub(crate) struct OffloadPool {
    shared: OffloadHandle,
    handles: Vec<thread::JoinHandle<()>>,
}

impl OffloadPool {
    pub(crate) fn new(threads: usize) -> Self {
        assert!(threads > 0, "offload pool needs at least one thread");

        let shared = Arc::new(PoolShared::new());
        let mut handles = Vec::with_capacity(threads);

        for i in 0..threads {
            let shared = shared.clone();

            let handle = thread::Builder::new()
                .name(format!("recess-offload-{i}"))
                .spawn(move || {
                    log::trace!("offload worker running");

                    while let Some(job) = shared.next_job() {
                        job();
                    }

                    log::trace!("offload worker exiting");
                })
                .expect("failed to start an offload worker thread");

            handles.push(handle);
        }

        OffloadPool { shared, handles }
    }

    pub(crate) fn handle(&self) -> OffloadHandle {
        self.shared.clone()
    }

    pub(crate) fn shutdown(&self) {
        self.shared.shutdown();
    }

    pub(crate) fn join(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
