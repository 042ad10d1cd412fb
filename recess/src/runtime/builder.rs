use super::Runtime;

use std::thread;

/// Builder for configuring and creating a runtime.
///
/// `RuntimeBuilder` allows customizing runtime parameters before
/// constructing the runtime. The scheduler itself is always a single
/// cooperative thread; the configurable knob is the size of the offload
/// pool used for blocking work.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .offload_threads(2)
///     .build();
/// ```
pub struct RuntimeBuilder {
    /// Number of worker threads in the offload pool.
    offload_threads: usize,
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with default configuration.
    ///
    /// By default, the offload pool gets one thread per available
    /// logical CPU, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let offload_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self { offload_threads }
    }

    /// Sets the number of worker threads in the offload pool.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn offload_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "offload_threads must be > 0");

        self.offload_threads = n;
        self
    }

    /// Builds the runtime with the configured options.
    ///
    /// This starts the reactor, the scheduler, and the offload pool.
    pub fn build(self) -> Runtime {
        Runtime::new(self.offload_threads)
    }
}

impl Default for RuntimeBuilder {
    /// Creates a default `RuntimeBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
