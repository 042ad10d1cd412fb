#[cfg(unix)]
use crate::sync::signal::SignalShared;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::task::Waker;
use std::time::Instant;

/// Requests sent from runtime components to the reactor thread.
pub(crate) enum Command {
    /// Registers a timer that wakes `waker` at `deadline`, unless the
    /// shared `cancelled` flag is set first.
    SetTimer {
        deadline: Instant,
        waker: Waker,
        cancelled: Arc<AtomicBool>,
    },

    /// Registers a one-shot watch for the signals in `mask`.
    #[cfg(unix)]
    WatchSignal {
        mask: u64,
        shared: Arc<SignalShared>,
    },

    /// Stops the reactor thread.
    Shutdown,
}
