use crate::offload::pool::OffloadHandle;
use crate::reactor::ReactorHandle;
use crate::runtime::scheduler::queue::RunQueueHandle;

use std::cell::RefCell;

thread_local! {
    /// Thread-local handle to the current reactor.
    ///
    /// Set when entering the runtime context; lets timers and signal
    /// events reach the reactor without explicit parameter passing.
    pub(crate) static CURRENT_REACTOR: RefCell<Option<ReactorHandle>> =
        const { RefCell::new(None) };

    /// Thread-local handle to the run queue.
    ///
    /// Used by `spawn` to schedule new tasks and by tasks to reschedule
    /// themselves when woken.
    pub(crate) static CURRENT_QUEUE: RefCell<Option<RunQueueHandle>> =
        const { RefCell::new(None) };

    /// Thread-local handle to the offload pool.
    ///
    /// Used by `spawn_blocking` to dispatch blocking work off the
    /// scheduler thread.
    pub(crate) static CURRENT_OFFLOAD: RefCell<Option<OffloadHandle>> =
        const { RefCell::new(None) };
}

/// Enters the runtime execution context for the current thread.
///
/// Temporarily installs the thread-local runtime handles for the
/// duration of the closure `f`, restoring the previous context
/// afterwards. This is what allows deeply nested runtime components to
/// find the reactor, run queue, and offload pool without threading
/// handles through every API.
pub(crate) fn enter_context<R>(
    reactor: ReactorHandle,
    queue: RunQueueHandle,
    offload: OffloadHandle,
    f: impl FnOnce() -> R,
) -> R {
    CURRENT_REACTOR.with(|r| {
        CURRENT_QUEUE.with(|q| {
            CURRENT_OFFLOAD.with(|o| {
                let prev_r = r.replace(Some(reactor));
                let prev_q = q.replace(Some(queue));
                let prev_o = o.replace(Some(offload));

                let out = f();

                o.replace(prev_o);
                q.replace(prev_q);
                r.replace(prev_r);

                out
            })
        })
    })
}
