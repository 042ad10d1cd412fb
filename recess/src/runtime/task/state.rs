/// Task is idle and not scheduled.
///
/// The task exists but is not currently queued or running.
pub(crate) const IDLE: usize = 0;

/// Task is queued for execution.
///
/// The task has been scheduled and is waiting in the run queue.
pub(crate) const QUEUED: usize = 1;

/// Task is currently being polled by the scheduler.
///
/// At most one thread may observe this state at a time.
pub(crate) const RUNNING: usize = 2;

/// Task has completed execution.
///
/// The future has returned `Poll::Ready` and will not be polled again.
pub(crate) const COMPLETED: usize = 3;

/// Task was woken while it was running.
///
/// The task must be re-queued once the current poll finishes.
pub(crate) const NOTIFIED: usize = 4;

/// A cancellation request has been delivered.
///
/// The request is honored at the task's next scheduling point: the
/// scheduler drops the future and moves the task to `CANCELLED`.
pub(crate) const CANCELLING: usize = 5;

/// Task was cancelled.
///
/// The future has been dropped; any cleanup ran in its destructors.
pub(crate) const CANCELLED: usize = 6;

/// Task panicked while being polled.
///
/// The panic was contained; its message is stored for joiners.
pub(crate) const FAILED: usize = 7;
