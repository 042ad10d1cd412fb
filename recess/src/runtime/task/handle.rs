use crate::task::Task;
use crate::task::state::{CANCELLED, COMPLETED, FAILED};

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll};

use thiserror::Error;

/// Reason a joined task produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The task observed a cancellation request and terminated.
    #[error("task was cancelled")]
    Cancelled,

    /// The task panicked; the panic was contained by the scheduler.
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// A handle to a spawned task.
///
/// A `JoinHandle` allows awaiting the outcome of a task spawned onto the
/// runtime. It implements [`Future`] and resolves once the task reaches a
/// terminal state: `Ok(value)` on completion, [`JoinError::Cancelled`] if
/// the task was cancelled, [`JoinError::Panicked`] if it panicked.
///
/// Dropping the `JoinHandle` does **not** cancel the task; it only
/// discards the ability to observe its outcome. Use [`cancel`](Self::cancel)
/// to request termination.
pub struct JoinHandle<T> {
    /// Shared reference to the underlying task.
    pub(crate) task: Arc<Task<T>>,
}

impl<T: Send + 'static> JoinHandle<T> {
    /// Delivers a cancellation request to the task.
    ///
    /// The request is observed at the task's next scheduling point; the
    /// task's future is dropped there, running destructors as cleanup.
    /// Awaiting the handle afterwards returns [`JoinError::Cancelled`]
    /// (or the task's result, if it reached completion first).
    pub fn cancel(&self) {
        Task::cancel(&self.task);
    }

    /// Returns `true` once the task has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.task.state.load(Ordering::Acquire),
            COMPLETED | CANCELLED | FAILED
        )
    }

    /// Reads the task's outcome if it is terminal.
    fn try_take_output(&self) -> Option<Result<T, JoinError>> {
        match self.task.state.load(Ordering::Acquire) {
            COMPLETED | FAILED => {
                // Safety: the task is terminal; the scheduler no longer
                // touches the result slot.
                let result = unsafe { (*self.task.result.get()).take() };
                Some(result.expect("result already taken"))
            }
            CANCELLED => Some(Err(JoinError::Cancelled)),
            _ => None,
        }
    }
}

impl<T: Send + 'static> Future for JoinHandle<T> {
    type Output = Result<T, JoinError>;

    /// Polls the join handle.
    ///
    /// The waker is registered **before** the terminal re-check to avoid
    /// missed wake-ups.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(output) = self.try_take_output() {
            return Poll::Ready(output);
        }

        self.task.waiters.lock().unwrap().push(cx.waker().clone());

        if let Some(output) = self.try_take_output() {
            return Poll::Ready(output);
        }

        Poll::Pending
    }
}
