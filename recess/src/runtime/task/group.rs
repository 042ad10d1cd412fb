use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::task;
use crate::task::{JoinError, JoinHandle};

/// A scope that owns a set of tasks and manages their joint termination.
///
/// Tasks spawned into a `TaskGroup` are tied to the group's lifetime:
/// dropping the group cancels every member that is still running, so no
/// task outlives its owning group. The group also offers collective
/// joining, surfacing the first member failure only after every member
/// has reached a terminal state.
pub struct TaskGroup {
    /// Member handles stored as pinned trait objects, which lets the
    /// group manage tasks with different output types uniformly.
    handles: Vec<Pin<Box<dyn GroupHandle>>>,
}

impl TaskGroup {
    /// Creates a new, empty group.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawns a task into the group.
    ///
    /// The task is scheduled immediately; its handle is registered with
    /// the group so cancellation and joining cover it.
    pub fn spawn<F, T>(&mut self, future: F)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = task::spawn(future);
        self.handles.push(Box::pin(handle));
    }

    /// Number of members not yet consumed by [`join_next`](Self::join_next).
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the group has no members left.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for the next member to reach a terminal state.
    ///
    /// The finished member is removed from the group and its outcome
    /// returned. Returns `None` when the group is empty.
    pub async fn join_next(&mut self) -> Option<Result<(), JoinError>> {
        if self.handles.is_empty() {
            return None;
        }

        poll_fn(|cx| {
            let mut i = 0;

            while i < self.handles.len() {
                match self.handles[i].as_mut().poll_completed(cx) {
                    Poll::Ready(outcome) => {
                        // O(1) removal; member order is not significant.
                        self.handles.swap_remove(i);
                        return Poll::Ready(Some(outcome));
                    }
                    Poll::Pending => {
                        i += 1;
                    }
                }
            }
            Poll::Pending
        })
        .await
    }

    /// Waits for every member to reach a terminal state.
    ///
    /// The first failure observed is returned, but only after all
    /// remaining members have also terminated — a failing member never
    /// leaves its siblings running unattended.
    pub async fn join_all(&mut self) -> Result<(), JoinError> {
        let mut first_failure = None;

        while let Some(outcome) = self.join_next().await {
            if first_failure.is_none() {
                first_failure = outcome.err();
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Delivers a cancellation request to every member.
    ///
    /// The members stay in the group so they can still be joined to a
    /// terminal state afterwards.
    pub fn cancel_all(&mut self) {
        for handle in &self.handles {
            handle.cancel();
        }
    }

    /// Cancels every member and waits for all of them to terminate.
    ///
    /// Outcomes are discarded; members that were already finished count
    /// as terminated.
    pub async fn shutdown(&mut self) {
        self.cancel_all();
        while self.join_next().await.is_some() {}
    }
}

impl Default for TaskGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskGroup {
    /// Cancels all remaining members when the group goes out of scope.
    ///
    /// The cancellation requests are honored by the scheduler at each
    /// member's next scheduling point, so no member keeps running in the
    /// background once its group is gone.
    fn drop(&mut self) {
        self.cancel_all();
        self.handles.clear();
    }
}

/// Internal trait erasing the output type of a member's `JoinHandle`.
pub(crate) trait GroupHandle: Send {
    /// Polled by the group to check for member termination.
    fn poll_completed(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), JoinError>>;

    /// Delivers a cancellation request to the member.
    fn cancel(&self);
}

impl<T: Send + 'static> GroupHandle for JoinHandle<T> {
    fn poll_completed(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), JoinError>> {
        Future::poll(self, cx).map(|outcome| outcome.map(|_| ()))
    }

    fn cancel(&self) {
        JoinHandle::cancel(self);
    }
}
