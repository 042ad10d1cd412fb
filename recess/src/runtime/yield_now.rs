use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that yields control back to the scheduler exactly once.
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    /// On the first poll, the task schedules itself to be polled again
    /// and returns `Poll::Pending`, letting the scheduler run other
    /// tasks. The second poll completes.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if !self.yielded {
            self.yielded = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        Poll::Ready(())
    }
}

/// Yields control back to the scheduler.
///
/// This is a bare suspension point: other runnable tasks get to make
/// progress before the current task continues. It is also a point where
/// a pending cancellation request is honored.
///
/// # Examples
///
/// ```rust,ignore
/// async fn cooperative() {
///     // Let other tasks run
///     yield_now().await;
/// }
/// ```
pub async fn yield_now() {
    YieldNow { yielded: false }.await
}
