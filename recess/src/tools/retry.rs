use crate::time::sleep;

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

/// Retries a fallible asynchronous operation up to `times` additional
/// attempts.
///
/// `factory` builds a fresh future for every attempt. The returned
/// [`Retry`] future resolves with the first `Ok`, or with the last
/// `Err` once the attempts are exhausted.
pub fn retry<F, G>(times: usize, factory: G) -> Retry<G, F>
where
    G: FnMut() -> F,
    F: Future,
{
    Retry::new(times, factory)
}

/// Future returned by [`retry`].
///
/// Between failed attempts it optionally sleeps for a configurable
/// interval, see [`Retry::set_interval`].
pub struct Retry<G, F> {
    factory: G,
    future: Option<Pin<Box<F>>>,
    delay: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
    remaining: usize,
    interval: Duration,
}

impl<G, F> Retry<G, F> {
    fn new(times: usize, factory: G) -> Self {
        Self {
            factory,
            future: None,
            delay: None,
            remaining: times,
            interval: Duration::ZERO,
        }
    }

    /// Sets the pause between attempts. Defaults to no pause.
    pub fn set_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl<G, F, T, E> Future for Retry<G, F>
where
    G: FnMut() -> F,
    F: Future<Output = Result<T, E>> + 'static,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = unsafe { self.get_unchecked_mut() };

        if let Some(delay) = this.delay.as_mut() {
            match delay.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(()) => {
                    this.delay = None;
                }
            }
        }

        let attempt = this
            .future
            .get_or_insert_with(|| Box::pin((this.factory)()));

        match attempt.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,

            Poll::Ready(Ok(value)) => {
                this.future = None;
                Poll::Ready(Ok(value))
            }

            Poll::Ready(Err(err)) => {
                this.future = None;

                if this.remaining == 0 {
                    return Poll::Ready(Err(err));
                }
                this.remaining -= 1;

                if !this.interval.is_zero() {
                    this.delay = Some(Box::pin(sleep(this.interval)));
                }

                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }
}
