//! A supervised task tree with timed-out shutdown.
//!
//! A parent task starts a child, lets it spin up helper tasks of its
//! own, then gives it a bounded window to finish. A child that blows
//! the deadline is cancelled, and cancellation cascades down to the
//! helpers, each of which gets to run its cleanup on the way out.

use crate::offload::spawn_blocking;
use crate::runtime::yield_now::yield_now;
use crate::sync::Event;
use crate::task::{JoinError, TaskGroup, spawn};
use crate::time::{sleep, timeout};
use crate::tools::retry;

#[cfg(unix)]
use crate::sync::{Signal, SignalEvent};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Tuning knobs for [`supervise`].
pub struct SupervisorConfig {
    /// How long the parent waits before giving the go signal.
    pub grace: Duration,

    /// How long the child may run after the go signal.
    pub join_timeout: Duration,

    /// How long each wait for the go signal lasts before retrying.
    pub start_retry: Duration,

    /// Extra attempts the child makes to catch the go signal.
    pub start_retries: usize,

    /// Names for the helper tasks the child spins up.
    pub friends: Vec<String>,

    /// Number of work items the child pushes through the offload pool.
    pub work_items: u64,

    /// Where the launch countdown starts.
    pub countdown_from: u32,

    /// Pause between countdown steps.
    pub countdown_tick: Duration,

    /// How long the child and its helpers play before wrapping up.
    pub play_time: Duration,

    /// Signals that must arrive before the go signal is given.
    #[cfg(unix)]
    pub interrupt: Option<Vec<Signal>>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            grace: Duration::from_millis(50),
            join_timeout: Duration::from_secs(10),
            start_retry: Duration::from_millis(100),
            start_retries: 10,
            friends: vec![
                "Max".to_string(),
                "Lillian".to_string(),
                "Thomas".to_string(),
            ],
            work_items: 10,
            countdown_from: 3,
            countdown_tick: Duration::from_millis(10),
            play_time: Duration::from_millis(100),
            #[cfg(unix)]
            interrupt: None,
        }
    }
}

/// How the supervised run ended.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SupervisorReport {
    /// Whether the child had to be cancelled.
    pub timed_out: bool,

    /// Helpers that were sent home early by cancellation.
    pub friends_cancelled: usize,

    /// Sum of the offloaded work results the child finished.
    pub work_total: u64,
}

/// Runs the parent/child scenario to completion.
///
/// `work` is the per-item computation the child offloads; its results
/// are summed into the report.
pub async fn supervise<W>(config: SupervisorConfig, work: W) -> Result<SupervisorReport, JoinError>
where
    W: Fn(u64) -> u64 + Send + Sync + 'static,
{
    let start = Arc::new(Event::new());
    let work_total = Arc::new(AtomicU64::new(0));
    let friends_cancelled = Arc::new(AtomicUsize::new(0));

    let mut child = spawn(kid(
        start.clone(),
        work_total.clone(),
        friends_cancelled.clone(),
        config.start_retry,
        config.start_retries,
        config.friends.clone(),
        config.work_items,
        config.play_time,
        Arc::new(work),
    ));

    log::info!("parent minding its own business");
    sleep(config.grace).await;

    #[cfg(unix)]
    if let Some(signals) = &config.interrupt {
        let interrupt =
            SignalEvent::new(signals).map_err(|err| JoinError::Panicked(err.to_string()))?;
        log::info!("parent waiting to be interrupted");
        interrupt.wait().await;
    }

    log::info!("parent says it's time to play");
    start.set();

    countdown(config.countdown_from, config.countdown_tick).await;

    let mut timed_out = false;

    match timeout(config.join_timeout, &mut child).await {
        Ok(result) => result?,
        Err(_) => {
            log::warn!("child took too long, cancelling");
            child.cancel();
            let _ = child.await;
            timed_out = true;
        }
    }

    // Let any just-cancelled helpers finish their cleanup.
    yield_now().await;

    Ok(SupervisorReport {
        timed_out,
        friends_cancelled: friends_cancelled.load(Ordering::Acquire),
        work_total: work_total.load(Ordering::Acquire),
    })
}

async fn countdown(from: u32, tick: Duration) {
    for n in (1..=from).rev() {
        log::info!("T-minus {n}");
        sleep(tick).await;
    }
}

#[allow(clippy::too_many_arguments)]
async fn kid(
    start: Arc<Event>,
    work_total: Arc<AtomicU64>,
    friends_cancelled: Arc<AtomicUsize>,
    start_retry: Duration,
    start_retries: usize,
    friends: Vec<String>,
    work_items: u64,
    play_time: Duration,
    work: Arc<dyn Fn(u64) -> u64 + Send + Sync>,
) {
    log::info!("child waiting for permission");

    let permitted = retry(start_retries, move || {
        let start = start.clone();
        async move { start.wait_timeout(start_retry).await }
    })
    .await;

    if permitted.is_err() {
        log::warn!("child never got permission to play");
        return;
    }

    log::info!("child building a fort");

    let mut group = TaskGroup::new();
    for name in friends {
        group.spawn(friend(name, play_time, friends_cancelled.clone()));
    }

    for n in 0..work_items {
        let work = work.clone();
        match spawn_blocking(move || work(n)).await {
            Ok(value) => {
                work_total.fetch_add(value, Ordering::AcqRel);
            }
            Err(err) => log::warn!("offloaded work failed: {err}"),
        }
    }

    sleep(play_time).await;

    group.shutdown().await;
    log::info!("child done playing");
}

async fn friend(name: String, play_time: Duration, cancelled: Arc<AtomicUsize>) {
    log::info!("hi, my name is {name}");

    let mut guard = HomeGuard {
        name,
        cancelled,
        armed: true,
    };

    sleep(play_time).await;

    guard.armed = false;
    log::info!("{} heading home on time", guard.name);
}

/// Counts the helper as sent home early unless disarmed first.
struct HomeGuard {
    name: String,
    cancelled: Arc<AtomicUsize>,
    armed: bool,
}

impl Drop for HomeGuard {
    fn drop(&mut self) {
        if self.armed {
            self.cancelled.fetch_add(1, Ordering::AcqRel);
            log::info!("{} going home early", self.name);
        }
    }
}
