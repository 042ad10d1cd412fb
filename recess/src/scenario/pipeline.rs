//! A producer, filter and consumer chained through queues.
//!
//! Words flow from a set of producer tasks into a checker task, which
//! forwards acceptable words to a reporter task and collects the rest.
//! Shutdown travels in-band: a distinguished stop word follows the
//! last real item through every queue, so each stage drains fully
//! before exiting.

use crate::offload::spawn_blocking;
use crate::sync::Queue;
use crate::task::{JoinError, TaskGroup, spawn};

use std::sync::Arc;

/// Tuning knobs for [`run`].
pub struct PipelineConfig {
    /// In-band shutdown token. Must not collide with real input.
    pub stop_word: String,

    /// Queue capacity. `None` means unbounded.
    pub capacity: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            stop_word: "!!!STOP!!!".to_string(),
            capacity: None,
        }
    }
}

/// What came out the other end of the pipeline.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Words the checker let through, in arrival order.
    pub accepted: Vec<String>,

    /// Words the checker turned away, in arrival order.
    pub rejected: Vec<String>,
}

/// Runs the pipeline over `words`.
///
/// One producer task per word pushes its word into the inbound queue
/// after pacing itself with `work` on the offload pool. The checker
/// applies `is_valid` and forwards matches to the reporter. Once every
/// producer has finished, the stop word is enqueued and chases the
/// remaining items through both queues.
pub async fn run<V, W>(
    words: Vec<String>,
    config: PipelineConfig,
    is_valid: V,
    work: W,
) -> Result<PipelineReport, JoinError>
where
    V: Fn(&str) -> bool + Send + Sync + 'static,
    W: Fn(usize) -> u64 + Send + Sync + 'static,
{
    let inbound: Arc<Queue<String>> = Arc::new(match config.capacity {
        Some(capacity) => Queue::bounded(capacity),
        None => Queue::new(),
    });
    let outbound: Arc<Queue<String>> = Arc::new(match config.capacity {
        Some(capacity) => Queue::bounded(capacity),
        None => Queue::new(),
    });

    let stop_word = config.stop_word;
    let work = Arc::new(work);

    // Reporter: collect accepted words until the stop word arrives.
    let reporter = {
        let outbound = outbound.clone();
        let stop_word = stop_word.clone();

        spawn(async move {
            let mut accepted = Vec::new();

            while let Ok(word) = outbound.get().await {
                if word == stop_word {
                    break;
                }
                log::debug!("reporter accepted {word:?}");
                accepted.push(word);
            }

            accepted
        })
    };

    // Checker: filter the inbound stream and forward the stop word so
    // the reporter shuts down after the last forwarded item.
    let checker = {
        let inbound = inbound.clone();
        let outbound = outbound.clone();
        let stop_word = stop_word.clone();

        spawn(async move {
            let mut rejected = Vec::new();

            while let Ok(word) = inbound.get().await {
                if word == stop_word {
                    let _ = outbound.put(word).await;
                    break;
                }

                if is_valid(&word) {
                    let _ = outbound.put(word).await;
                } else {
                    log::info!("checker rejected {word:?}");
                    rejected.push(word);
                }
            }

            rejected
        })
    };

    let mut producers = TaskGroup::new();

    for (index, word) in words.into_iter().enumerate() {
        let inbound = inbound.clone();
        let work = work.clone();

        producers.spawn(async move {
            if let Err(err) = spawn_blocking(move || work(index)).await {
                log::warn!("producer pacing failed: {err}");
            }

            let _ = inbound.put(word).await;
        });
    }

    producers.join_all().await?;

    let _ = inbound.put(stop_word).await;

    let rejected = checker.await?;
    let accepted = reporter.await?;

    Ok(PipelineReport { accepted, rejected })
}
