//! Per-post confirmation lanes
//!
//! The UI flips instantly, the backend must still see toggles for one post
//! in the order the user issued them, never overlapping. Each post gets a
//! lazily created lane: an unbounded channel drained by one worker task, one
//! job at a time. Lanes are fully independent across posts, and a job that
//! handles a failure internally never stalls the jobs queued behind it.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use tokio::sync::{mpsc, oneshot};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

struct QueuedJob {
    job: Job,
    done: oneshot::Sender<()>,
}

/// Resolves when an enqueued job has run to completion
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<()>,
}

impl Completion {
    /// Wait for the job to settle (success or handled failure)
    pub async fn settled(self) {
        let _ = self.rx.await;
    }
}

/// Serializes confirmation work per post.
///
/// `enqueue` appends to the post's lane and returns immediately; the
/// returned [`Completion`] resolves once that job has run. Jobs for a fixed
/// post execute strictly in enqueue order; jobs for distinct posts never
/// wait on each other.
#[derive(Debug, Default)]
pub struct ActionSequencer {
    lanes: Mutex<HashMap<String, mpsc::UnboundedSender<QueuedJob>>>,
}

impl ActionSequencer {
    /// Create a sequencer with no lanes
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `job` to the post's lane, creating the lane on first use.
    ///
    /// Jobs must handle their own errors: the lane runs each unit to
    /// completion and moves on regardless of the outcome inside it.
    pub fn enqueue(
        &self,
        post_id: &str,
        job: impl Future<Output = ()> + Send + 'static,
    ) -> Completion {
        let (done_tx, done_rx) = oneshot::channel();
        let queued = QueuedJob {
            job: Box::pin(job),
            done: done_tx,
        };

        let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = lanes
            .entry(post_id.to_string())
            .or_insert_with(|| spawn_lane(post_id));
        if let Err(mpsc::error::SendError(queued)) = tx.send(queued) {
            // Worker gone (runtime shutdown mid-flight); start a fresh lane.
            let fresh = spawn_lane(post_id);
            let _ = fresh.send(queued);
            lanes.insert(post_id.to_string(), fresh);
        }

        Completion { rx: done_rx }
    }

    /// Number of lanes created so far
    pub fn lane_count(&self) -> usize {
        self.lanes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn spawn_lane(post_id: &str) -> mpsc::UnboundedSender<QueuedJob> {
    let (tx, mut rx) = mpsc::unbounded_channel::<QueuedJob>();
    let post_id = post_id.to_string();

    tokio::spawn(async move {
        while let Some(queued) = rx.recv().await {
            queued.job.await;
            let _ = queued.done.send(());
        }
        tracing::debug!(post_id = %post_id, "confirmation lane drained");
    });

    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    type Log = Arc<Mutex<Vec<String>>>;

    fn record(log: &Log, entry: impl Into<String>) {
        log.lock().unwrap().push(entry.into());
    }

    #[tokio::test]
    async fn test_same_post_jobs_run_in_order_without_overlap() {
        let seq = ActionSequencer::new();
        let log: Log = Arc::default();

        // Earlier jobs sleep longer: only serialization keeps them ordered.
        let mut completions = Vec::new();
        for (i, delay_ms) in [30u64, 15, 1].into_iter().enumerate() {
            let log = Arc::clone(&log);
            completions.push(seq.enqueue("post-1", async move {
                record(&log, format!("start-{i}"));
                sleep(Duration::from_millis(delay_ms)).await;
                record(&log, format!("end-{i}"));
            }));
        }
        for completion in completions {
            completion.settled().await;
        }

        let entries = log.lock().unwrap().clone();
        assert_eq!(
            entries,
            vec!["start-0", "end-0", "start-1", "end-1", "start-2", "end-2"]
        );
        assert_eq!(seq.lane_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_job_does_not_stall_the_lane() {
        let seq = ActionSequencer::new();
        let log: Log = Arc::default();

        let l = Arc::clone(&log);
        let failing = seq.enqueue("post-1", async move {
            // The job catches its own error and returns normally.
            let result: anyhow::Result<()> = Err(anyhow::anyhow!("backend down"));
            if result.is_err() {
                record(&l, "failed");
            }
        });
        let l = Arc::clone(&log);
        let next = seq.enqueue("post-1", async move {
            record(&l, "ran-after-failure");
        });

        failing.settled().await;
        next.settled().await;
        assert_eq!(*log.lock().unwrap(), vec!["failed", "ran-after-failure"]);
    }

    #[tokio::test]
    async fn test_lanes_are_independent_across_posts() {
        let seq = ActionSequencer::new();
        let log: Log = Arc::default();
        let (gate_tx, gate_rx) = oneshot::channel::<()>();

        let l = Arc::clone(&log);
        let blocked = seq.enqueue("post-a", async move {
            let _ = gate_rx.await;
            record(&l, "a-done");
        });
        let l = Arc::clone(&log);
        let free = seq.enqueue("post-b", async move {
            record(&l, "b-done");
        });

        // post-b completes while post-a's lane is still blocked.
        free.settled().await;
        assert_eq!(*log.lock().unwrap(), vec!["b-done"]);

        let _ = gate_tx.send(());
        blocked.settled().await;
        assert_eq!(*log.lock().unwrap(), vec!["b-done", "a-done"]);
        assert_eq!(seq.lane_count(), 2);
    }
}
