//! Rate-limited task queue for AcoustID lookups.
//!
//! AcoustID allows 3 requests per second per API key. Every identification
//! pipeline (fingerprint + lookup) is submitted here and executed by a single
//! worker task, so at most one pipeline runs at a time and successive starts
//! are spaced at least `1s / requests_per_second` apart.
//!
//! ```ignore
//! let queue = RateLimitedQueue::new(3.0)?;
//! let answer = queue.submit(|| async { 42 }).await?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

/// A submitted piece of work, type-erased so tasks of any output type share one FIFO.
///
/// The boxed future owns the completion sender, so running it resolves the
/// submitter exactly once; dropping it unpolled resolves them with an error.
struct QueuedTask {
    seq: u64,
    job: BoxFuture<'static, ()>,
}

/// Queue errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("requests per second must be a positive number, got {0}")]
    InvalidRate(String),

    #[error("queue worker has shut down")]
    Closed,

    #[error("task aborted before producing a result")]
    TaskAborted,
}

/// Serializes async work with a minimum spacing between task starts
pub struct RateLimitedQueue {
    sender: mpsc::UnboundedSender<QueuedTask>,
    waiting: Arc<AtomicUsize>,
    next_seq: AtomicU64,
    min_interval: Duration,
}

impl RateLimitedQueue {
    /// Create a queue and spawn its worker on the current tokio runtime.
    pub fn new(requests_per_second: f64) -> Result<Self, QueueError> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(QueueError::InvalidRate(requests_per_second.to_string()));
        }

        let min_interval = Duration::try_from_secs_f64(1.0 / requests_per_second)
            .map_err(|_| QueueError::InvalidRate(requests_per_second.to_string()))?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let waiting = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_worker(receiver, Arc::clone(&waiting), min_interval));

        tracing::info!(
            requests_per_second,
            min_interval_ms = min_interval.as_millis() as u64,
            "Rate-limited queue started"
        );

        Ok(Self {
            sender,
            waiting,
            next_seq: AtomicU64::new(0),
            min_interval,
        })
    }

    /// Minimum spacing between task starts
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of tasks waiting for their turn (the running task is not counted)
    pub fn len(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Append `work` to the tail of the queue.
    ///
    /// The task is enqueued before this returns, so start order follows call
    /// order no matter when the returned future is awaited. `work` is not
    /// invoked until the worker reaches it. Errors carried in `T` belong to
    /// this submitter only; other queued tasks are unaffected.
    pub fn submit<T, F, Fut>(
        &self,
        work: F,
    ) -> impl Future<Output = Result<T, QueueError>> + Send + use<T, F, Fut>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let job = async move {
            let output = work().await;
            // Submitter may have stopped waiting; nothing to do then
            let _ = done_tx.send(output);
        }
        .boxed();

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        // Count before sending so the worker's decrement can never run first
        self.waiting.fetch_add(1, Ordering::SeqCst);
        let queued = if self.sender.send(QueuedTask { seq, job }).is_err() {
            self.waiting.fetch_sub(1, Ordering::SeqCst);
            Err(QueueError::Closed)
        } else {
            tracing::debug!(seq, waiting = self.len(), "Task queued");
            Ok(done_rx)
        };

        async move { queued?.await.map_err(|_| QueueError::TaskAborted) }
    }
}

/// Worker loop: one task at a time, starts spaced by `min_interval`.
///
/// The next task is only received after the previous one has settled, so a
/// slow task pushes later starts back instead of overlapping with them.
async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<QueuedTask>,
    waiting: Arc<AtomicUsize>,
    min_interval: Duration,
) {
    let mut last_start: Option<Instant> = None;

    while let Some(task) = receiver.recv().await {
        if let Some(prev) = last_start {
            // tokio clamps oversized sleeps, so huge intervals cannot overflow
            let elapsed = prev.elapsed();
            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }

        waiting.fetch_sub(1, Ordering::SeqCst);
        last_start = Some(Instant::now());
        tracing::debug!(seq = task.seq, "Task started");

        // Own tokio task so a panic only fails this submitter
        if let Err(e) = tokio::spawn(task.job).await {
            tracing::warn!(seq = task.seq, "Queued task aborted: {}", e);
        }
    }

    tracing::debug!("Rate-limited queue worker stopped");
}
