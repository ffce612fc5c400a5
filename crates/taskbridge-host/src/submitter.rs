//! WorkSubmitter — the host's asynchronous work-acceptance facility.
//!
//! Submission is fire-and-forget: `start_work` returns once a task is
//! accepted for execution, never when it completes. A refusal (capacity,
//! lifecycle) is reported synchronously and exactly once; retrying is the
//! caller's decision, not this layer's.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::work::Work;

/// Errors the host reports when refusing a unit of work.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submitter at capacity ({capacity} tasks in flight)")]
    AtCapacity { capacity: usize },

    #[error("submitter has shut down")]
    ShutDown,
}

/// The facility capable of accepting a task and running it asynchronously.
///
/// This is the only method the connector ever calls on the host. Ordering
/// between accepted tasks is the implementor's contract; nothing upstream
/// assumes submission order equals execution order.
pub trait WorkSubmitter: Send + Sync {
    /// Accept `work` for asynchronous execution, or refuse it.
    fn start_work(&self, work: Box<dyn Work>) -> Result<(), SubmitError>;
}

/// Bounded submitter backed by a tokio runtime the host owns.
///
/// Capacity is enforced with a semaphore: each accepted task holds a
/// permit until its body finishes, and a full submitter refuses rather
/// than queues. Task bodies are synchronous, so they run on the runtime's
/// blocking pool. `shutdown` stops acceptance; in-flight work is
/// unaffected.
pub struct TokioWorkSubmitter {
    handle: Handle,
    permits: Arc<Semaphore>,
    capacity: usize,
    accepting: AtomicBool,
}

impl TokioWorkSubmitter {
    /// Create a submitter dispatching onto `handle`, refusing work beyond
    /// `capacity` concurrent tasks.
    pub fn new(handle: Handle, capacity: usize) -> Self {
        Self {
            handle,
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            accepting: AtomicBool::new(true),
        }
    }

    /// Create a submitter on the current runtime.
    ///
    /// Panics outside a tokio runtime context, same as
    /// [`Handle::current`].
    pub fn current(capacity: usize) -> Self {
        Self::new(Handle::current(), capacity)
    }

    /// The configured concurrency cap.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of accepted tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    /// Stop accepting new work. Already-accepted tasks keep running.
    pub fn shutdown(&self) {
        self.accepting.store(false, Ordering::SeqCst);
        debug!("work submitter shut down");
    }
}

impl WorkSubmitter for TokioWorkSubmitter {
    fn start_work(&self, work: Box<dyn Work>) -> Result<(), SubmitError> {
        if !self.accepting.load(Ordering::SeqCst) {
            warn!("work refused: submitter has shut down");
            return Err(SubmitError::ShutDown);
        }

        let Ok(permit) = self.permits.clone().try_acquire_owned() else {
            warn!(capacity = self.capacity, "work refused: at capacity");
            return Err(SubmitError::AtCapacity {
                capacity: self.capacity,
            });
        };

        self.handle.spawn_blocking(move || {
            work.run();
            drop(permit);
        });
        debug!(in_flight = self.in_flight(), "work accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[tokio::test]
    async fn accepted_work_runs() {
        let submitter = TokioWorkSubmitter::current(2);
        let (tx, rx) = mpsc::channel();

        submitter
            .start_work(Box::new(move || tx.send(42).unwrap()))
            .unwrap();

        let value = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn zero_capacity_refuses_without_running() {
        let submitter = TokioWorkSubmitter::current(0);
        let (tx, rx) = mpsc::channel();

        let result = submitter.start_work(Box::new(move || tx.send(()).unwrap()));

        assert!(matches!(
            result,
            Err(SubmitError::AtCapacity { capacity: 0 })
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn refuses_beyond_capacity_while_tasks_hold_permits() {
        let submitter = TokioWorkSubmitter::current(1);
        let (release_tx, release_rx) = mpsc::channel::<()>();

        submitter
            .start_work(Box::new(move || {
                let _ = release_rx.recv_timeout(Duration::from_secs(5));
            }))
            .unwrap();
        assert_eq!(submitter.in_flight(), 1);

        let overflow = submitter.start_work(Box::new(|| {}));
        assert!(matches!(overflow, Err(SubmitError::AtCapacity { .. })));

        release_tx.send(()).unwrap();
    }

    #[tokio::test]
    async fn shutdown_refuses_new_work() {
        let submitter = TokioWorkSubmitter::current(4);
        submitter.shutdown();

        let result = submitter.start_work(Box::new(|| {}));
        assert!(matches!(result, Err(SubmitError::ShutDown)));
    }

    #[tokio::test]
    async fn start_work_returns_before_the_task_completes() {
        let submitter = TokioWorkSubmitter::current(1);
        let (started_tx, started_rx) = mpsc::channel();
        let (finish_tx, finish_rx) = mpsc::channel::<()>();

        submitter
            .start_work(Box::new(move || {
                started_tx.send(()).unwrap();
                let _ = finish_rx.recv_timeout(Duration::from_secs(5));
            }))
            .unwrap();

        // start_work already returned; the task is still blocked on the
        // channel, proving acceptance is decoupled from completion.
        tokio::task::spawn_blocking(move || started_rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submitter.in_flight(), 1);
        finish_tx.send(()).unwrap();
    }
}
