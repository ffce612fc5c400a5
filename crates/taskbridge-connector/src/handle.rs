//! ExecutorHandle — the application-facing submission handle.
//!
//! The handle is the bridge between a caller's synchronous "run this" and
//! the host's asynchronous work-submission contract: `submit` wraps the
//! task into the host's `Work` shape and forwards it, returning as soon
//! as the host accepts it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use tracing::warn;

use taskbridge_core::RequestCriteria;
use taskbridge_host::WorkSubmitter;

use crate::connection::ManagedConnection;
use crate::error::ConnectorResult;

/// Handle through which the application submits fire-and-forget tasks.
///
/// Holds a weak back-reference to its owning [`ManagedConnection`] — used
/// only to signal close, never to extend the connection's lifetime — and
/// delegates equality to the owner's criteria, so handles obtained from
/// equal-criteria connections compare equal for pool-side de-duplication.
#[derive(Clone)]
pub struct ExecutorHandle {
    connection: Weak<ManagedConnection>,
    submitter: Arc<dyn WorkSubmitter>,
    /// Owner's criteria, snapshotted at creation (the owner's criteria is
    /// immutable, so the snapshot cannot go stale).
    criteria: Option<RequestCriteria>,
}

impl ExecutorHandle {
    pub(crate) fn new(
        connection: Weak<ManagedConnection>,
        submitter: Arc<dyn WorkSubmitter>,
        criteria: Option<RequestCriteria>,
    ) -> Self {
        Self {
            connection,
            submitter,
            criteria,
        }
    }

    /// Submit a task for asynchronous execution.
    ///
    /// Returns once the host accepts the task, not when it completes; no
    /// ordering is guaranteed between tasks submitted through the same
    /// handle. Refusal surfaces as
    /// [`ConnectorError::ExecutionRejected`](crate::ConnectorError) — the
    /// task was never scheduled in that case, and this layer does not
    /// retry.
    pub fn submit<F>(&self, task: F) -> ConnectorResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submitter
            .start_work(Box::new(task))
            .inspect_err(|error| warn!(%error, "host refused submitted work"))?;
        Ok(())
    }

    /// Close the handle, signalling the owning connection.
    ///
    /// Triggers the owner's `Closed` fan-out. A handle whose connection
    /// is already gone closes as a no-op.
    pub fn close(&self) -> ConnectorResult<()> {
        match self.connection.upgrade() {
            Some(connection) => connection.close(),
            None => Ok(()),
        }
    }

    /// The owning connection's criteria.
    pub fn criteria(&self) -> Option<&RequestCriteria> {
        self.criteria.as_ref()
    }
}

/// Two handles are the same logical connection iff their owners' criteria
/// are equal.
impl PartialEq for ExecutorHandle {
    fn eq(&self, other: &Self) -> bool {
        self.criteria == other.criteria
    }
}

impl Eq for ExecutorHandle {}

impl Hash for ExecutorHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.criteria.hash(state);
    }
}

impl fmt::Debug for ExecutorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorHandle")
            .field("criteria", &self.criteria)
            .field("connection_alive", &(self.connection.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    use parking_lot::Mutex;

    use taskbridge_core::ConnectionMetadata;
    use taskbridge_host::{SubmitError, TokioWorkSubmitter, Work};

    use crate::error::ConnectorError;
    use crate::events::{ConnectionEvent, ConnectionEventListener, ListenerError};

    /// Accepts work and parks it for the test to run later.
    struct RecordingSubmitter {
        accepted: Mutex<Vec<Box<dyn Work>>>,
    }

    impl RecordingSubmitter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                accepted: Mutex::new(Vec::new()),
            })
        }
    }

    impl WorkSubmitter for RecordingSubmitter {
        fn start_work(&self, work: Box<dyn Work>) -> Result<(), SubmitError> {
            self.accepted.lock().push(work);
            Ok(())
        }
    }

    struct RejectingSubmitter;

    impl WorkSubmitter for RejectingSubmitter {
        fn start_work(&self, _work: Box<dyn Work>) -> Result<(), SubmitError> {
            Err(SubmitError::AtCapacity { capacity: 0 })
        }
    }

    fn test_metadata() -> ConnectionMetadata {
        ConnectionMetadata {
            product_name: "taskbridge".to_string(),
            product_version: "0.1.0".to_string(),
            max_connections: 2,
            user_name: None,
        }
    }

    fn conn_with(
        criteria: Option<RequestCriteria>,
        submitter: Arc<dyn WorkSubmitter>,
    ) -> Arc<ManagedConnection> {
        ManagedConnection::new(criteria, submitter, test_metadata())
    }

    #[test]
    fn submit_forwards_exactly_one_work_item_per_call() {
        let submitter = RecordingSubmitter::new();
        let connection = conn_with(None, submitter.clone());
        let handle = connection.acquire_handle(None);

        handle.submit(|| {}).unwrap();
        assert_eq!(submitter.accepted.lock().len(), 1);

        handle.submit(|| {}).unwrap();
        assert_eq!(submitter.accepted.lock().len(), 2);
    }

    #[test]
    fn submitted_wrapper_invokes_the_task_when_run() {
        let submitter = RecordingSubmitter::new();
        let connection = conn_with(None, submitter.clone());
        let handle = connection.acquire_handle(None);

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        handle
            .submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        // Accepted but not yet executed.
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        let work = submitter.accepted.lock().pop().unwrap();
        work.run();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rejected_submission_surfaces_and_task_never_runs() {
        let connection = conn_with(None, Arc::new(RejectingSubmitter));
        let handle = connection.acquire_handle(None);

        let ran = Arc::new(AtomicUsize::new(0));
        let counter = ran.clone();
        let result = handle.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(matches!(
            result,
            Err(ConnectorError::ExecutionRejected(
                SubmitError::AtCapacity { .. }
            ))
        ));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn close_signals_the_owning_connection() {
        struct ClosedFlag(AtomicUsize);
        impl ConnectionEventListener for ClosedFlag {
            fn on_closed(&self, _event: &ConnectionEvent) -> Result<(), ListenerError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let submitter = RecordingSubmitter::new();
        let connection = conn_with(None, submitter);
        let listener = Arc::new(ClosedFlag(AtomicUsize::new(0)));
        connection.add_listener(listener.clone());

        let handle = connection.acquire_handle(None);
        handle.close().unwrap();

        assert_eq!(listener.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_after_owner_dropped_is_a_noop() {
        let submitter = RecordingSubmitter::new();
        let handle = {
            let connection = conn_with(None, submitter);
            connection.acquire_handle(None)
        };
        // The connection cached a copy of the handle, but the handle only
        // holds the connection weakly, so dropping the Arc freed it.
        assert!(handle.close().is_ok());
    }

    #[test]
    fn handles_from_equal_criteria_connections_compare_equal() {
        let submitter = RecordingSubmitter::new();
        let a = conn_with(Some(RequestCriteria::new("reports")), submitter.clone());
        let b = conn_with(Some(RequestCriteria::new("reports")), submitter.clone());
        let c = conn_with(Some(RequestCriteria::new("imports")), submitter);

        assert_eq!(a.acquire_handle(None), b.acquire_handle(None));
        assert_ne!(a.acquire_handle(None), c.acquire_handle(None));
    }

    #[tokio::test]
    async fn submit_through_tokio_submitter_runs_the_task() {
        let submitter = Arc::new(TokioWorkSubmitter::current(2));
        let connection = conn_with(Some(RequestCriteria::new("reports")), submitter);
        let handle = connection.acquire_handle(None);

        let (tx, rx) = mpsc::channel();
        handle.submit(move || tx.send("done").unwrap()).unwrap();

        let result =
            tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
                .await
                .unwrap()
                .unwrap();
        assert_eq!(result, "done");
    }
}
