//! ManagedConnection — the pooled, reusable unit.
//!
//! A managed connection mediates between application-visible executor
//! handles and the external pool that lends connections out. It owns the
//! listener set and fires lifecycle events; disposal decisions stay with
//! the pool (`cleanup` between lendings, `destroy` on eviction).
//!
//! The pool lends a connection to one owner at a time, so no operation
//! here expects concurrent callers on the same logical connection. The
//! interior mutexes exist for soundness across the `Arc`, not throughput.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use taskbridge_core::{ConnectionMetadata, RequestCriteria};
use taskbridge_host::WorkSubmitter;

use crate::error::{ConnectorError, ConnectorResult};
use crate::events::{ConnectionEvent, ConnectionEventListener, EventKind};
use crate::handle::ExecutorHandle;
use crate::transaction::NullTransactionBoundary;

/// One reusable pooled connection.
///
/// Created by [`ConnectionFactory`](crate::ConnectionFactory) with an
/// immutable criteria; equality and hashing delegate to that criteria, so
/// the factory's matching scan and pool-side de-duplication agree.
pub struct ManagedConnection {
    criteria: Option<RequestCriteria>,
    submitter: Arc<dyn WorkSubmitter>,
    metadata: ConnectionMetadata,
    /// The one live application handle, lazily created or swapped in by
    /// the pool via `associate`.
    handle: Mutex<Option<ExecutorHandle>>,
    /// Fan-out order is insertion order; duplicates allowed.
    listeners: Mutex<Vec<Arc<dyn ConnectionEventListener>>>,
}

impl ManagedConnection {
    pub(crate) fn new(
        criteria: Option<RequestCriteria>,
        submitter: Arc<dyn WorkSubmitter>,
        metadata: ConnectionMetadata,
    ) -> Arc<Self> {
        Arc::new(Self {
            criteria,
            submitter,
            metadata,
            handle: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        })
    }

    /// The criteria this connection was created with. Immutable.
    pub fn criteria(&self) -> Option<&RequestCriteria> {
        self.criteria.as_ref()
    }

    /// Create a new application-facing handle and cache it as the current
    /// one.
    ///
    /// `requested` is the caller's criteria; it is deliberately not
    /// validated against this connection's own criteria. Matching happens
    /// in the factory before the pool lends the connection out, never
    /// here.
    pub fn acquire_handle(
        self: &Arc<Self>,
        requested: Option<&RequestCriteria>,
    ) -> ExecutorHandle {
        debug!(requested = ?requested, "creating executor handle");
        let handle = ExecutorHandle::new(
            Arc::downgrade(self),
            Arc::clone(&self.submitter),
            self.criteria.clone(),
        );
        *self.handle.lock() = Some(handle.clone());
        handle
    }

    /// Swap in an externally supplied handle (pool reattachment).
    ///
    /// The previous handle reference is dropped. No event fires.
    pub fn associate(&self, handle: ExecutorHandle) {
        debug!("associating external handle");
        *self.handle.lock() = Some(handle);
    }

    /// Register a listener. Insertion order is fan-out order; duplicate
    /// registrations are kept and fire once per registration.
    pub fn add_listener(&self, listener: Arc<dyn ConnectionEventListener>) {
        self.listeners.lock().push(listener);
    }

    /// Unregister the first matching registration of `listener`.
    ///
    /// Removing a listener that was never added is a no-op.
    pub fn remove_listener(&self, listener: &Arc<dyn ConnectionEventListener>) {
        let mut listeners = self.listeners.lock();
        if let Some(position) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            listeners.remove(position);
        }
    }

    /// Fire `kind` to every registered listener, synchronously, in
    /// registration order.
    ///
    /// The first listener error aborts the remaining notifications and
    /// propagates to the caller.
    pub fn fire_event(&self, kind: EventKind) -> ConnectorResult<()> {
        let event = ConnectionEvent::new(kind, self.handle.lock().clone());
        // Snapshot so callbacks may add or remove listeners without
        // re-entering the lock. The snapshot is the fan-out set.
        let listeners: Vec<_> = self.listeners.lock().clone();
        debug!(?kind, listeners = listeners.len(), "firing connection event");
        for listener in listeners {
            let result = match kind {
                EventKind::Closed => listener.on_closed(&event),
                EventKind::LocalTransactionStarted => {
                    listener.on_local_transaction_started(&event)
                }
                EventKind::LocalTransactionCommitted => {
                    listener.on_local_transaction_committed(&event)
                }
                EventKind::LocalTransactionRolledback => {
                    listener.on_local_transaction_rolledback(&event)
                }
            };
            result.map_err(|source| ConnectorError::Listener { kind, source })?;
        }
        Ok(())
    }

    /// Signal the pool that this connection can be returned for reuse.
    ///
    /// Fires the `Closed` event; whether the connection is then re-lent
    /// or evicted is the pool's decision. No resources are freed here.
    pub fn close(&self) -> ConnectorResult<()> {
        debug!("closing connection");
        self.fire_event(EventKind::Closed)
    }

    /// Reset per-use state so the connection is safe to re-lend.
    ///
    /// Drops the cached handle. Idempotent: the pool may call it any
    /// number of times between lendings.
    pub fn cleanup(&self) {
        debug!("cleaning up connection");
        *self.handle.lock() = None;
    }

    /// Release the connection permanently.
    ///
    /// The pool calls this exactly once, on eviction. Any further use of
    /// the connection is outside the contract and is not runtime-checked.
    pub fn destroy(&self) {
        debug!("destroying connection");
        *self.handle.lock() = None;
        self.listeners.lock().clear();
    }

    /// Introspection record for this connection's backing facility.
    pub fn metadata(&self) -> ConnectionMetadata {
        self.metadata.clone()
    }

    /// The deliberately non-functional local-transaction boundary.
    ///
    /// See [`NullTransactionBoundary`] for what "non-functional" means.
    pub fn transaction_boundary(self: &Arc<Self>) -> NullTransactionBoundary {
        NullTransactionBoundary::new(Arc::downgrade(self))
    }

    #[cfg(test)]
    pub(crate) fn current_handle(&self) -> Option<ExecutorHandle> {
        self.handle.lock().clone()
    }
}

/// Connections are equal iff their criteria are equal (both absent counts
/// as equal). The factory's matching scan relies on this.
impl PartialEq for ManagedConnection {
    fn eq(&self, other: &Self) -> bool {
        self.criteria == other.criteria
    }
}

impl Eq for ManagedConnection {}

impl Hash for ManagedConnection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.criteria.hash(state);
    }
}

impl fmt::Debug for ManagedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedConnection")
            .field("criteria", &self.criteria)
            .field("has_handle", &self.handle.lock().is_some())
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}
