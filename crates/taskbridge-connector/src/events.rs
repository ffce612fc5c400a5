//! Connection lifecycle events and the listener capability.

use crate::error::{ConnectorError, ConnectorResult};
use crate::handle::ExecutorHandle;

/// The lifecycle transitions a managed connection reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The application closed its handle; the connection can go back to
    /// the pool.
    Closed,
    LocalTransactionStarted,
    LocalTransactionCommitted,
    LocalTransactionRolledback,
}

impl EventKind {
    /// Decode a raw event code as pool managers transmit them.
    ///
    /// Codes outside the four known kinds are a programming error on the
    /// firing side and are rejected, never silently dropped.
    pub fn from_code(code: u32) -> ConnectorResult<Self> {
        match code {
            1 => Ok(Self::Closed),
            2 => Ok(Self::LocalTransactionStarted),
            3 => Ok(Self::LocalTransactionCommitted),
            4 => Ok(Self::LocalTransactionRolledback),
            other => Err(ConnectorError::UnrecognizedEvent(other)),
        }
    }

    /// The wire code for this kind. Inverse of [`EventKind::from_code`].
    pub fn code(&self) -> u32 {
        match self {
            Self::Closed => 1,
            Self::LocalTransactionStarted => 2,
            Self::LocalTransactionCommitted => 3,
            Self::LocalTransactionRolledback => 4,
        }
    }
}

/// Read-only record handed to listeners when an event fires.
///
/// Carries the firing connection's current handle, when one is live.
#[derive(Debug, Clone)]
pub struct ConnectionEvent {
    kind: EventKind,
    handle: Option<ExecutorHandle>,
}

impl ConnectionEvent {
    pub(crate) fn new(kind: EventKind, handle: Option<ExecutorHandle>) -> Self {
        Self { kind, handle }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The firing connection's current handle reference.
    pub fn handle(&self) -> Option<&ExecutorHandle> {
        self.handle.as_ref()
    }
}

/// Error type listener callbacks may fail with.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Observer notified of a connection's lifecycle transitions.
///
/// Every callback defaults to a no-op, so implementors override only the
/// capabilities they care about. Callbacks run synchronously on the
/// thread that fired the event, in registration order; the first error
/// aborts the remaining notifications.
pub trait ConnectionEventListener: Send + Sync {
    fn on_local_transaction_started(&self, _event: &ConnectionEvent) -> Result<(), ListenerError> {
        Ok(())
    }

    fn on_local_transaction_committed(
        &self,
        _event: &ConnectionEvent,
    ) -> Result<(), ListenerError> {
        Ok(())
    }

    fn on_local_transaction_rolledback(
        &self,
        _event: &ConnectionEvent,
    ) -> Result<(), ListenerError> {
        Ok(())
    }

    fn on_closed(&self, _event: &ConnectionEvent) -> Result<(), ListenerError> {
        Ok(())
    }
}
