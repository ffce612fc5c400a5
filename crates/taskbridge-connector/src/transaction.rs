//! Local-transaction boundary stub.
//!
//! Task submission has no transactional semantics, but embedding hosts
//! drive a begin/commit/rollback protocol around connection use and
//! expect the matching lifecycle events. The boundary here satisfies that
//! protocol while deliberately performing no transactional work.

use std::sync::Weak;

use tracing::debug;

use crate::connection::ManagedConnection;
use crate::error::ConnectorResult;
use crate::events::EventKind;

/// The begin/commit/rollback capability an embedding host drives.
pub trait TransactionBoundary {
    fn begin(&self) -> ConnectorResult<()>;
    fn commit(&self) -> ConnectorResult<()>;
    fn rollback(&self) -> ConnectorResult<()>;
}

/// The deliberate no-op boundary.
///
/// Each operation logs, fires the corresponding lifecycle event on the
/// owning connection, and changes nothing else — there is no transaction
/// to begin, commit, or roll back. This is by contract, not an omission:
/// submitted work is fire-and-forget and cannot be unwound.
pub struct NullTransactionBoundary {
    connection: Weak<ManagedConnection>,
}

impl NullTransactionBoundary {
    pub(crate) fn new(connection: Weak<ManagedConnection>) -> Self {
        Self { connection }
    }

    fn fire(&self, kind: EventKind) -> ConnectorResult<()> {
        match self.connection.upgrade() {
            Some(connection) => connection.fire_event(kind),
            // Owner already evicted; nobody left to notify.
            None => Ok(()),
        }
    }
}

impl TransactionBoundary for NullTransactionBoundary {
    fn begin(&self) -> ConnectorResult<()> {
        debug!("local transaction begin (no-op boundary)");
        self.fire(EventKind::LocalTransactionStarted)
    }

    fn commit(&self) -> ConnectorResult<()> {
        debug!("local transaction commit (no-op boundary)");
        self.fire(EventKind::LocalTransactionCommitted)
    }

    fn rollback(&self) -> ConnectorResult<()> {
        debug!("local transaction rollback (no-op boundary)");
        self.fire(EventKind::LocalTransactionRolledback)
    }
}
