//! ConnectionFactory — creates managed connections and matches reuse
//! requests against a candidate pool.
//!
//! The factory never pools anything itself: `create_connection` always
//! allocates fresh, and reuse happens only when the external pool manager
//! asks `match_connection` to pick among the connections it already
//! holds.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, warn};

use taskbridge_core::{
    ConfigError, ConnectionMetadata, ConnectorConfig, Identity, RequestCriteria,
};
use taskbridge_host::WorkSubmitter;

use crate::connection::ManagedConnection;
use crate::error::ConnectorResult;

/// Candidate entry in an externally managed pool.
///
/// Pools owned by the embedding host may hold arbitrary resource types;
/// matching downcasts each entry and skips foreign ones.
pub type PoolCandidate = Arc<dyn Any + Send + Sync>;

/// Creates [`ManagedConnection`]s and selects reusable candidates.
///
/// The work submitter is injected here and threaded into every connection
/// and handle the factory produces; nothing in this workspace reaches for
/// ambient global state to find the host.
pub struct ConnectionFactory {
    submitter: Arc<dyn WorkSubmitter>,
    product_name: String,
    product_version: String,
    /// Advisory only; surfaced through metadata, enforced by nobody here.
    max_concurrent_requests: AtomicU32,
    identity: Option<Identity>,
}

impl ConnectionFactory {
    /// Create a factory submitting through `submitter`, configured by
    /// `config`.
    pub fn new(submitter: Arc<dyn WorkSubmitter>, config: ConnectorConfig) -> Self {
        Self {
            submitter,
            product_name: config.product_name,
            product_version: config.product_version,
            max_concurrent_requests: AtomicU32::new(config.max_concurrent_requests),
            identity: None,
        }
    }

    /// Attach the already-authenticated identity connections should report
    /// through their metadata.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// The advisory concurrent-request bound.
    pub fn max_concurrent_requests(&self) -> u32 {
        self.max_concurrent_requests.load(Ordering::Relaxed)
    }

    /// Update the advisory bound. The only constraint is that it stays
    /// at least 1.
    pub fn set_max_concurrent_requests(&self, value: u32) -> ConnectorResult<()> {
        if value < 1 {
            return Err(ConfigError::InvalidMaxConcurrentRequests.into());
        }
        self.max_concurrent_requests.store(value, Ordering::Relaxed);
        debug!(value, "advisory max concurrent requests updated");
        Ok(())
    }

    /// Create a fresh managed connection with the given criteria.
    ///
    /// Always allocates. Reuse across allocations is the matcher's job at
    /// match time, never the factory's at creation time.
    pub fn create_connection(
        &self,
        criteria: Option<RequestCriteria>,
    ) -> Arc<ManagedConnection> {
        debug!(?criteria, "creating managed connection");
        ManagedConnection::new(criteria, Arc::clone(&self.submitter), self.metadata())
    }

    /// Select a reusable connection from `candidates`.
    ///
    /// Linear scan in slice order, first match wins. A candidate matches
    /// when its stored criteria equals `criteria`; a `None` criteria is a
    /// wildcard request that takes the first managed connection in scan
    /// order. Entries that are not managed connections are skipped with a
    /// warning, never an error.
    ///
    /// The caller owns the pool and its locking: when the pool can be
    /// mutated concurrently, call this under the pool's own lock.
    pub fn match_connection(
        &self,
        candidates: &[PoolCandidate],
        criteria: Option<&RequestCriteria>,
    ) -> Option<Arc<ManagedConnection>> {
        for candidate in candidates {
            let Ok(connection) = candidate.clone().downcast::<ManagedConnection>() else {
                warn!("pool candidate is not a managed connection, skipping");
                continue;
            };
            if Self::matches(connection.criteria(), criteria) {
                debug!(criteria = ?connection.criteria(), "matched pooled connection");
                return Some(connection);
            }
        }
        debug!(requested = ?criteria, "no reusable connection in pool");
        None
    }

    fn matches(stored: Option<&RequestCriteria>, requested: Option<&RequestCriteria>) -> bool {
        match requested {
            // Wildcard request: any pooled connection will do.
            None => true,
            Some(requested) => stored == Some(requested),
        }
    }

    fn metadata(&self) -> ConnectionMetadata {
        ConnectionMetadata {
            product_name: self.product_name.clone(),
            product_version: self.product_version.clone(),
            max_connections: self.max_concurrent_requests(),
            user_name: self.identity.as_ref().map(|i| i.name().to_string()),
        }
    }
}
