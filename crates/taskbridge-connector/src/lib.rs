//! taskbridge-connector — pooled connections over a host-owned executor.
//!
//! Lets an application submit fire-and-forget tasks through a stable
//! handle while the thread pool backing execution stays with the
//! embedding host. The connector:
//!
//! - Creates and pools connection objects cheaply
//!   ([`ConnectionFactory::create_connection`])
//! - Matches reuse requests to pooled connections by request-criteria
//!   equality ([`ConnectionFactory::match_connection`])
//! - Bridges each submitted task into the host's work-submission facility
//!   ([`ExecutorHandle::submit`]) and fans lifecycle events out to
//!   registered observers
//!
//! # Architecture
//!
//! ```text
//! ConnectionFactory (injected Arc<dyn WorkSubmitter>)
//!   ├── create_connection → Arc<ManagedConnection>
//!   │     ├── listeners: Vec<Arc<dyn ConnectionEventListener>>
//!   │     ├── acquire_handle → ExecutorHandle ── submit ──▶ WorkSubmitter
//!   │     └── transaction_boundary → NullTransactionBoundary (no-op)
//!   └── match_connection(pool candidates, criteria) → first match
//! ```
//!
//! Every operation runs synchronously on the caller's thread except task
//! execution itself, which the host's submitter owns. The external pool
//! lends each connection to one owner at a time; see the individual types
//! for the locking discipline this implies.

pub mod connection;
pub mod error;
pub mod events;
pub mod factory;
pub mod handle;
pub mod transaction;

pub use connection::ManagedConnection;
pub use error::{ConnectorError, ConnectorResult};
pub use events::{ConnectionEvent, ConnectionEventListener, EventKind, ListenerError};
pub use factory::{ConnectionFactory, PoolCandidate};
pub use handle::ExecutorHandle;
pub use transaction::{NullTransactionBoundary, TransactionBoundary};
