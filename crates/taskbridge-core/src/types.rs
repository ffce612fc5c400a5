//! Shared data types surfaced by the connector.

use serde::{Deserialize, Serialize};

/// An already-authenticated identity supplied by the embedding host.
///
/// The connector performs no authentication of its own. The identity is
/// injected where needed and only ever read back out, through
/// [`ConnectionMetadata::user_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    name: String,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Introspection record describing a connection's backing facility.
///
/// Pure data: producing it has no side effects, and `max_connections` is
/// advisory (the external pool enforces its own limits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionMetadata {
    pub product_name: String,
    pub product_version: String,
    /// Advisory upper bound on concurrent requests.
    pub max_connections: u32,
    /// Authenticated user, when the host supplied one.
    pub user_name: Option<String>,
}
