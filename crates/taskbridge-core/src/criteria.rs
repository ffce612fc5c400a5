//! RequestCriteria — the matching key for pooled connections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Describes what kind of executor connection a caller wants.
///
/// Criteria are immutable value objects: a request can reuse a pooled
/// connection iff the two criteria compare equal. An absent criteria
/// (`None` wherever `Option<RequestCriteria>` appears in an API) is a
/// wildcard that matches any pooled connection.
///
/// Labels are kept in a `BTreeMap` so the derived `Hash` is deterministic
/// and stays consistent with `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestCriteria {
    /// Logical name of the requested executor, e.g. a queue or tenant.
    name: String,
    /// Additional matching labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
}

impl RequestCriteria {
    /// Create criteria for the named executor, with no labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Add a matching label. Later values replace earlier ones for the
    /// same key.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// The logical executor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The matching labels, in key order.
    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }
}
