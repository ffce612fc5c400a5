//! taskbridge-core — shared types for the taskbridge connector.
//!
//! Holds the value types every other taskbridge crate speaks:
//! - **RequestCriteria**: the equality-based matching key for pooled
//!   connections
//! - **ConnectorConfig**: toml-loadable connector settings
//! - **ConnectionMetadata / Identity**: introspection data surfaced to
//!   embedding hosts

pub mod config;
pub mod criteria;
pub mod types;

pub use config::{ConfigError, ConnectorConfig};
pub use criteria::RequestCriteria;
pub use types::{ConnectionMetadata, Identity};
