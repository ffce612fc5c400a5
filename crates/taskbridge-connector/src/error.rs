//! Connector error types.

use taskbridge_core::ConfigError;
use taskbridge_host::SubmitError;
use thiserror::Error;

use crate::events::EventKind;

/// Errors surfaced by connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// An event code outside the four known lifecycle kinds. Always a
    /// programming error on the firing side; never ignored.
    #[error("unrecognized connection event code: {0}")]
    UnrecognizedEvent(u32),

    /// The host refused a submitted task. The task was never scheduled,
    /// and nothing at this layer retries it.
    #[error("work submission rejected by host")]
    ExecutionRejected(#[from] SubmitError),

    /// A listener callback failed during event fan-out. Remaining
    /// listeners were not notified.
    #[error("listener failed while handling {kind:?} event")]
    Listener {
        kind: EventKind,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;
