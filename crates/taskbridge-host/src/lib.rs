//! taskbridge-host — the host-side execution boundary.
//!
//! The connector never runs tasks itself; it hands them to a facility the
//! embedding host owns. This crate defines that boundary:
//!
//! - **Work**: the shape of a unit of work the host accepts (a consuming
//!   `run` entry point plus a `release` cancellation hook)
//! - **WorkSubmitter**: the single-method trait the connector calls to get
//!   a task scheduled, fire-and-forget
//! - **TokioWorkSubmitter**: a bounded reference submitter backed by a
//!   tokio runtime the host owns

pub mod submitter;
pub mod work;

pub use submitter::{SubmitError, TokioWorkSubmitter, WorkSubmitter};
pub use work::Work;
