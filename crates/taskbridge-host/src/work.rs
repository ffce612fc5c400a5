//! Work — the host-facing shape of a unit of work.

/// A unit of work accepted by a [`WorkSubmitter`](crate::WorkSubmitter).
///
/// `run` consumes the work and executes the task body on whatever thread
/// the host dispatches it to. `release` is the host's cancellation hook;
/// it defaults to a no-op, and the connector never calls it.
pub trait Work: Send + 'static {
    /// Execute the task body. Called at most once.
    fn run(self: Box<Self>);

    /// Hint from the host that the work should wind down. No-op by default.
    fn release(&self) {}
}

/// Any sendable closure is submittable work as-is; the connector's bridge
/// relies on this to wrap application tasks without a dedicated adapter
/// type.
impl<F> Work for F
where
    F: FnOnce() + Send + 'static,
{
    fn run(self: Box<Self>) {
        (*self)()
    }
}
