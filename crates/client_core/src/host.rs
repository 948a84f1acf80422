//! Host-environment hooks. Fire-and-forget; none of them affect the view state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Success,
    Error,
}

pub trait HostBridge: Send + Sync {
    /// Tells the host the client is up (before the first fetch).
    fn ready(&self) {}

    /// Haptic-style feedback after an interaction resolves.
    fn feedback(&self, _kind: Feedback) {}

    /// Modal alert raised when an interaction fails.
    fn alert(&self, _message: &str) {}
}

pub struct NoopHost;

impl HostBridge for NoopHost {}
