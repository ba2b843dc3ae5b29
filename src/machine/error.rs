//! Errors raised while requesting and notifying mode changes.

use crate::machine::subscriber::SubscriptionId;
use crate::worker::WorkerError;
use thiserror::Error;

/// Errors returned by [`StateMachine::request_mode`](crate::machine::StateMachine::request_mode).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("No transition for event '{event}' from mode '{from}'")]
    InvalidTransition { from: String, event: String },

    #[error("Event '{event}' requested while subscribers of mode '{mode}' are being notified")]
    Reentrant { mode: String, event: String },
}

/// Errors a subscriber may report from its mode-change callback.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("{0}")]
    Failed(String),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Subscriber panicked: {0}")]
    Panicked(String),
}

/// A subscriber that failed during a notification pass.
///
/// Failures are non-fatal: the transition still happened and the
/// remaining subscribers were still notified.
#[derive(Debug)]
pub struct SubscriberFailure {
    pub id: SubscriptionId,
    pub subscriber: String,
    pub error: SubscriberError,
}

impl std::fmt::Display for SubscriberFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subscriber, self.error)
    }
}
