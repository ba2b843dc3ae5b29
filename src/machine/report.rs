//! Reporting of accepted and rejected transitions.

use crate::core::State;
use parking_lot::Mutex;
use tracing::{info, warn};

/// Something that happened to a mode request.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionEvent<S: State> {
    /// The request moved the machine to a new mode.
    Accepted {
        from: S,
        to: S,
        event: String,
        /// Names of subscribers that failed during notification
        failed_subscribers: Vec<String>,
    },

    /// The event has no route from the current mode.
    Rejected { from: S, event: String },
}

/// Sink for transition events (log, console, metrics).
pub trait TransitionReporter<S: State>: Send + Sync {
    fn report(&self, event: &TransitionEvent<S>);
}

/// Reports through `tracing`: accepted transitions at INFO, rejections and
/// subscriber failures at WARN.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl<S: State> TransitionReporter<S> for TracingReporter {
    fn report(&self, event: &TransitionEvent<S>) {
        match event {
            TransitionEvent::Accepted {
                from,
                to,
                event,
                failed_subscribers,
            } if failed_subscribers.is_empty() => {
                info!(from = from.name(), to = to.name(), event = %event, "Mode changed");
            }
            TransitionEvent::Accepted {
                from,
                to,
                event,
                failed_subscribers,
            } => {
                warn!(
                    from = from.name(),
                    to = to.name(),
                    event = %event,
                    failed = ?failed_subscribers,
                    "Mode changed with subscriber failures"
                );
            }
            TransitionEvent::Rejected { from, event } => {
                warn!(mode = from.name(), event = %event, "Invalid transition");
            }
        }
    }
}

/// Keeps every reported event in memory.
#[derive(Debug)]
pub struct MemoryReporter<S: State> {
    events: Mutex<Vec<TransitionEvent<S>>>,
}

impl<S: State> MemoryReporter<S> {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the events reported so far.
    pub fn events(&self) -> Vec<TransitionEvent<S>> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl<S: State> Default for MemoryReporter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> TransitionReporter<S> for MemoryReporter<S> {
    fn report(&self, event: &TransitionEvent<S>) {
        self.events.lock().push(event.clone());
    }
}
