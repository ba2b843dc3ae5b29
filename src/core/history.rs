//! Mode transition history tracking.
//!
//! Records every accepted transition with the event that caused it, so a
//! machine can report the path it took through the mode graph.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single accepted transition.
///
/// # Example
///
/// ```rust
/// use modeshift::core::{ModeTransition, SystemMode};
/// use chrono::Utc;
///
/// let transition = ModeTransition {
///     from: SystemMode::Default,
///     to: SystemMode::Auto,
///     event: "dashboard_auto_button".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, SystemMode::Auto);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ModeTransition<S: State> {
    /// The mode being left
    pub from: S,
    /// The mode being entered
    pub to: S,
    /// Event name that selected this transition
    pub event: String,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of accepted transitions.
///
/// `record` returns a new history with the transition appended and leaves
/// the original untouched. `push` appends in place. A history created with
/// [`with_limit`](Self::with_limit) keeps only the most recent transitions.
///
/// # Example
///
/// ```rust
/// use modeshift::core::{ModeHistory, ModeTransition, SystemMode};
/// use chrono::Utc;
///
/// let history = ModeHistory::new()
///     .record(ModeTransition {
///         from: SystemMode::Default,
///         to: SystemMode::Auto,
///         event: "dashboard_auto_button".to_string(),
///         timestamp: Utc::now(),
///     })
///     .record(ModeTransition {
///         from: SystemMode::Auto,
///         to: SystemMode::NewMode,
///         event: "dashboard_new_button".to_string(),
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&SystemMode::Default, &SystemMode::Auto, &SystemMode::NewMode]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ModeHistory<S: State> {
    transitions: VecDeque<ModeTransition<S>>,
    #[serde(default)]
    limit: Option<usize>,
}

impl<S: State> Default for ModeHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> ModeHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
        }
    }

    /// Create an empty history that keeps at most `limit` transitions,
    /// dropping the oldest first.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(64)),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: ModeTransition<S>) -> Self {
        let mut history = self.clone();
        history.push(transition);
        history
    }

    /// Append a transition in place, evicting the oldest entries beyond
    /// the limit.
    pub fn push(&mut self, transition: ModeTransition<S>) {
        self.transitions.push_back(transition);
        if let Some(limit) = self.limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
            }
        }
    }

    /// Get the path of modes traversed.
    ///
    /// Returns the first retained transition's source mode followed by
    /// every target mode in order. Empty when nothing has been recorded.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time elapsed between the first and last recorded transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn last(&self) -> Option<&ModeTransition<S>> {
        self.transitions.back()
    }

    /// Get all retained transitions in the order they were applied.
    pub fn transitions(&self) -> &VecDeque<ModeTransition<S>> {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
