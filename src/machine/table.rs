//! Transition table: `(current mode, event name) -> next mode`.

use crate::builder::{BuildError, TransitionTableBuilder};
use crate::core::{State, SystemMode};
use std::collections::HashMap;

/// Dashboard button that selects automatic capture.
pub const DASHBOARD_AUTO_BUTTON: &str = "dashboard_auto_button";
/// Dashboard button that selects the high resolution mode.
pub const DASHBOARD_NEW_BUTTON: &str = "dashboard_new_button";
/// Dashboard button that returns to the idle mode.
pub const DASHBOARD_DEFAULT_BUTTON: &str = "dashboard_default_button";

/// Fixed mapping from a mode and an event name to the next mode.
///
/// Lookups are pure. Unknown event names are not errors; they simply have
/// no route. Build one with
/// [`TransitionTableBuilder`](crate::builder::TransitionTableBuilder).
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State> {
    routes: HashMap<S, HashMap<String, S>>,
}

impl<S: State> TransitionTable<S> {
    pub(crate) fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, from: S, event: String, to: S) {
        self.routes.entry(from).or_default().insert(event, to);
    }

    /// Resolve `event` against `current`.
    pub fn next_mode(&self, current: &S, event: &str) -> Option<S> {
        self.routes
            .get(current)
            .and_then(|events| events.get(event))
            .cloned()
    }

    /// Event names accepted in `mode`, sorted.
    pub fn events_from(&self, mode: &S) -> Vec<&str> {
        let mut events: Vec<&str> = self
            .routes
            .get(mode)
            .map(|events| events.keys().map(String::as_str).collect())
            .unwrap_or_default();
        events.sort_unstable();
        events
    }

    /// Number of `(mode, event)` routes.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransitionTable<SystemMode> {
    /// The dashboard table: every mode reaches the other two through its
    /// button.
    pub fn dashboard() -> Result<Self, BuildError> {
        TransitionTableBuilder::new()
            .routes_from(
                SystemMode::Default,
                [
                    (DASHBOARD_AUTO_BUTTON, SystemMode::Auto),
                    (DASHBOARD_NEW_BUTTON, SystemMode::NewMode),
                ],
            )
            .routes_from(
                SystemMode::Auto,
                [
                    (DASHBOARD_DEFAULT_BUTTON, SystemMode::Default),
                    (DASHBOARD_NEW_BUTTON, SystemMode::NewMode),
                ],
            )
            .routes_from(
                SystemMode::NewMode,
                [
                    (DASHBOARD_DEFAULT_BUTTON, SystemMode::Default),
                    (DASHBOARD_AUTO_BUTTON, SystemMode::Auto),
                ],
            )
            .build()
    }
}
