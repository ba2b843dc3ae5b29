//! Build errors for transition tables.

use thiserror::Error;

/// Errors that can occur when building a transition table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No routes defined. Add at least one route")]
    NoRoutes,

    #[error("Route from '{from}' has an empty event name")]
    EmptyEventName { from: String },

    #[error("Event '{event}' is already routed from '{from}'")]
    DuplicateRoute { from: String, event: String },
}
