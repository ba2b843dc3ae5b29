//! Builder API for transition tables and mode sets.
//!
//! This module provides a fluent builder and a macro for declaring mode
//! graphs with minimal boilerplate while keeping them type-checked.

pub mod error;
pub mod macros;
pub mod table;

pub use error::BuildError;
pub use table::TransitionTableBuilder;

use crate::core::State;
use crate::machine::TransitionTable;

/// Build a table in which every listed mode can reach every other listed
/// mode through the event named by `event_for`.
///
/// # Example
///
/// ```
/// use modeshift::builder::fully_connected;
/// use modeshift::core::{State, SystemMode};
///
/// let table = fully_connected(&SystemMode::all(), |to: &SystemMode| {
///     format!("goto_{}", to.name().to_lowercase())
/// })
/// .unwrap();
///
/// assert_eq!(table.next_mode(&SystemMode::Auto, "goto_default"), Some(SystemMode::Default));
/// assert_eq!(table.next_mode(&SystemMode::Auto, "goto_auto"), None);
/// ```
pub fn fully_connected<S, F>(modes: &[S], event_for: F) -> Result<TransitionTable<S>, BuildError>
where
    S: State,
    F: Fn(&S) -> String,
{
    let mut builder = TransitionTableBuilder::new();
    for from in modes {
        for to in modes.iter().filter(|to| *to != from) {
            builder = builder.route(from.clone(), event_for(to), to.clone());
        }
    }
    builder.build()
}
