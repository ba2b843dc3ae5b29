//! Builder for constructing transition tables.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::machine::TransitionTable;

/// Builder for a [`TransitionTable`] with a fluent API.
///
/// Each `(from, event)` pair may be routed once; the table is a strict
/// function from mode and event name to the next mode.
pub struct TransitionTableBuilder<S: State> {
    routes: Vec<(S, String, S)>,
}

impl<S: State> TransitionTableBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Route `event` received in mode `from` to mode `to`.
    pub fn route(mut self, from: S, event: impl Into<String>, to: S) -> Self {
        self.routes.push((from, event.into(), to));
        self
    }

    /// Route several events from the same source mode.
    pub fn routes_from<E>(mut self, from: S, targets: impl IntoIterator<Item = (E, S)>) -> Self
    where
        E: Into<String>,
    {
        for (event, to) in targets {
            self.routes.push((from.clone(), event.into(), to));
        }
        self
    }

    /// Build the table.
    /// Returns an error if no routes were added, an event name is empty,
    /// or a `(from, event)` pair is routed twice.
    pub fn build(self) -> Result<TransitionTable<S>, BuildError> {
        if self.routes.is_empty() {
            return Err(BuildError::NoRoutes);
        }

        let mut table = TransitionTable::empty();
        for (from, event, to) in self.routes {
            if event.is_empty() {
                return Err(BuildError::EmptyEventName {
                    from: from.name().to_string(),
                });
            }
            if table.next_mode(&from, &event).is_some() {
                return Err(BuildError::DuplicateRoute {
                    from: from.name().to_string(),
                    event,
                });
            }
            table.insert(from, event, to);
        }

        Ok(table)
    }
}

impl<S: State> Default for TransitionTableBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SystemMode;

    #[test]
    fn builder_requires_routes() {
        let result = TransitionTableBuilder::<SystemMode>::new().build();
        assert!(matches!(result, Err(BuildError::NoRoutes)));
    }

    #[test]
    fn builder_rejects_duplicate_route() {
        let result = TransitionTableBuilder::new()
            .route(SystemMode::Default, "go", SystemMode::Auto)
            .route(SystemMode::Default, "go", SystemMode::NewMode)
            .build();

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateRoute {
                from: "DEFAULT".to_string(),
                event: "go".to_string(),
            })
        );
    }

    #[test]
    fn same_event_from_different_modes_is_allowed() {
        let table = TransitionTableBuilder::new()
            .route(SystemMode::Default, "go", SystemMode::Auto)
            .route(SystemMode::Auto, "go", SystemMode::NewMode)
            .build()
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.next_mode(&SystemMode::Auto, "go"),
            Some(SystemMode::NewMode)
        );
    }

    #[test]
    fn builder_rejects_empty_event_name() {
        let result = TransitionTableBuilder::new()
            .route(SystemMode::Auto, "", SystemMode::Default)
            .build();

        assert!(matches!(result, Err(BuildError::EmptyEventName { .. })));
    }

    #[test]
    fn routes_from_adds_every_target() {
        let table = TransitionTableBuilder::new()
            .routes_from(
                SystemMode::NewMode,
                [("down", SystemMode::Default), ("side", SystemMode::Auto)],
            )
            .build()
            .unwrap();

        assert_eq!(table.events_from(&SystemMode::NewMode), vec!["down", "side"]);
    }
}
