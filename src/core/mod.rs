//! Core mode types.
//!
//! This module contains the pure data model of the controller:
//! - Mode identity via the `State` trait and the built-in `SystemMode` set
//! - Immutable per-mode configuration held in a `ModeRegistry`
//! - Immutable history of accepted transitions
//!
//! Nothing in this module performs I/O or spawns threads.

mod history;
mod mode;
mod registry;
mod state;

pub use history::{ModeHistory, ModeTransition};
pub use mode::SystemMode;
pub use registry::{ConfigError, ModeConfig, ModeRegistry, SubsystemConfig};
pub use state::State;
