//! Modeshift: a mode controller for devices with reconfigurable subsystems
//!
//! External actors (a dashboard, a button, a remote operator) submit named
//! events. The state machine resolves each event against a fixed transition
//! table and, when a route exists, moves to the new mode and synchronously
//! notifies every subscriber so it can reconfigure itself.
//!
//! # Core Concepts
//!
//! - **Modes**: a closed set of identifiers implementing the `State` trait
//! - **Registry**: one immutable configuration record per mode
//! - **Transition table**: `(mode, event name) -> next mode`
//! - **Subscribers**: notified in registration order after each accepted transition
//! - **Worker / Controller**: a background task started and stopped by mode
//!
//! # Example
//!
//! ```rust
//! use modeshift::core::{ModeRegistry, SystemMode};
//! use modeshift::machine::{
//!     StateMachine, TransitionTable, DASHBOARD_AUTO_BUTTON, DASHBOARD_DEFAULT_BUTTON,
//! };
//! use modeshift::worker::{Controller, Worker, WorkerConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(ModeRegistry::standard());
//! let machine = StateMachine::new(SystemMode::Default, TransitionTable::dashboard()?);
//!
//! let worker = Worker::new(
//!     WorkerConfig::new("camera").with_interval(Duration::from_millis(10)),
//!     Arc::clone(&registry),
//!     |resolution: &str| { let _ = resolution; },
//! );
//! let controller = Arc::new(Controller::new(registry, Arc::new(worker)));
//! controller.attach(&machine);
//!
//! machine.request_mode(DASHBOARD_AUTO_BUTTON)?;
//! assert!(controller.is_running());
//! assert_eq!(controller.worker().parameter(), "480p");
//!
//! machine.request_mode(DASHBOARD_DEFAULT_BUTTON)?;
//! assert!(!controller.is_running());
//! controller.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod worker;

// Re-export commonly used types
pub use crate::core::{ModeConfig, ModeRegistry, State, SubsystemConfig, SystemMode};
pub use crate::machine::{ModeSubscriber, StateMachine, TransitionError, TransitionTable};
pub use crate::worker::{Controller, Worker, WorkerConfig};
