//! The mode state machine and its collaborators.
//!
//! # Key Concepts
//!
//! - **Transition table**: fixed routes from a mode and an event name to the next mode
//! - **State machine**: holds the current mode and applies routed events
//! - **Subscribers**: notified synchronously, in order, after every accepted transition
//! - **Reporters**: receive every accepted or rejected request

#[allow(clippy::module_inception)]
mod machine;
mod error;
mod report;
mod subscriber;
mod table;

pub use error::{SubscriberError, SubscriberFailure, TransitionError};
pub use machine::{StateMachine, Transitioned, DEFAULT_HISTORY_LIMIT};
pub use report::{MemoryReporter, TracingReporter, TransitionEvent, TransitionReporter};
pub use subscriber::{CallbackSubscriber, ModeSubscriber, SubscriptionId};
pub use table::{
    TransitionTable, DASHBOARD_AUTO_BUTTON, DASHBOARD_DEFAULT_BUTTON, DASHBOARD_NEW_BUTTON,
};
