//! Background worker and the controller that drives it from mode changes.
//!
//! The worker runs on its own thread; everything else in this crate runs on
//! the thread that requests mode changes. The only state the two share is
//! the worker's parameter, its running flag and its signal channel.

mod controller;
mod error;
mod task;

pub use controller::Controller;
pub use error::WorkerError;
pub use task::{WorkUnit, Worker, WorkerConfig};
