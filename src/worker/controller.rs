//! Starts and stops a worker from the mode's `enabled` flag.

use crate::core::{ModeRegistry, SystemMode};
use crate::machine::{ModeSubscriber, StateMachine, SubscriberError, SubscriptionId};
use crate::worker::error::WorkerError;
use crate::worker::task::Worker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Subscriber that owns a [`Worker`] and runs it only in modes where the
/// worker's subsystem is enabled.
///
/// Repeated notifications for the same enabled state are ignored.
pub struct Controller {
    registry: Arc<ModeRegistry>,
    worker: Arc<Worker>,
    running: AtomicBool,
}

impl Controller {
    pub fn new(registry: Arc<ModeRegistry>, worker: Arc<Worker>) -> Self {
        Self {
            registry,
            worker,
            running: AtomicBool::new(false),
        }
    }

    /// Subscribe the worker and then the controller to `machine`.
    ///
    /// The worker goes first so a transition that both enables the
    /// subsystem and changes its parameter starts the loop with the new
    /// parameter.
    pub fn attach(
        self: &Arc<Self>,
        machine: &StateMachine<SystemMode>,
    ) -> (SubscriptionId, SubscriptionId) {
        let worker = machine.subscribe(self.worker.clone());
        let controller = machine.subscribe(self.clone());
        (worker, controller)
    }

    pub fn worker(&self) -> &Arc<Worker> {
        &self.worker
    }

    /// Whether this controller has started the worker.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the worker if this controller started it, then wait for its
    /// loop to exit.
    pub fn shutdown(&self) -> Result<(), WorkerError> {
        if self.running.swap(false, Ordering::AcqRel) {
            self.worker.stop();
        }
        self.worker.join()
    }
}

impl ModeSubscriber<SystemMode> for Controller {
    fn name(&self) -> &str {
        "controller"
    }

    fn on_mode_change(&self, mode: &SystemMode) -> Result<(), SubscriberError> {
        let enabled = self
            .registry
            .config_of(*mode)
            .is_enabled(self.worker.name());
        let running = self.is_running();

        match (enabled, running) {
            (true, false) => {
                info!(worker = %self.worker.name(), mode = %mode, "Starting worker");
                self.worker.start()?;
                self.running.store(true, Ordering::Release);
            }
            (false, true) => {
                info!(worker = %self.worker.name(), mode = %mode, "Stopping worker");
                self.worker.stop();
                self.running.store(false, Ordering::Release);
            }
            _ => {
                debug!(
                    worker = %self.worker.name(),
                    mode = %mode,
                    enabled,
                    "Worker already in requested state"
                );
            }
        }
        Ok(())
    }
}
