//! Cooperatively stoppable background worker.

use crate::core::{ModeRegistry, SystemMode};
use crate::machine::{ModeSubscriber, SubscriberError};
use crate::worker::error::WorkerError;
use arc_swap::ArcSwap;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// One unit of work, run with the worker's current operating parameter.
pub trait WorkUnit: Send + 'static {
    fn run(&mut self, parameter: &str);
}

impl<F> WorkUnit for F
where
    F: FnMut(&str) + Send + 'static,
{
    fn run(&mut self, parameter: &str) {
        self(parameter)
    }
}

/// Worker settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker name; also the subsystem key read from mode configuration
    pub name: String,
    /// Wait between two units of work
    pub interval_ms: u64,
    /// Parameter used until a mode provides one
    pub initial_parameter: String,
}

impl WorkerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: ModeRegistry::CAMERA.to_string(),
            interval_ms: 1000,
            initial_parameter: "unknown".to_string(),
        }
    }
}

enum Signal {
    Stop,
    Wake,
}

struct Shared {
    parameter: ArcSwap<String>,
    running: AtomicBool,
    iterations: AtomicU64,
    unit: Mutex<Box<dyn WorkUnit>>,
}

struct Handle {
    signals: Sender<Signal>,
    thread: JoinHandle<()>,
    stop_sent: bool,
}

/// Clears the running flag when the loop exits, including by panic.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Background task with a mutable operating parameter.
///
/// The loop runs one [`WorkUnit`] per iteration with the current
/// parameter, then waits for the configured interval. The wait ends early
/// on a stop signal or a parameter update. The stop signal is checked at
/// the top of every iteration; a unit of work is never interrupted.
///
/// The parameter is swapped atomically, so the loop always sees either
/// the old or the new value, never a mix.
///
/// # Example
///
/// ```rust
/// use modeshift::core::ModeRegistry;
/// use modeshift::worker::{Worker, WorkerConfig};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let config = WorkerConfig::new("camera").with_interval(Duration::from_millis(10));
/// let worker = Worker::new(config, Arc::new(ModeRegistry::standard()), |resolution: &str| {
///     let _ = resolution;
/// });
///
/// worker.set_parameter("480p");
/// assert!(worker.start().unwrap());
/// assert!(worker.is_running());
///
/// worker.stop();
/// worker.join().unwrap();
/// assert!(!worker.is_running());
/// ```
pub struct Worker {
    config: WorkerConfig,
    registry: Arc<ModeRegistry>,
    shared: Arc<Shared>,
    handle: Mutex<Option<Handle>>,
}

impl Worker {
    pub fn new(config: WorkerConfig, registry: Arc<ModeRegistry>, unit: impl WorkUnit) -> Self {
        let shared = Shared {
            parameter: ArcSwap::from_pointee(config.initial_parameter.clone()),
            running: AtomicBool::new(false),
            iterations: AtomicU64::new(0),
            unit: Mutex::new(Box::new(unit) as Box<dyn WorkUnit>),
        };
        Self {
            config,
            registry,
            shared: Arc::new(shared),
            handle: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn parameter(&self) -> String {
        self.shared.parameter.load().as_ref().clone()
    }

    /// Replace the operating parameter. Safe to call from any thread; a
    /// running loop is woken so the next unit uses the new value.
    pub fn set_parameter(&self, value: impl Into<String>) {
        let value = value.into();
        if *self.shared.parameter.load_full() == value {
            return;
        }
        info!(worker = %self.config.name, parameter = %value, "Worker parameter set");
        self.shared.parameter.store(Arc::new(value));

        if let Some(handle) = self.handle.lock().as_ref() {
            let _ = handle.signals.send(Signal::Wake);
        }
    }

    /// True while the loop thread is alive.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Units of work completed since the worker was created.
    pub fn iterations(&self) -> u64 {
        self.shared.iterations.load(Ordering::Relaxed)
    }

    /// Start the loop on a new thread.
    ///
    /// Returns `Ok(false)` if the loop is already running. A worker that
    /// was stopped can be started again; the previous thread is joined
    /// first.
    pub fn start(&self) -> Result<bool, WorkerError> {
        let mut slot = self.handle.lock();

        if let Some(handle) = slot.as_ref() {
            if !handle.stop_sent && self.is_running() {
                return Ok(false);
            }
        }

        if let Some(previous) = slot.take() {
            if !previous.stop_sent {
                let _ = previous.signals.send(Signal::Stop);
            }
            if let Err(payload) = previous.thread.join() {
                warn!(
                    worker = %self.config.name,
                    reason = %panic_message(payload.as_ref()),
                    "Previous worker thread panicked"
                );
            }
        }

        let (signals, receiver) = unbounded();
        let shared = Arc::clone(&self.shared);
        let interval = self.config.interval();
        let name = self.config.name.clone();

        self.shared.running.store(true, Ordering::Release);
        let spawned = thread::Builder::new()
            .name(format!("{}-worker", self.config.name))
            .spawn(move || run_loop(&shared, &receiver, interval, &name));

        let thread = match spawned {
            Ok(thread) => thread,
            Err(err) => {
                self.shared.running.store(false, Ordering::Release);
                return Err(WorkerError::Spawn(err));
            }
        };

        info!(worker = %self.config.name, parameter = %self.parameter(), "Worker started");
        *slot = Some(Handle {
            signals,
            thread,
            stop_sent: false,
        });
        Ok(true)
    }

    /// Signal the loop to exit and return immediately.
    ///
    /// Returns false if the worker was not started or was already told to
    /// stop. Use [`join`](Self::join) to wait for the loop to exit.
    pub fn stop(&self) -> bool {
        let mut slot = self.handle.lock();
        match slot.as_mut() {
            Some(handle) if !handle.stop_sent => {
                let _ = handle.signals.send(Signal::Stop);
                handle.stop_sent = true;
                info!(worker = %self.config.name, "Worker stop requested");
                true
            }
            _ => false,
        }
    }

    /// Wait until the loop has observed the stop signal and exited.
    ///
    /// Returns immediately when no thread exists. Fails with
    /// [`WorkerError::NotStopped`] if `stop` has not been called and the
    /// loop is still running.
    pub fn join(&self) -> Result<(), WorkerError> {
        let handle = {
            let mut slot = self.handle.lock();
            match slot.as_ref() {
                None => return Ok(()),
                Some(handle) if !handle.stop_sent && self.is_running() => {
                    return Err(WorkerError::NotStopped(self.config.name.clone()));
                }
                Some(_) => slot.take(),
            }
        };

        let Some(handle) = handle else {
            return Ok(());
        };
        handle
            .thread
            .join()
            .map_err(|payload| WorkerError::Panicked(panic_message(payload.as_ref())))?;
        debug!(worker = %self.config.name, "Worker joined");
        Ok(())
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
        if let Err(err) = self.join() {
            warn!(worker = %self.config.name, error = %err, "Worker did not shut down cleanly");
        }
    }
}

impl ModeSubscriber<SystemMode> for Worker {
    fn name(&self) -> &str {
        &self.config.name
    }

    /// Apply the mode's parameter for this worker's subsystem, if it has one.
    fn on_mode_change(&self, mode: &SystemMode) -> Result<(), SubscriberError> {
        if let Some(parameter) = self.registry.config_of(*mode).parameter(&self.config.name) {
            self.set_parameter(parameter);
        }
        Ok(())
    }
}

fn run_loop(shared: &Shared, signals: &Receiver<Signal>, interval: Duration, name: &str) {
    let _running = RunningGuard(&shared.running);
    debug!(worker = %name, "Worker loop entered");

    loop {
        if stop_requested(signals) {
            break;
        }

        let parameter = shared.parameter.load_full();
        shared.unit.lock().run(&parameter);
        shared.iterations.fetch_add(1, Ordering::Relaxed);

        match signals.recv_timeout(interval) {
            Ok(Signal::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(Signal::Wake) | Err(RecvTimeoutError::Timeout) => {}
        }
    }

    debug!(worker = %name, "Worker loop exited");
}

/// Drain pending signals; true if one of them was a stop.
fn stop_requested(signals: &Receiver<Signal>) -> bool {
    loop {
        match signals.try_recv() {
            Ok(Signal::Stop) | Err(TryRecvError::Disconnected) => return true,
            Ok(Signal::Wake) => continue,
            Err(TryRecvError::Empty) => return false,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
