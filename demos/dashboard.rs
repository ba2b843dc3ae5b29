//! Dashboard Simulation
//!
//! Replays a short sequence of dashboard button presses against the
//! standard device profile and shows the camera worker following the mode.
//!
//! Run with: cargo run --example dashboard
//! Set RUST_LOG=debug for per-subscriber detail.

use modeshift::core::{ModeRegistry, State, SystemMode};
use modeshift::machine::{
    StateMachine, TransitionTable, DASHBOARD_AUTO_BUTTON, DASHBOARD_DEFAULT_BUTTON,
    DASHBOARD_NEW_BUTTON,
};
use modeshift::worker::{Controller, Worker, WorkerConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_thread_names(true)
        .init();

    let registry = Arc::new(ModeRegistry::standard());
    let machine = Arc::new(StateMachine::new(
        SystemMode::Default,
        TransitionTable::dashboard()?,
    ));

    let worker = Worker::new(
        WorkerConfig::default(),
        Arc::clone(&registry),
        |resolution: &str| tracing::info!(resolution, "Capturing frame"),
    );
    let camera = Arc::new(Controller::new(registry, Arc::new(worker)));
    camera.attach(&machine);

    thread::sleep(Duration::from_secs(2));
    machine.request_mode(DASHBOARD_AUTO_BUTTON)?;

    thread::sleep(Duration::from_secs(3));
    machine.request_mode(DASHBOARD_NEW_BUTTON)?;

    thread::sleep(Duration::from_secs(3));
    machine.request_mode(DASHBOARD_DEFAULT_BUTTON)?;

    if let Err(err) = machine.request_mode("dashboard_reboot_button") {
        tracing::warn!(%err, "Ignored button press");
    }

    camera.shutdown()?;

    let history = machine.history();
    let path: Vec<&str> = history.get_path().into_iter().map(|m| m.name()).collect();
    println!("Mode path: {}", path.join(" -> "));
    Ok(())
}
