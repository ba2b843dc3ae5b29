//! End-to-end scenarios for the dashboard-driven camera profile.

use modeshift::core::{ModeRegistry, SystemMode};
use modeshift::machine::{
    CallbackSubscriber, MemoryReporter, ModeSubscriber, StateMachine, SubscriberError,
    TransitionError, TransitionEvent, TransitionTable, DASHBOARD_AUTO_BUTTON,
    DASHBOARD_DEFAULT_BUTTON, DASHBOARD_NEW_BUTTON,
};
use modeshift::worker::{Controller, Worker, WorkerConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Rig {
    machine: StateMachine<SystemMode>,
    controller: Arc<Controller>,
    frames: Arc<Mutex<Vec<String>>>,
}

fn machine() -> StateMachine<SystemMode> {
    StateMachine::new(SystemMode::Default, TransitionTable::dashboard().unwrap())
}

fn rig() -> Rig {
    let registry = Arc::new(ModeRegistry::standard());
    let machine = machine();

    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);
    let worker = Worker::new(
        WorkerConfig::new("camera").with_interval(Duration::from_millis(5)),
        Arc::clone(&registry),
        move |resolution: &str| sink.lock().push(resolution.to_string()),
    );
    let controller = Arc::new(Controller::new(registry, Arc::new(worker)));
    controller.attach(&machine);

    Rig {
        machine,
        controller,
        frames,
    }
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[test]
fn auto_button_starts_camera_at_480p() {
    let rig = rig();
    assert!(!rig.controller.is_running());

    let transitioned = rig.machine.request_mode(DASHBOARD_AUTO_BUTTON).unwrap();

    assert_eq!(transitioned.to, SystemMode::Auto);
    assert!(transitioned.is_clean());
    assert!(rig.controller.is_running());
    assert_eq!(rig.controller.worker().parameter(), "480p");
    assert!(wait_until(|| !rig.frames.lock().is_empty()));
    assert!(rig.frames.lock().iter().all(|r| r == "480p"));

    rig.controller.shutdown().unwrap();
}

#[test]
fn new_button_changes_resolution_without_restart() {
    let rig = rig();
    rig.machine.request_mode(DASHBOARD_AUTO_BUTTON).unwrap();

    let transitioned = rig.machine.request_mode(DASHBOARD_NEW_BUTTON).unwrap();

    assert_eq!(transitioned.to, SystemMode::NewMode);
    assert!(rig.controller.is_running());
    assert_eq!(rig.controller.worker().parameter(), "720p");
    assert!(wait_until(|| rig
        .frames
        .lock()
        .last()
        .is_some_and(|r| r == "720p")));
    // no stop was issued between the two transitions
    assert!(rig.controller.worker().stop());
    rig.controller.worker().join().unwrap();
}

#[test]
fn default_button_stops_camera() {
    let rig = rig();
    rig.machine.request_mode(DASHBOARD_NEW_BUTTON).unwrap();
    assert!(rig.controller.is_running());

    let transitioned = rig.machine.request_mode(DASHBOARD_DEFAULT_BUTTON).unwrap();

    assert_eq!(transitioned.to, SystemMode::Default);
    assert!(!rig.controller.is_running());
    rig.controller.worker().join().unwrap();
    assert!(!rig.controller.worker().is_running());

    let captured = rig.frames.lock().len();
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(rig.frames.lock().len(), captured);
}

#[test]
fn unknown_event_is_rejected_without_side_effects() {
    let reporter = Arc::new(MemoryReporter::new());
    let machine = machine().with_reporter(reporter.clone());
    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    machine.subscribe(Arc::new(CallbackSubscriber::new(
        "counter",
        move |_: &SystemMode| {
            *counter.lock() += 1;
            Ok(())
        },
    )));

    let result = machine.request_mode("nonexistent_event");

    assert!(matches!(
        result,
        Err(TransitionError::InvalidTransition { ref event, .. }) if event == "nonexistent_event"
    ));
    assert_eq!(machine.current_mode(), SystemMode::Default);
    assert_eq!(*calls.lock(), 0);
    assert_eq!(
        reporter.events(),
        vec![TransitionEvent::Rejected {
            from: SystemMode::Default,
            event: "nonexistent_event".to_string(),
        }]
    );
}

#[test]
fn subscribers_called_once_each_in_order() {
    let machine = machine();
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["A", "B"] {
        let order = Arc::clone(&order);
        machine.subscribe(Arc::new(CallbackSubscriber::new(
            name,
            move |mode: &SystemMode| {
                order.lock().push((name, *mode));
                Ok(())
            },
        )));
    }

    machine.request_mode(DASHBOARD_AUTO_BUTTON).unwrap();

    assert_eq!(
        *order.lock(),
        vec![("A", SystemMode::Auto), ("B", SystemMode::Auto)]
    );
}

#[test]
fn disable_notification_while_stopped_does_not_stop() {
    let rig = rig();

    rig.controller
        .on_mode_change(&SystemMode::Default)
        .unwrap();

    assert!(!rig.controller.is_running());
    assert!(!rig.controller.worker().is_running());
    // nothing was started, so no stop signal was ever recorded
    assert!(!rig.controller.worker().stop());
}

#[test]
fn failing_subscriber_does_not_block_the_camera() {
    let registry = Arc::new(ModeRegistry::standard());
    let machine = machine();
    machine.subscribe(Arc::new(CallbackSubscriber::new(
        "display",
        |_: &SystemMode| Err(SubscriberError::Failed("panel disconnected".to_string())),
    )));
    let worker = Worker::new(
        WorkerConfig::new("camera").with_interval(Duration::from_millis(5)),
        Arc::clone(&registry),
        |_: &str| {},
    );
    let controller = Arc::new(Controller::new(registry, Arc::new(worker)));
    controller.attach(&machine);

    let transitioned = machine.request_mode(DASHBOARD_AUTO_BUTTON).unwrap();

    assert_eq!(transitioned.failures.len(), 1);
    assert_eq!(transitioned.failures[0].subscriber, "display");
    assert_eq!(machine.current_mode(), SystemMode::Auto);
    assert!(controller.is_running());
    assert_eq!(controller.worker().parameter(), "480p");
    controller.shutdown().unwrap();
}

#[test]
fn full_dashboard_sequence_records_path() {
    let rig = rig();

    rig.machine.request_mode(DASHBOARD_AUTO_BUTTON).unwrap();
    rig.machine.request_mode(DASHBOARD_NEW_BUTTON).unwrap();
    rig.machine.request_mode(DASHBOARD_DEFAULT_BUTTON).unwrap();
    rig.machine.request_mode("dashboard_reboot_button").unwrap_err();

    let history = rig.machine.history();
    assert_eq!(
        history.get_path(),
        vec![
            &SystemMode::Default,
            &SystemMode::Auto,
            &SystemMode::NewMode,
            &SystemMode::Default
        ]
    );
    rig.controller.shutdown().unwrap();
    assert!(!rig.controller.worker().is_running());
}

#[test]
fn interlock_cannot_switch_modes_mid_notification() {
    let registry = Arc::new(ModeRegistry::standard());
    let machine = Arc::new(machine());

    let nested = Arc::new(Mutex::new(None));
    let handle = Arc::downgrade(&machine);
    let sink = Arc::clone(&nested);
    machine.subscribe(Arc::new(CallbackSubscriber::new(
        "interlock",
        move |mode: &SystemMode| {
            if *mode == SystemMode::Auto {
                if let Some(machine) = handle.upgrade() {
                    *sink.lock() = Some(machine.request_mode(DASHBOARD_DEFAULT_BUTTON));
                }
            }
            Ok(())
        },
    )));
    let worker = Worker::new(
        WorkerConfig::new("camera").with_interval(Duration::from_millis(5)),
        Arc::clone(&registry),
        |_: &str| {},
    );
    let controller = Arc::new(Controller::new(Arc::clone(&registry), Arc::new(worker)));
    controller.attach(&machine);

    machine.request_mode(DASHBOARD_AUTO_BUTTON).unwrap();

    assert!(matches!(
        nested.lock().take(),
        Some(Err(TransitionError::Reentrant { .. }))
    ));
    let mode = machine.current_mode();
    assert_eq!(mode, SystemMode::Auto);
    let enabled = registry.config_of(mode).is_enabled(ModeRegistry::CAMERA);
    assert_eq!(controller.is_running(), enabled);
    assert_eq!(controller.worker().is_running(), enabled);
    assert_eq!(controller.worker().parameter(), "480p");

    controller.shutdown().unwrap();
}

#[test]
fn long_running_machine_keeps_bounded_history() {
    let machine = machine().with_history_limit(3);

    for _ in 0..10 {
        machine.request_mode(DASHBOARD_NEW_BUTTON).unwrap();
        machine.request_mode(DASHBOARD_DEFAULT_BUTTON).unwrap();
    }

    let history = machine.history();
    assert_eq!(history.len(), 3);
    assert_eq!(
        history.get_path(),
        vec![
            &SystemMode::NewMode,
            &SystemMode::Default,
            &SystemMode::NewMode,
            &SystemMode::Default
        ]
    );
}
