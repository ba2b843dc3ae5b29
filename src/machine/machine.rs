//! State machine that applies table transitions and notifies subscribers.

use crate::core::{ModeHistory, ModeTransition, State};
use crate::machine::error::{SubscriberError, SubscriberFailure, TransitionError};
use crate::machine::report::{TracingReporter, TransitionEvent, TransitionReporter};
use crate::machine::subscriber::{ModeSubscriber, SubscriptionId};
use crate::machine::table::TransitionTable;
use chrono::Utc;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of an accepted mode request.
#[derive(Debug)]
pub struct Transitioned<S: State> {
    pub from: S,
    pub to: S,
    pub event: String,
    /// Subscribers that failed during this notification pass
    pub failures: Vec<SubscriberFailure>,
}

impl<S: State> Transitioned<S> {
    /// True when every subscriber handled the change.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Transitions kept by a machine's history unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

#[derive(Clone)]
struct Registration<S: State> {
    id: SubscriptionId,
    subscriber: Arc<dyn ModeSubscriber<S>>,
}

/// Mode holder driven by named events.
///
/// The machine is an ordinary value: construct one, wrap it in an `Arc`
/// and hand it to every collaborator that needs it. All operations take
/// `&self`.
///
/// Requests are serialized: a second caller blocks until the first
/// request has notified every subscriber. The current mode and the
/// subscriber list are not locked while callbacks run, so a callback may
/// read [`current_mode`](Self::current_mode), subscribe or unsubscribe.
/// A callback that calls [`request_mode`](Self::request_mode) gets
/// [`TransitionError::Reentrant`]; every subscriber of a pass sees the
/// same mode.
///
/// History keeps the last [`DEFAULT_HISTORY_LIMIT`] transitions; see
/// [`with_history_limit`](Self::with_history_limit).
///
/// # Example
///
/// ```rust
/// use modeshift::core::SystemMode;
/// use modeshift::machine::{StateMachine, TransitionTable, DASHBOARD_AUTO_BUTTON};
///
/// let table = TransitionTable::dashboard().unwrap();
/// let machine = StateMachine::new(SystemMode::Default, table);
///
/// let transitioned = machine.request_mode(DASHBOARD_AUTO_BUTTON).unwrap();
/// assert_eq!(transitioned.to, SystemMode::Auto);
/// assert_eq!(machine.current_mode(), SystemMode::Auto);
///
/// assert!(machine.request_mode("nonexistent_event").is_err());
/// assert_eq!(machine.current_mode(), SystemMode::Auto);
/// ```
pub struct StateMachine<S: State> {
    table: TransitionTable<S>,
    initial: S,
    current: RwLock<S>,
    subscribers: RwLock<Vec<Registration<S>>>,
    history: Mutex<ModeHistory<S>>,
    reporter: Arc<dyn TransitionReporter<S>>,
    /// Held for a whole request; the flag is set while subscribers run.
    serial: ReentrantMutex<Cell<bool>>,
}

/// Clears the notifying flag when a pass ends.
struct NotifyingGuard<'a>(&'a Cell<bool>);

impl Drop for NotifyingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<S: State + 'static> StateMachine<S> {
    /// Create a machine in `initial` that reports through `tracing`.
    pub fn new(initial: S, table: TransitionTable<S>) -> Self {
        Self {
            table,
            initial: initial.clone(),
            current: RwLock::new(initial),
            subscribers: RwLock::new(Vec::new()),
            history: Mutex::new(ModeHistory::with_limit(DEFAULT_HISTORY_LIMIT)),
            reporter: Arc::new(TracingReporter),
            serial: ReentrantMutex::new(Cell::new(false)),
        }
    }

    /// Keep at most `limit` transitions in the history, oldest dropped
    /// first. Replaces any history recorded so far.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = Mutex::new(ModeHistory::with_limit(limit));
        self
    }

    /// Replace the reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn TransitionReporter<S>>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn current_mode(&self) -> S {
        self.current.read().clone()
    }

    pub fn initial_mode(&self) -> &S {
        &self.initial
    }

    pub fn table(&self) -> &TransitionTable<S> {
        &self.table
    }

    /// Snapshot of accepted transitions.
    pub fn history(&self) -> ModeHistory<S> {
        self.history.lock().clone()
    }

    /// Append a subscriber. Registering the same subscriber twice makes it
    /// run twice per transition.
    pub fn subscribe(&self, subscriber: Arc<dyn ModeSubscriber<S>>) -> SubscriptionId {
        let id = SubscriptionId::new();
        debug!(subscriber = subscriber.name(), %id, "Subscriber registered");
        self.subscribers
            .write()
            .push(Registration { id, subscriber });
        id
    }

    /// Remove a registration. Returns false for an unknown token.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|registration| registration.id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Apply the transition routed for `event` from the current mode.
    ///
    /// On success the current mode is updated first, then every subscriber
    /// is called in registration order. Subscriber errors and panics are
    /// collected into [`Transitioned::failures`] and do not stop the pass.
    /// An event with no route leaves the machine untouched and notifies
    /// nobody. A request made from inside a subscriber callback is
    /// rejected with [`TransitionError::Reentrant`].
    pub fn request_mode(&self, event: &str) -> Result<Transitioned<S>, TransitionError> {
        let serial = self.serial.lock();

        let from = self.current_mode();
        if serial.get() {
            warn!(
                event,
                mode = from.name(),
                "Mode request rejected while subscribers are being notified"
            );
            return Err(TransitionError::Reentrant {
                mode: from.name().to_string(),
                event: event.to_string(),
            });
        }

        let Some(to) = self.table.next_mode(&from, event) else {
            self.reporter.report(&TransitionEvent::Rejected {
                from: from.clone(),
                event: event.to_string(),
            });
            return Err(TransitionError::InvalidTransition {
                from: from.name().to_string(),
                event: event.to_string(),
            });
        };

        serial.set(true);
        let _notifying = NotifyingGuard(&serial);

        *self.current.write() = to.clone();
        self.history.lock().push(ModeTransition {
            from: from.clone(),
            to: to.clone(),
            event: event.to_string(),
            timestamp: Utc::now(),
        });

        let registrations = self.subscribers.read().clone();
        let failures: Vec<SubscriberFailure> = registrations
            .iter()
            .filter_map(|registration| notify(registration, &to))
            .collect();

        self.reporter.report(&TransitionEvent::Accepted {
            from: from.clone(),
            to: to.clone(),
            event: event.to_string(),
            failed_subscribers: failures.iter().map(|f| f.subscriber.clone()).collect(),
        });

        Ok(Transitioned {
            from,
            to,
            event: event.to_string(),
            failures,
        })
    }
}

fn notify<S: State>(registration: &Registration<S>, mode: &S) -> Option<SubscriberFailure> {
    let subscriber = &registration.subscriber;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| subscriber.on_mode_change(mode)));

    let error = match outcome {
        Ok(Ok(())) => return None,
        Ok(Err(error)) => error,
        Err(payload) => SubscriberError::Panicked(panic_message(payload.as_ref())),
    };

    warn!(
        subscriber = subscriber.name(),
        mode = mode.name(),
        %error,
        "Subscriber failed during mode notification"
    );

    Some(SubscriberFailure {
        id: registration.id,
        subscriber: subscriber.name().to_string(),
        error,
    })
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
