//! The subscriber contract.

use crate::core::State;
use crate::machine::error::SubscriberError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token returned by [`subscribe`](crate::machine::StateMachine::subscribe),
/// used to remove the registration later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A component that reacts to mode changes.
///
/// Callbacks run synchronously on the thread that requested the mode
/// change, in registration order. A slow callback delays every subscriber
/// after it and the caller of `request_mode`.
///
/// # Example
///
/// ```rust
/// use modeshift::core::SystemMode;
/// use modeshift::machine::{ModeSubscriber, SubscriberError};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct Counter(AtomicUsize);
///
/// impl ModeSubscriber<SystemMode> for Counter {
///     fn name(&self) -> &str {
///         "counter"
///     }
///
///     fn on_mode_change(&self, _mode: &SystemMode) -> Result<(), SubscriberError> {
///         self.0.fetch_add(1, Ordering::SeqCst);
///         Ok(())
///     }
/// }
/// ```
pub trait ModeSubscriber<S: State>: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once per accepted transition with the mode just entered.
    fn on_mode_change(&self, mode: &S) -> Result<(), SubscriberError>;
}

type Callback<S> = Box<dyn Fn(&S) -> Result<(), SubscriberError> + Send + Sync>;

/// Adapts a closure into a named [`ModeSubscriber`].
pub struct CallbackSubscriber<S: State> {
    name: String,
    callback: Callback<S>,
}

impl<S: State> CallbackSubscriber<S> {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&S) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: Box::new(callback),
        }
    }
}

impl<S: State> ModeSubscriber<S> for CallbackSubscriber<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_mode_change(&self, mode: &S) -> Result<(), SubscriberError> {
        (self.callback)(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SystemMode;

    struct Silent;

    impl ModeSubscriber<SystemMode> for Silent {
        fn on_mode_change(&self, _mode: &SystemMode) -> Result<(), SubscriberError> {
            Ok(())
        }
    }

    #[test]
    fn default_name_is_type_name() {
        assert!(Silent.name().ends_with("Silent"));
    }

    #[test]
    fn callback_subscriber_forwards_mode() {
        let subscriber = CallbackSubscriber::new("auto-only", |mode: &SystemMode| {
            if *mode == SystemMode::Auto {
                Ok(())
            } else {
                Err(SubscriberError::Failed(format!("unexpected {mode}")))
            }
        });

        assert_eq!(subscriber.name(), "auto-only");
        assert!(subscriber.on_mode_change(&SystemMode::Auto).is_ok());
        assert!(subscriber.on_mode_change(&SystemMode::NewMode).is_err());
    }

    #[test]
    fn subscription_ids_are_unique() {
        assert_ne!(SubscriptionId::new(), SubscriptionId::new());
    }
}
