//! Macros for declaring mode sets.

/// Declare a closed mode enum and its `State` implementation.
///
/// The generated type works with the generic parts of the crate:
/// [`TransitionTableBuilder`](crate::builder::TransitionTableBuilder),
/// [`StateMachine`](crate::machine::StateMachine), subscribers, reporters
/// and history. [`ModeRegistry`](crate::core::ModeRegistry),
/// [`Worker`](crate::worker::Worker) and
/// [`Controller`](crate::worker::Controller) are keyed by
/// [`SystemMode`](crate::core::SystemMode); a device with its own mode set
/// reconfigures its subsystems from its own [`ModeSubscriber`]s.
///
/// [`ModeSubscriber`]: crate::machine::ModeSubscriber
///
/// # Example
///
/// ```
/// use modeshift::builder::TransitionTableBuilder;
/// use modeshift::machine::{CallbackSubscriber, StateMachine};
/// use modeshift::mode_enum;
/// use modeshift::core::State;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// mode_enum! {
///     pub enum PumpMode {
///         Idle,
///         Priming,
///         Pumping,
///         Fault,
///     }
///     final: [Fault]
/// }
///
/// assert_eq!(PumpMode::all().len(), 4);
/// assert_eq!(PumpMode::Priming.name(), "Priming");
/// assert!(PumpMode::Fault.is_final());
///
/// let table = TransitionTableBuilder::new()
///     .route(PumpMode::Idle, "prime", PumpMode::Priming)
///     .route(PumpMode::Priming, "primed", PumpMode::Pumping)
///     .route(PumpMode::Pumping, "dry_run", PumpMode::Fault)
///     .build()
///     .unwrap();
/// let machine = StateMachine::new(PumpMode::Idle, table);
///
/// let motor_on = Arc::new(AtomicBool::new(false));
/// let motor = Arc::clone(&motor_on);
/// machine.subscribe(Arc::new(CallbackSubscriber::new("motor", move |mode: &PumpMode| {
///     motor.store(*mode == PumpMode::Pumping, Ordering::SeqCst);
///     Ok(())
/// })));
///
/// machine.request_mode("prime").unwrap();
/// machine.request_mode("primed").unwrap();
/// assert!(motor_on.load(Ordering::SeqCst));
/// assert!(machine.request_mode("prime").is_err());
/// ```
#[macro_export]
macro_rules! mode_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn all() -> Vec<Self> {
                vec![$(Self::$variant),*]
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
