//! Core State trait for mode identifiers.
//!
//! Every mode set driven by a [`StateMachine`](crate::machine::StateMachine)
//! implements this trait. Modes are plain identifiers; their settings live
//! in a separate registry so the identifier type never changes when the
//! configuration schema does.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for a closed set of modes.
///
/// All methods are pure. A mode is an immutable value describing which
/// operating state the device is in.
///
/// # Required Traits
///
/// - `Clone`: modes are handed to every subscriber and recorded in history
/// - `Eq` + `Hash`: modes key the transition table
/// - `Debug`: modes are debuggable for diagnostics
/// - `Serialize` + `Deserialize`: modes appear in configuration files
///
/// # Example
///
/// ```rust
/// use modeshift::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum PumpMode {
///     Idle,
///     Priming,
///     Pumping,
/// }
///
/// impl State for PumpMode {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Priming => "Priming",
///             Self::Pumping => "Pumping",
///         }
///     }
///
///     fn all() -> Vec<Self> {
///         vec![Self::Idle, Self::Priming, Self::Pumping]
///     }
/// }
///
/// assert_eq!(PumpMode::all().len(), 3);
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the mode's name for display/logging.
    fn name(&self) -> &str;

    /// Every member of the closed mode set, in declaration order.
    fn all() -> Vec<Self>;

    /// Check if this is a final (terminal) mode.
    ///
    /// Device modes are normally navigable in every direction, so the
    /// default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
