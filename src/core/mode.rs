//! The built-in device modes.

use super::state::State;
use serde::{Deserialize, Serialize};

/// Operating modes of the device.
///
/// The set is closed: adding a mode means adding a variant here and a
/// matching entry in [`ModeRegistry`](super::ModeRegistry).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemMode {
    /// Idle mode the device boots into.
    #[default]
    Default,
    /// Automatic capture at the low resolution.
    Auto,
    /// Automatic capture at the high resolution.
    NewMode,
}

impl SystemMode {
    pub const ALL: [SystemMode; 3] = [Self::Default, Self::Auto, Self::NewMode];
}

impl State for SystemMode {
    fn name(&self) -> &str {
        match self {
            Self::Default => "DEFAULT",
            Self::Auto => "AUTO",
            Self::NewMode => "NEW_MODE",
        }
    }

    fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

impl std::fmt::Display for SystemMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
