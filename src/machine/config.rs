//! Machine configuration.

use serde::{Deserialize, Serialize};

/// How much transition history a machine keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "limit")]
pub enum HistoryPolicy {
    /// Record nothing
    #[default]
    Disabled,

    /// Record every successful transition
    Unbounded,

    /// Record only the newest `n` transitions
    Bounded(usize),
}

impl HistoryPolicy {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub(crate) fn limit(&self) -> Option<usize> {
        match self {
            Self::Bounded(n) => Some(*n),
            _ => None,
        }
    }
}

/// Runtime options for a [`Machine`](crate::Machine).
///
/// Deserializes from an empty map to the defaults, so it can be omitted
/// from definition files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub history: HistoryPolicy,
}
