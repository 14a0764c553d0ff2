//! Lint findings.

use crate::machine::Phase;
use thiserror::Error;

/// Something in a definition that is legal but probably unintended.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LintFinding {
    #[error("Transition for event '{event}' from '{from}' is defined more than once; the last definition wins")]
    ShadowedTransition { event: String, from: String },

    #[error("{phase} callback for '{key}' is registered more than once; the last registration wins")]
    OverwrittenCallback { phase: Phase, key: String },

    #[error("{phase} callback is registered for event '{event}', which no transition uses")]
    UnknownEvent { phase: Phase, event: String },

    #[error("{phase} callback is registered for state '{state}', which no transition mentions")]
    UnknownState { phase: Phase, state: String },

    #[error("after callback for '{event}' never runs: every transition on it is a self-loop")]
    AfterNeverRuns { event: String },

    #[error("Initial state '{state}' has no transition to another state")]
    InitialStateCannotLeave { state: String },
}
