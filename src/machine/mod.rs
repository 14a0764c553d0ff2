//! The transition engine.
//!
//! A [`Machine`] owns its current state, an immutable transition table and
//! four callback registries. Firing an event runs, in order:
//!
//! - the Before callback for the event
//! - the Enter callback for the destination state
//! - the Leave callback for the current state
//! - the state change, unless the transition is a self-loop
//! - the After callback for the event, unless the transition is a self-loop
//!
//! Any callback error stops the sequence and is returned as is. Only an
//! After failure is reported once the state has already changed.

mod callbacks;
mod config;
mod engine;
mod error;
mod table;

pub use callbacks::{Callback, CallbackDef, CallbackError, CallbackResult, Phase, TransitionContext};
pub use config::{HistoryPolicy, MachineConfig};
pub use engine::Machine;
pub use error::MachineError;
pub use table::{TransitionKey, TransitionTable};
