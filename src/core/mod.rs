//! Core vocabulary types.
//!
//! This module contains the types every machine is generic over:
//! - `State` and `Event` traits for the table alphabet
//! - Transition history records
//!
//! Nothing in here touches a machine; it is all plain data.

mod history;
mod state;

pub use history::{StateHistory, StateTransition};
pub use state::{Event, State};
