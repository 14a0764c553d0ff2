//! Turnstile: an embeddable event-driven finite state machine
//!
//! A machine is defined by an initial state, a table of
//! `(event, from) -> to` entries and optional lifecycle callbacks. Firing
//! an event looks the entry up, runs the callbacks in a fixed order and
//! moves the machine to the destination state.
//!
//! # Core Concepts
//!
//! - **State / Event**: opaque, comparable, hashable values (`String` or
//!   enums declared with `state_enum!`/`event_enum!`)
//! - **Transition table**: built once, never modified afterwards; later
//!   definitions for the same key win, loops win over plain events
//! - **Callbacks**: Before/After per event, Enter/Leave per state, each
//!   able to refuse the transition by returning an error
//! - **Probing**: `can`/`probe` run the same Before/Enter/Leave callbacks
//!   as `fire` without changing state, so those callbacks may run twice
//!
//! # Example
//!
//! ```rust
//! use turnstile::{MachineBuilder, MachineError};
//!
//! let mut machine = MachineBuilder::<String, String>::new("a".to_string())
//!     .transition("go".to_string(), ["a".to_string()], "b".to_string())
//!     .transition("next".to_string(), ["b".to_string()], "c".to_string())
//!     .loop_event("stay".to_string(), ["a".to_string(), "b".to_string()])
//!     .after("stay".to_string(), |_, _| panic!("never runs on a self-loop"))
//!     .build();
//!
//! machine.fire("stay").unwrap();
//! assert_eq!(machine.current(), "a");
//!
//! machine.fire("go").unwrap();
//! assert_eq!(machine.current(), "b");
//!
//! let err = machine.fire("missing").unwrap_err();
//! assert!(matches!(err, MachineError::InvalidTransition { .. }));
//! assert_eq!(machine.current(), "b");
//!
//! machine.fire("next").unwrap();
//! assert_eq!(machine.current(), "c");
//! ```

pub mod analysis;
pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use analysis::LintFinding;
pub use builder::{DefinitionError, EventDef, LoopDef, MachineBuilder, TableDefinition};
pub use core::{Event, State, StateHistory, StateTransition};
pub use machine::{
    CallbackDef, CallbackError, CallbackResult, HistoryPolicy, Machine, MachineConfig, MachineError,
    Phase, TransitionContext, TransitionKey, TransitionTable,
};
