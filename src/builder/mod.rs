//! Builder API for ergonomic machine construction.
//!
//! This module provides the plain-data definitions a machine is built from,
//! a fluent builder, loading of definitions from JSON/YAML, and macros for
//! declaring state and event enums.

pub mod definition;
pub mod error;
pub mod machine;
pub mod macros;

pub use definition::{EventDef, LoopDef, TableDefinition};
pub use error::DefinitionError;
pub use machine::MachineBuilder;
