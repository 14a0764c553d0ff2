//! Plain-data machine definitions.
//!
//! `EventDef` and `LoopDef` describe table entries. `TableDefinition` bundles
//! them with the initial state and runtime options so a whole table can be
//! kept in a JSON or YAML file. Callbacks are code and are attached through
//! [`MachineBuilder`](crate::MachineBuilder).

use crate::builder::error::DefinitionError;
use crate::core::{Event, State};
use crate::machine::MachineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `event` moves the machine from any state in `from` to `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EventDef<S: State, E: Event> {
    pub event: E,
    pub from: Vec<S>,
    pub to: S,
}

impl<S: State, E: Event> EventDef<S, E> {
    pub fn new(event: E, from: impl IntoIterator<Item = S>, to: S) -> Self {
        Self {
            event,
            from: from.into_iter().collect(),
            to,
        }
    }
}

/// `event` is accepted in every state in `stay` and leaves the machine
/// where it is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct LoopDef<S: State, E: Event> {
    pub event: E,
    pub stay: Vec<S>,
}

impl<S: State, E: Event> LoopDef<S, E> {
    pub fn new(event: E, stay: impl IntoIterator<Item = S>) -> Self {
        Self {
            event,
            stay: stay.into_iter().collect(),
        }
    }
}

/// Serializable description of a machine's table.
///
/// # Example
///
/// ```rust
/// use turnstile::TableDefinition;
///
/// let yaml = r#"
/// initial: locked
/// events:
///   - event: coin
///     from: [locked]
///     to: unlocked
///   - event: push
///     from: [unlocked]
///     to: locked
/// loops:
///   - event: push
///     stay: [locked]
/// "#;
///
/// let definition: TableDefinition<String, String> = TableDefinition::from_yaml_str(yaml).unwrap();
/// assert_eq!(definition.initial, "locked");
/// assert_eq!(definition.events.len(), 2);
/// assert_eq!(definition.loops.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TableDefinition<S: State, E: Event> {
    pub initial: S,

    #[serde(default)]
    pub events: Vec<EventDef<S, E>>,

    #[serde(default)]
    pub loops: Vec<LoopDef<S, E>>,

    #[serde(default)]
    pub config: MachineConfig,
}

impl<S: State, E: Event> TableDefinition<S, E> {
    /// A definition with no entries yet.
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            events: Vec::new(),
            loops: Vec::new(),
            config: MachineConfig::default(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a definition file, choosing the format by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Self, DefinitionError> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            _ => {
                return Err(DefinitionError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let text = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&text)
    }

    pub fn to_json_string(&self) -> Result<String, DefinitionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, DefinitionError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::HistoryPolicy;
    use std::io::Write;

    fn s(value: &str) -> String {
        value.to_string()
    }

    #[test]
    fn event_def_collects_sources() {
        let def: EventDef<String, String> = EventDef::new(s("go"), [s("a"), s("b")], s("c"));
        assert_eq!(def.from, vec!["a", "b"]);
        assert_eq!(def.to, "c");
    }

    #[test]
    fn json_definition_parses_with_defaults() {
        let json = r#"{
            "initial": "a",
            "events": [{ "event": "go", "from": ["a"], "to": "b" }]
        }"#;

        let definition: TableDefinition<String, String> = TableDefinition::from_json_str(json).unwrap();

        assert_eq!(definition.initial, "a");
        assert_eq!(definition.events[0], EventDef::new(s("go"), [s("a")], s("b")));
        assert!(definition.loops.is_empty());
        assert_eq!(definition.config, MachineConfig::default());
    }

    #[test]
    fn yaml_definition_reads_config() {
        let yaml = "initial: a\nloops:\n  - event: stay\n    stay: [a, b]\nconfig:\n  history:\n    mode: bounded\n    limit: 10\n";

        let definition: TableDefinition<String, String> = TableDefinition::from_yaml_str(yaml).unwrap();

        assert_eq!(definition.loops[0], LoopDef::new(s("stay"), [s("a"), s("b")]));
        assert_eq!(definition.config.history, HistoryPolicy::Bounded(10));
    }

    #[test]
    fn malformed_text_is_reported() {
        let err = TableDefinition::<String, String>::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DefinitionError::Json(_)));

        let err = TableDefinition::<String, String>::from_yaml_str("events: [").unwrap_err();
        assert!(matches!(err, DefinitionError::Yaml(_)));
    }

    #[test]
    fn missing_initial_state_is_rejected() {
        let err = TableDefinition::<String, String>::from_json_str(r#"{"events": []}"#).unwrap_err();
        assert!(err.to_string().contains("initial"));
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "initial: a").unwrap();
        writeln!(file, "events:").unwrap();
        writeln!(file, "  - {{ event: go, from: [a], to: b }}").unwrap();

        let definition: TableDefinition<String, String> = TableDefinition::from_path(file.path()).unwrap();
        assert_eq!(definition.events.len(), 1);
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        let err = TableDefinition::<String, String>::from_path("machine.toml").unwrap_err();
        assert!(matches!(err, DefinitionError::UnsupportedFormat { .. }));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = TableDefinition::<String, String>::from_path("/nonexistent/machine.json").unwrap_err();
        assert!(matches!(err, DefinitionError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/machine.json"));
    }

    #[test]
    fn definitions_survive_json_and_yaml() {
        let mut definition = TableDefinition::new(s("a"));
        definition.events.push(EventDef::new(s("go"), [s("a")], s("b")));
        definition.loops.push(LoopDef::new(s("stay"), [s("b")]));

        let json = definition.to_json_string().unwrap();
        let yaml = definition.to_yaml_string().unwrap();

        assert_eq!(TableDefinition::from_json_str(&json).unwrap(), definition);
        assert_eq!(TableDefinition::from_yaml_str(&yaml).unwrap(), definition);
    }
}
