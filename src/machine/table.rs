//! Transition table: `(event, from) -> to`.

use crate::core::{Event, State};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Key into the transition table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionKey<S: State, E: Event> {
    pub event: E,
    pub from: S,
}

/// Immutable mapping from `(event, from)` to the destination state.
///
/// Entries are grouped by source state so that lookups can take a borrowed
/// form of the event (`&str` for `String` events).
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State, E: Event> {
    by_state: HashMap<S, HashMap<E, S>>,
    len: usize,
}

impl<S: State, E: Event> Default for TransitionTable<S, E> {
    fn default() -> Self {
        Self {
            by_state: HashMap::new(),
            len: 0,
        }
    }
}

impl<S: State, E: Event> TransitionTable<S, E> {
    /// Insert an entry, returning the destination it replaced.
    ///
    /// Only reachable while a machine is being constructed.
    pub(crate) fn insert(&mut self, key: TransitionKey<S, E>, to: S) -> Option<S> {
        let previous = self
            .by_state
            .entry(key.from)
            .or_default()
            .insert(key.event, to);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Look up the stored event key and destination for `event` from `from`.
    pub fn get<Q>(&self, from: &S, event: &Q) -> Option<(&E, &S)>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.by_state.get(from)?.get_key_value(event)
    }

    pub fn contains<Q>(&self, from: &S, event: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(from, event).is_some()
    }

    /// Whether the entry for `(event, from)` exists and is a self-transition.
    pub fn is_loop<Q>(&self, from: &S, event: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(from, event).is_some_and(|(_, to)| to == from)
    }

    /// Events with an entry from `from`, in no particular order.
    pub fn events_from<'a>(&'a self, from: &S) -> impl Iterator<Item = &'a E> + 'a {
        self.by_state
            .get(from)
            .into_iter()
            .flat_map(|events| events.keys())
    }

    /// All entries as `(event, from, to)`, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&E, &S, &S)> {
        self.by_state
            .iter()
            .flat_map(|(from, events)| events.iter().map(move |(event, to)| (event, from, to)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(event: &str, from: &str) -> TransitionKey<String, String> {
        TransitionKey {
            event: event.to_string(),
            from: from.to_string(),
        }
    }

    #[test]
    fn insert_and_get_by_borrowed_event() {
        let mut table = TransitionTable::default();
        table.insert(key("go", "a"), "b".to_string());

        let (event, to) = table.get(&"a".to_string(), "go").unwrap();
        assert_eq!(event, "go");
        assert_eq!(to, "b");
        assert!(table.get(&"b".to_string(), "go").is_none());
        assert!(table.get(&"a".to_string(), "missing").is_none());
    }

    #[test]
    fn later_insert_overwrites_without_growing() {
        let mut table = TransitionTable::default();
        assert!(table.insert(key("go", "a"), "b".to_string()).is_none());
        let replaced = table.insert(key("go", "a"), "c".to_string());

        assert_eq!(replaced.as_deref(), Some("b"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&"a".to_string(), "go").unwrap().1, "c");
    }

    #[test]
    fn is_loop_detects_self_transitions() {
        let mut table = TransitionTable::default();
        table.insert(key("stay", "a"), "a".to_string());
        table.insert(key("go", "a"), "b".to_string());

        let a = "a".to_string();
        assert!(table.is_loop(&a, "stay"));
        assert!(!table.is_loop(&a, "go"));
        assert!(!table.is_loop(&a, "missing"));
    }

    #[test]
    fn events_from_lists_outgoing_events() {
        let mut table = TransitionTable::default();
        table.insert(key("go", "a"), "b".to_string());
        table.insert(key("stay", "a"), "a".to_string());
        table.insert(key("next", "b"), "c".to_string());

        let mut events: Vec<_> = table.events_from(&"a".to_string()).cloned().collect();
        events.sort();
        assert_eq!(events, vec!["go", "stay"]);
        assert_eq!(table.events_from(&"z".to_string()).count(), 0);
    }

    #[test]
    fn iter_visits_every_entry() {
        let mut table = TransitionTable::default();
        table.insert(key("go", "a"), "b".to_string());
        table.insert(key("go", "b"), "c".to_string());

        assert_eq!(table.iter().count(), 2);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert!(table
            .iter()
            .any(|(event, from, to)| event == "go" && from == "b" && to == "c"));
    }
}
