//! Lifecycle callbacks and their registries.

use crate::core::{Event, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Error returned by a user callback. Passed to the caller unchanged.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by every callback.
pub type CallbackResult = Result<(), CallbackError>;

/// A stored lifecycle callback.
///
/// Receives the transition being attempted and the caller's arguments.
pub type Callback<S, E, A> =
    Arc<dyn Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync>;

/// Point in the transition protocol at which a callback runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Keyed by event; runs first
    Before,
    /// Keyed by destination state; runs second
    Enter,
    /// Keyed by source state; runs third
    Leave,
    /// Keyed by event; runs after the state changed, never on a loop
    After,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Before => "before",
            Self::Enter => "enter",
            Self::Leave => "leave",
            Self::After => "after",
        };
        f.write_str(name)
    }
}

/// The transition a callback is invoked for.
///
/// `from` is always the state the machine was in when the event fired,
/// including for After callbacks that run once the state has moved on.
#[derive(Debug)]
pub struct TransitionContext<'a, S: State, E: Event> {
    pub event: &'a E,
    pub from: &'a S,
    pub to: &'a S,
}

impl<S: State, E: Event> Clone for TransitionContext<'_, S, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: State, E: Event> Copy for TransitionContext<'_, S, E> {}

impl<S: State, E: Event> TransitionContext<'_, S, E> {
    /// Whether the transition leaves the machine where it is.
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

/// A callback registration: the phase, its key, and the function.
///
/// Before/After are keyed by event, Enter/Leave by state.
///
/// # Example
///
/// ```rust
/// use turnstile::CallbackDef;
///
/// let def: CallbackDef<String, String> = CallbackDef::enter("open".to_string(), |ctx, _| {
///     if ctx.from == "broken" {
///         return Err("cannot open a broken door".into());
///     }
///     Ok(())
/// });
///
/// assert_eq!(def.phase(), turnstile::Phase::Enter);
/// ```
pub enum CallbackDef<S: State, E: Event, A = ()> {
    Before(E, Callback<S, E, A>),
    After(E, Callback<S, E, A>),
    Enter(S, Callback<S, E, A>),
    Leave(S, Callback<S, E, A>),
}

impl<S: State, E: Event, A> CallbackDef<S, E, A> {
    /// Run `f` before any transition triggered by `event`.
    pub fn before<F>(event: E, f: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync + 'static,
    {
        Self::Before(event, Arc::new(f))
    }

    /// Run `f` after the state changed because of `event`.
    pub fn after<F>(event: E, f: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync + 'static,
    {
        Self::After(event, Arc::new(f))
    }

    /// Run `f` when a transition targets `state`.
    pub fn enter<F>(state: S, f: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync + 'static,
    {
        Self::Enter(state, Arc::new(f))
    }

    /// Run `f` when a transition starts from `state`.
    pub fn leave<F>(state: S, f: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync + 'static,
    {
        Self::Leave(state, Arc::new(f))
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::Before(..) => Phase::Before,
            Self::After(..) => Phase::After,
            Self::Enter(..) => Phase::Enter,
            Self::Leave(..) => Phase::Leave,
        }
    }

    /// Name of the event or state this callback is keyed by.
    pub fn key_name(&self) -> &str {
        match self {
            Self::Before(event, _) | Self::After(event, _) => event.name(),
            Self::Enter(state, _) | Self::Leave(state, _) => state.name(),
        }
    }
}

impl<S: State, E: Event, A> Clone for CallbackDef<S, E, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Before(event, f) => Self::Before(event.clone(), Arc::clone(f)),
            Self::After(event, f) => Self::After(event.clone(), Arc::clone(f)),
            Self::Enter(state, f) => Self::Enter(state.clone(), Arc::clone(f)),
            Self::Leave(state, f) => Self::Leave(state.clone(), Arc::clone(f)),
        }
    }
}

impl<S: State, E: Event, A> fmt::Debug for CallbackDef<S, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDef")
            .field("phase", &self.phase())
            .field("key", &self.key_name())
            .finish_non_exhaustive()
    }
}

/// The four per-phase callback maps. One callback per key; the last
/// registration wins.
pub(crate) struct CallbackRegistry<S: State, E: Event, A> {
    before: HashMap<E, Callback<S, E, A>>,
    after: HashMap<E, Callback<S, E, A>>,
    enter: HashMap<S, Callback<S, E, A>>,
    leave: HashMap<S, Callback<S, E, A>>,
}

impl<S: State, E: Event, A> Default for CallbackRegistry<S, E, A> {
    fn default() -> Self {
        Self {
            before: HashMap::new(),
            after: HashMap::new(),
            enter: HashMap::new(),
            leave: HashMap::new(),
        }
    }
}

impl<S: State, E: Event, A> CallbackRegistry<S, E, A> {
    pub(crate) fn register(&mut self, def: CallbackDef<S, E, A>) {
        match def {
            CallbackDef::Before(event, f) => {
                self.before.insert(event, f);
            }
            CallbackDef::After(event, f) => {
                self.after.insert(event, f);
            }
            CallbackDef::Enter(state, f) => {
                self.enter.insert(state, f);
            }
            CallbackDef::Leave(state, f) => {
                self.leave.insert(state, f);
            }
        }
    }

    pub(crate) fn before(&self, event: &E) -> Option<&Callback<S, E, A>> {
        self.before.get(event)
    }

    pub(crate) fn after(&self, event: &E) -> Option<&Callback<S, E, A>> {
        self.after.get(event)
    }

    pub(crate) fn enter(&self, state: &S) -> Option<&Callback<S, E, A>> {
        self.enter.get(state)
    }

    pub(crate) fn leave(&self, state: &S) -> Option<&Callback<S, E, A>> {
        self.leave.get(state)
    }

    pub(crate) fn len(&self) -> usize {
        self.before.len() + self.after.len() + self.enter.len() + self.leave.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Def = CallbackDef<String, String>;

    #[test]
    fn phase_displays_lowercase() {
        assert_eq!(Phase::Before.to_string(), "before");
        assert_eq!(Phase::After.to_string(), "after");
        assert_eq!(Phase::Enter.to_string(), "enter");
        assert_eq!(Phase::Leave.to_string(), "leave");
    }

    #[test]
    fn context_detects_loops() {
        let event = "stay".to_string();
        let a = "a".to_string();
        let b = "b".to_string();

        let looped = TransitionContext {
            event: &event,
            from: &a,
            to: &a,
        };
        let moved = TransitionContext {
            event: &event,
            from: &a,
            to: &b,
        };

        assert!(looped.is_loop());
        assert!(!moved.is_loop());
    }

    #[test]
    fn def_reports_phase_and_key() {
        let def = Def::leave("a".to_string(), |_, _| Ok(()));
        assert_eq!(def.phase(), Phase::Leave);
        assert_eq!(def.key_name(), "a");

        let def = Def::after("go".to_string(), |_, _| Ok(()));
        assert_eq!(def.phase(), Phase::After);
        assert_eq!(def.key_name(), "go");
        assert!(format!("{def:?}").contains("After"));
    }

    #[test]
    fn later_registration_overwrites_earlier() {
        let mut registry = CallbackRegistry::default();
        registry.register(Def::before("go".to_string(), |_, _| Err("first".into())));
        registry.register(Def::before("go".to_string(), |_, _| Ok(())));

        let event = "go".to_string();
        let state = "a".to_string();
        let ctx = TransitionContext {
            event: &event,
            from: &state,
            to: &state,
        };

        assert_eq!(registry.len(), 1);
        let callback = registry.before(&event).unwrap();
        assert!(callback(&ctx, &()).is_ok());
    }

    #[test]
    fn phases_are_kept_apart() {
        let mut registry = CallbackRegistry::default();
        registry.register(Def::after("go".to_string(), |_, _| Ok(())));
        registry.register(Def::enter("b".to_string(), |_, _| Ok(())));
        registry.register(Def::leave("a".to_string(), |_, _| Ok(())));

        assert!(registry.before(&"go".to_string()).is_none());
        assert!(registry.after(&"go".to_string()).is_some());
        assert!(registry.enter(&"b".to_string()).is_some());
        assert!(registry.enter(&"a".to_string()).is_none());
        assert!(registry.leave(&"a".to_string()).is_some());
        assert_eq!(registry.len(), 3);
    }
}
