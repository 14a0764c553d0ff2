//! The transition engine.

use crate::builder::{EventDef, LoopDef};
use crate::core::{Event, State, StateHistory, StateTransition};
use crate::machine::callbacks::{Callback, CallbackDef, CallbackRegistry, Phase, TransitionContext};
use crate::machine::config::MachineConfig;
use crate::machine::error::MachineError;
use crate::machine::table::{TransitionKey, TransitionTable};
use chrono::Utc;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace};

/// An event-driven finite state machine.
///
/// `S` is the state type, `E` the event type and `A` the argument type
/// handed to every callback (defaults to `()`).
///
/// The machine is a plain value with no internal locking. It is `Send` and
/// `Sync` whenever its type parameters are, so callers that share one
/// across threads wrap it in their own mutex.
///
/// # Example
///
/// ```rust
/// use turnstile::{EventDef, Machine};
///
/// let mut machine: Machine<String, String> = Machine::new(
///     "a".to_string(),
///     vec![
///         EventDef::new("go".to_string(), ["a".to_string()], "b".to_string()),
///         EventDef::new("next".to_string(), ["b".to_string()], "c".to_string()),
///     ],
///     vec![],
///     vec![],
/// );
///
/// machine.fire("go").unwrap();
/// assert_eq!(machine.current(), "b");
///
/// assert!(machine.fire("missing").unwrap_err().is_invalid_transition());
/// assert_eq!(machine.current(), "b");
///
/// machine.fire("next").unwrap();
/// assert_eq!(machine.current(), "c");
/// ```
pub struct Machine<S: State, E: Event, A = ()> {
    current: S,
    table: TransitionTable<S, E>,
    callbacks: CallbackRegistry<S, E, A>,
    config: MachineConfig,
    history: Option<StateHistory<S, E>>,
}

impl<S: State, E: Event, A> Machine<S, E, A> {
    /// Build a machine from its definition.
    ///
    /// Event definitions are inserted first, then loop definitions, then
    /// callbacks are registered. At every step a later entry for the same
    /// key replaces an earlier one, so a loop definition wins over an event
    /// definition for the same `(event, state)` pair. Nothing is validated;
    /// see [`MachineBuilder::lint`](crate::MachineBuilder::lint) for an
    /// opt-in check.
    pub fn new(
        initial: S,
        events: Vec<EventDef<S, E>>,
        loops: Vec<LoopDef<S, E>>,
        callbacks: Vec<CallbackDef<S, E, A>>,
    ) -> Self {
        Self::with_config(initial, events, loops, callbacks, MachineConfig::default())
    }

    /// Like [`Machine::new`] with explicit runtime options.
    pub fn with_config(
        initial: S,
        events: Vec<EventDef<S, E>>,
        loops: Vec<LoopDef<S, E>>,
        callbacks: Vec<CallbackDef<S, E, A>>,
        config: MachineConfig,
    ) -> Self {
        let mut table = TransitionTable::default();
        for def in events {
            for from in def.from {
                let key = TransitionKey {
                    event: def.event.clone(),
                    from,
                };
                table.insert(key, def.to.clone());
            }
        }
        for def in loops {
            for state in def.stay {
                let key = TransitionKey {
                    event: def.event.clone(),
                    from: state.clone(),
                };
                table.insert(key, state);
            }
        }

        let mut registry = CallbackRegistry::default();
        for def in callbacks {
            registry.register(def);
        }

        debug!(
            initial = initial.name(),
            transitions = table.len(),
            callbacks = registry.len(),
            "state machine constructed"
        );

        Self {
            current: initial,
            table,
            callbacks: registry,
            config,
            history: config.history.is_enabled().then(StateHistory::new),
        }
    }

    /// Get the current state (pure).
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Check if the machine is in a final state (pure).
    pub fn is_final(&self) -> bool {
        self.current.is_final()
    }

    /// The transition table (read-only).
    pub fn table(&self) -> &TransitionTable<S, E> {
        &self.table
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Transition history, when enabled through [`MachineConfig`].
    pub fn history(&self) -> Option<&StateHistory<S, E>> {
        self.history.as_ref()
    }

    /// Events with a table entry from the current state, in no particular
    /// order. Callbacks are not consulted.
    pub fn available_events(&self) -> Vec<&E> {
        self.table.events_from(&self.current).collect()
    }

    /// Check whether `event` would be accepted with `args`.
    ///
    /// Returns the error [`fire_with`](Self::fire_with) would fail with
    /// before committing: `InvalidTransition` when the table has no entry,
    /// otherwise the first failure among the Before, Enter and Leave
    /// callbacks, run in that order.
    ///
    /// Probing runs those callbacks for real, so their side effects happen
    /// here and again on the subsequent `fire`. The After callback is never
    /// run by a probe.
    pub fn probe_with<Q>(&self, event: &Q, args: &A) -> Result<(), MachineError<S, E>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        let (event, to) = self.resolve(event)?;
        let ctx = TransitionContext {
            event,
            from: &self.current,
            to,
        };
        self.run_guards(&ctx, args)
    }

    /// Whether `event` would be accepted with `args`. See
    /// [`probe_with`](Self::probe_with) for the callback side effects.
    pub fn can_with<Q>(&self, event: &Q, args: &A) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        self.probe_with(event, args).is_ok()
    }

    /// Negation of [`can_with`](Self::can_with): true for an invalid
    /// transition and for a refusing callback alike.
    ///
    /// Only the verdict is returned. Call [`probe_with`](Self::probe_with)
    /// to get the reason, `InvalidTransition` or the callback's error.
    pub fn cannot_with<Q>(&self, event: &Q, args: &A) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        !self.can_with(event, args)
    }

    /// Fire `event`, passing `args` to every callback.
    ///
    /// Order of operations:
    ///
    /// 1. Look up `(event, current)`; no entry fails with `InvalidTransition`.
    /// 2. Before callback for the event.
    /// 3. Enter callback for the destination.
    /// 4. Leave callback for the current state.
    /// 5. If the destination is the current state, stop here with `Ok`.
    /// 6. Commit the new current state.
    /// 7. After callback for the event.
    ///
    /// A failure in steps 1-4 leaves the state untouched (earlier callbacks
    /// are not undone). A failure in step 7 is returned but the state has
    /// already changed.
    ///
    /// Callbacks only see a [`TransitionContext`] and cannot reach the
    /// machine; re-entering it from a callback through shared interior
    /// mutability is unsupported.
    pub fn fire_with<Q>(&mut self, event: &Q, args: &A) -> Result<(), MachineError<S, E>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        let (event, to) = self
            .resolve(event)
            .map(|(event, to)| (event.clone(), to.clone()))?;

        let ctx = TransitionContext {
            event: &event,
            from: &self.current,
            to: &to,
        };
        self.run_guards(&ctx, args)?;

        if ctx.is_loop() {
            trace!(event = event.name(), state = to.name(), "self-transition, skipping after");
            self.record(event, to.clone(), to);
            return Ok(());
        }

        let from = std::mem::replace(&mut self.current, to.clone());
        debug!(
            event = event.name(),
            from = from.name(),
            to = to.name(),
            "state transition committed"
        );

        let ctx = TransitionContext {
            event: &event,
            from: &from,
            to: &to,
        };
        let result = Self::dispatch(Phase::After, self.callbacks.after(&event), &ctx, args);
        self.record(event, from, to);
        result
    }

    fn resolve<Q>(&self, event: &Q) -> Result<(&E, &S), MachineError<S, E>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        self.table.get(&self.current, event).ok_or_else(|| {
            let event = event.to_owned();
            trace!(
                event = event.name(),
                from = self.current.name(),
                "no transition for event"
            );
            MachineError::InvalidTransition {
                event,
                from: self.current.clone(),
            }
        })
    }

    fn run_guards(&self, ctx: &TransitionContext<'_, S, E>, args: &A) -> Result<(), MachineError<S, E>> {
        Self::dispatch(Phase::Before, self.callbacks.before(ctx.event), ctx, args)?;
        Self::dispatch(Phase::Enter, self.callbacks.enter(ctx.to), ctx, args)?;
        Self::dispatch(Phase::Leave, self.callbacks.leave(ctx.from), ctx, args)
    }

    fn dispatch(
        phase: Phase,
        callback: Option<&Callback<S, E, A>>,
        ctx: &TransitionContext<'_, S, E>,
        args: &A,
    ) -> Result<(), MachineError<S, E>> {
        let Some(callback) = callback else {
            return Ok(());
        };
        trace!(
            %phase,
            event = ctx.event.name(),
            from = ctx.from.name(),
            to = ctx.to.name(),
            "running callback"
        );
        callback(ctx, args).map_err(MachineError::Callback)
    }

    fn record(&mut self, event: E, from: S, to: S) {
        let limit = self.config.history.limit();
        if let Some(history) = self.history.as_mut() {
            history.push_bounded(
                StateTransition {
                    event,
                    from,
                    to,
                    timestamp: Utc::now(),
                },
                limit,
            );
        }
    }
}

impl<S: State, E: Event, A: Default> Machine<S, E, A> {
    /// [`probe_with`](Self::probe_with) with default arguments.
    pub fn probe<Q>(&self, event: &Q) -> Result<(), MachineError<S, E>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        self.probe_with(event, &A::default())
    }

    /// [`can_with`](Self::can_with) with default arguments.
    pub fn can<Q>(&self, event: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        self.can_with(event, &A::default())
    }

    /// [`cannot_with`](Self::cannot_with) with default arguments.
    pub fn cannot<Q>(&self, event: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        self.cannot_with(event, &A::default())
    }

    /// [`fire_with`](Self::fire_with) with default arguments.
    pub fn fire<Q>(&mut self, event: &Q) -> Result<(), MachineError<S, E>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = E> + ?Sized,
    {
        self.fire_with(event, &A::default())
    }
}

impl<S: State, E: Event, A> fmt::Debug for Machine<S, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current)
            .field("transitions", &self.table.len())
            .field("callbacks", &self.callbacks.len())
            .field("config", &self.config)
            .finish()
    }
}
