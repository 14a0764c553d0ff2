//! Builder for constructing machines.

use crate::analysis::{self, LintFinding};
use crate::builder::definition::{EventDef, LoopDef, TableDefinition};
use crate::core::{Event, State};
use crate::machine::{CallbackDef, CallbackResult, HistoryPolicy, Machine, MachineConfig, TransitionContext};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing machines with a fluent API.
///
/// Entries may be added in any order: `build` always inserts event
/// definitions first and loop definitions second, so loops win conflicts.
/// Building never fails.
///
/// # Example
///
/// ```rust
/// use turnstile::MachineBuilder;
///
/// let mut machine = MachineBuilder::<String, String>::new("locked".to_string())
///     .transition("coin".to_string(), ["locked".to_string()], "unlocked".to_string())
///     .transition("push".to_string(), ["unlocked".to_string()], "locked".to_string())
///     .loop_event("push".to_string(), ["locked".to_string()])
///     .enter("unlocked".to_string(), |_, _| Ok(()))
///     .build();
///
/// machine.fire("push").unwrap();
/// assert_eq!(machine.current(), "locked");
/// machine.fire("coin").unwrap();
/// assert_eq!(machine.current(), "unlocked");
/// ```
pub struct MachineBuilder<S: State, E: Event, A = ()> {
    initial: S,
    events: Vec<EventDef<S, E>>,
    loops: Vec<LoopDef<S, E>>,
    callbacks: Vec<CallbackDef<S, E, A>>,
    config: MachineConfig,
}

impl<S: State, E: Event, A> MachineBuilder<S, E, A> {
    /// Create a new builder starting in `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            events: Vec::new(),
            loops: Vec::new(),
            callbacks: Vec::new(),
            config: MachineConfig::default(),
        }
    }

    /// Start from a loaded definition; callbacks are added afterwards.
    pub fn from_definition(definition: TableDefinition<S, E>) -> Self {
        Self {
            initial: definition.initial,
            events: definition.events,
            loops: definition.loops,
            callbacks: Vec::new(),
            config: definition.config,
        }
    }

    /// Add a transition from each state in `from` to `to`.
    pub fn transition(self, event: E, from: impl IntoIterator<Item = S>, to: S) -> Self {
        self.event(EventDef::new(event, from, to))
    }

    /// Add a pre-built event definition.
    pub fn event(mut self, def: EventDef<S, E>) -> Self {
        self.events.push(def);
        self
    }

    /// Add multiple event definitions at once.
    pub fn events(mut self, defs: impl IntoIterator<Item = EventDef<S, E>>) -> Self {
        self.events.extend(defs);
        self
    }

    /// Accept `event` in every state in `stay` without leaving it.
    pub fn loop_event(mut self, event: E, stay: impl IntoIterator<Item = S>) -> Self {
        self.loops.push(LoopDef::new(event, stay));
        self
    }

    /// Add multiple loop definitions at once.
    pub fn loops(mut self, defs: impl IntoIterator<Item = LoopDef<S, E>>) -> Self {
        self.loops.extend(defs);
        self
    }

    /// Add a pre-built callback registration.
    pub fn callback(mut self, def: CallbackDef<S, E, A>) -> Self {
        self.callbacks.push(def);
        self
    }

    pub fn before<F>(self, event: E, f: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync + 'static,
    {
        self.callback(CallbackDef::before(event, f))
    }

    pub fn after<F>(self, event: E, f: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync + 'static,
    {
        self.callback(CallbackDef::after(event, f))
    }

    pub fn enter<F>(self, state: S, f: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync + 'static,
    {
        self.callback(CallbackDef::enter(state, f))
    }

    pub fn leave<F>(self, state: S, f: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>, &A) -> CallbackResult + Send + Sync + 'static,
    {
        self.callback(CallbackDef::leave(state, f))
    }

    /// Set how much history the machine records.
    pub fn history(mut self, policy: HistoryPolicy) -> Self {
        self.config.history = policy;
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Check the collected definitions for likely mistakes.
    ///
    /// Reports every finding at once. Findings never stop `build`; the
    /// machine keeps its last-write-wins semantics either way.
    pub fn lint(&self) -> Validation<(), NonEmptyVec<LintFinding>> {
        analysis::lint(&self.initial, &self.events, &self.loops, &self.callbacks)
    }

    /// Build the machine.
    pub fn build(self) -> Machine<S, E, A> {
        Machine::with_config(
            self.initial,
            self.events,
            self.loops,
            self.callbacks,
            self.config,
        )
    }
}
