//! Opt-in checks over machine definitions.
//!
//! Construction is deliberately permissive: duplicates overwrite, unknown
//! keys are accepted and nothing is validated. This module reports the
//! cases that are usually mistakes, using Stillwater's `Validation` to
//! collect every finding in one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use turnstile::{LintFinding, MachineBuilder};
//! use stillwater::validation::Validation;
//!
//! let builder = MachineBuilder::<String, String>::new("a".to_string())
//!     .transition("go".to_string(), ["a".to_string()], "b".to_string())
//!     .transition("go".to_string(), ["a".to_string()], "c".to_string())
//!     .before("jump".to_string(), |_, _| Ok(()));
//!
//! match builder.lint() {
//!     Validation::Failure(findings) => assert_eq!(findings.len(), 2),
//!     Validation::Success(_) => panic!("expected findings"),
//! }
//!
//! // Findings never block construction.
//! let machine = builder.build();
//! assert_eq!(machine.table().len(), 1);
//! ```

mod findings;

pub use findings::LintFinding;

use crate::builder::{EventDef, LoopDef};
use crate::core::{Event, State};
use crate::machine::{CallbackDef, Phase, TransitionKey};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Lint a definition, accumulating ALL findings.
/// Returns Validation::Success(()) if nothing looks wrong.
pub fn lint<S: State, E: Event, A>(
    initial: &S,
    events: &[EventDef<S, E>],
    loops: &[LoopDef<S, E>],
    callbacks: &[CallbackDef<S, E, A>],
) -> Validation<(), NonEmptyVec<LintFinding>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<LintFinding>>> = Vec::new();

    // Resolve the table the same way construction does, keeping first-seen order
    let mut table: HashMap<TransitionKey<S, E>, S> = HashMap::new();
    let mut order: Vec<TransitionKey<S, E>> = Vec::new();
    let mut shadowed: HashSet<TransitionKey<S, E>> = HashSet::new();
    let mut known_states: HashSet<&S> = HashSet::from([initial]);

    let entries = events
        .iter()
        .flat_map(|def| def.from.iter().map(move |from| (&def.event, from, &def.to)))
        .chain(
            loops
                .iter()
                .flat_map(|def| def.stay.iter().map(move |state| (&def.event, state, state))),
        );

    for (event, from, to) in entries {
        known_states.insert(from);
        known_states.insert(to);

        let key = TransitionKey {
            event: event.clone(),
            from: from.clone(),
        };
        if table.insert(key.clone(), to.clone()).is_some() {
            if shadowed.insert(key.clone()) {
                checks.push(Validation::fail(LintFinding::ShadowedTransition {
                    event: event.name().to_string(),
                    from: from.name().to_string(),
                }));
            }
        } else {
            order.push(key);
        }
    }

    let known_events: HashSet<&E> = order.iter().map(|key| &key.event).collect();
    let mut registered_events: HashSet<(Phase, &E)> = HashSet::new();
    let mut overwritten_events: HashSet<(Phase, &E)> = HashSet::new();
    let mut registered_states: HashSet<(Phase, &S)> = HashSet::new();
    let mut overwritten_states: HashSet<(Phase, &S)> = HashSet::new();

    for def in callbacks {
        let phase = def.phase();
        let key = def.key_name().to_string();

        let overwritten = match def {
            CallbackDef::Before(event, _) | CallbackDef::After(event, _) => {
                !registered_events.insert((phase, event)) && overwritten_events.insert((phase, event))
            }
            CallbackDef::Enter(state, _) | CallbackDef::Leave(state, _) => {
                !registered_states.insert((phase, state)) && overwritten_states.insert((phase, state))
            }
        };
        if overwritten {
            checks.push(Validation::fail(LintFinding::OverwrittenCallback {
                phase,
                key: key.clone(),
            }));
        }

        match def {
            CallbackDef::Before(event, _) | CallbackDef::After(event, _) => {
                if !known_events.contains(event) {
                    checks.push(Validation::fail(LintFinding::UnknownEvent { phase, event: key }));
                } else if phase == Phase::After && only_loops(&order, &table, event) {
                    checks.push(Validation::fail(LintFinding::AfterNeverRuns { event: key }));
                }
            }
            CallbackDef::Enter(state, _) | CallbackDef::Leave(state, _) => {
                if !known_states.contains(state) {
                    checks.push(Validation::fail(LintFinding::UnknownState { phase, state: key }));
                }
            }
        }
    }

    // Check the machine can ever move
    let can_leave_initial = order
        .iter()
        .any(|key| &key.from == initial && table.get(key).is_some_and(|to| to != initial));
    if !can_leave_initial && !initial.is_final() {
        checks.push(Validation::fail(LintFinding::InitialStateCannotLeave {
            state: initial.name().to_string(),
        }));
    }

    // Accumulate ALL findings using all_vec
    Validation::all_vec(checks).map(|_| ())
}

fn only_loops<S: State, E: Event>(
    order: &[TransitionKey<S, E>],
    table: &HashMap<TransitionKey<S, E>, S>,
    event: &E,
) -> bool {
    order
        .iter()
        .filter(|key| &key.event == event)
        .all(|key| table.get(key) == Some(&key.from))
}
