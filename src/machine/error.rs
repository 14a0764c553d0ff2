//! Errors returned by machine operations.

use crate::core::{Event, State};
use crate::machine::callbacks::CallbackError;
use thiserror::Error;

/// Errors that can occur when probing or firing an event.
#[derive(Debug, Error)]
pub enum MachineError<S: State, E: Event> {
    /// The table has no entry for `(event, from)`.
    #[error("invalid transition: event {event:?} is not permitted from state {from:?}")]
    InvalidTransition { event: E, from: S },

    /// A callback refused the transition. Displays as the callback's own
    /// error.
    #[error("{0}")]
    Callback(CallbackError),
}

impl<S: State, E: Event> MachineError<S, E> {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Borrow the error a callback returned, if this is one.
    pub fn callback_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Callback(err) => Some(err.as_ref()),
            Self::InvalidTransition { .. } => None,
        }
    }

    /// Take back the error a callback returned, if this is one.
    pub fn into_callback_error(self) -> Option<CallbackError> {
        match self {
            Self::Callback(err) => Some(err),
            Self::InvalidTransition { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, PartialEq)]
    struct Refused(u32);

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "refused with code {}", self.0)
        }
    }

    impl std::error::Error for Refused {}

    #[test]
    fn invalid_transition_names_event_and_state() {
        let err: MachineError<String, String> = MachineError::InvalidTransition {
            event: "missing".to_string(),
            from: "b".to_string(),
        };

        assert!(err.is_invalid_transition());
        assert!(err.callback_error().is_none());
        let message = err.to_string();
        assert!(message.contains("\"missing\""));
        assert!(message.contains("\"b\""));
    }

    #[test]
    fn callback_error_is_passed_through_unchanged() {
        let err: MachineError<String, String> = MachineError::Callback(Box::new(Refused(7)));

        assert!(!err.is_invalid_transition());
        assert_eq!(err.to_string(), "refused with code 7");
        assert!(err.callback_error().unwrap().is::<Refused>());

        let original = err.into_callback_error().unwrap();
        assert_eq!(*original.downcast::<Refused>().unwrap(), Refused(7));
    }
}
