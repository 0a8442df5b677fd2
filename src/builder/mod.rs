//! Builder API for engine construction.
//!
//! This module provides a fluent builder, a serializable machine
//! definition and a table macro for creating engines with minimal
//! boilerplate.

pub mod definition;
pub mod error;
pub mod machine;
pub mod macros;

pub use definition::MachineDefinition;
pub use error::BuildError;
pub use machine::EngineBuilder;

use crate::core::{Event, State, Transition};

/// Create a transition for every state in `states` that moves to `to` on
/// `event`, in the order the states are given.
///
/// Useful for events such as "reset" that are accepted everywhere.
///
/// # Example
///
/// ```
/// use graphfsm::builder::from_any;
///
/// let resets = from_any(["idle", "running", "failed"], "reset", "idle");
/// assert_eq!(resets.len(), 3);
/// assert!(resets.iter().all(|t| t.to == "idle"));
/// ```
pub fn from_any<S, E, I>(states: I, event: E, to: S) -> Vec<Transition<S, E>>
where
    S: State,
    E: Event,
    I: IntoIterator<Item = S>,
{
    states
        .into_iter()
        .map(|from| Transition::new(from, event.clone(), to.clone()))
        .collect()
}

/// Create a transition that leaves the machine in `state` when `event`
/// arrives, notifying observers without changing state.
///
/// # Example
///
/// ```
/// use graphfsm::builder::self_loop;
///
/// let stay = self_loop("unlocked", "coin");
/// assert!(stay.is_self_loop());
/// ```
pub fn self_loop<S: State, E: Event>(state: S, event: E) -> Transition<S, E> {
    Transition::new(state.clone(), event, state)
}
