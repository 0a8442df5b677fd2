//! Transition rules.

use super::state::{Event, State};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rule moving the machine from `from` to `to` when `event` arrives.
///
/// Transitions are immutable values with structural identity: two
/// transitions are equal iff all three fields are equal. The same value
/// is handed to every observer when the rule fires.
///
/// # Example
///
/// ```rust
/// use graphfsm::core::Transition;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Turnstile {
///     Locked,
///     Unlocked,
/// }
///
/// let coin = Transition::new(Turnstile::Locked, "coin", Turnstile::Unlocked);
///
/// assert!(coin.matches(&Turnstile::Locked, &"coin"));
/// assert!(!coin.matches(&Turnstile::Unlocked, &"coin"));
/// assert_eq!(coin, Transition::new(Turnstile::Locked, "coin", Turnstile::Unlocked));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition<S, E> {
    /// The state the rule applies in
    pub from: S,
    /// The event that triggers the rule
    pub event: E,
    /// The state the machine ends up in
    pub to: S,
}

impl<S: State, E: Event> Transition<S, E> {
    /// Create a new transition.
    pub fn new(from: S, event: E, to: S) -> Self {
        Self { from, event, to }
    }

    /// Check whether this rule applies to `event` arriving in `state`.
    pub fn matches(&self, state: &S, event: &E) -> bool {
        self.from == *state && self.event == *event
    }

    /// Check whether the rule leaves the machine in the state it started from.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl<S: State, E: Event> From<(S, E, S)> for Transition<S, E> {
    fn from((from, event, to): (S, E, S)) -> Self {
        Self::new(from, event, to)
    }
}

impl<S: State, E: Event> fmt::Display for Transition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} --{:?}--> {:?}", self.from, self.event, self.to)
    }
}
