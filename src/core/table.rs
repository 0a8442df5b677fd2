//! Immutable transition table with `(from, event)` lookup.

use super::state::{Event, State};
use super::transition::Transition;
use std::collections::{HashMap, HashSet};

/// Deduplicated set of transitions, indexed by `(from, event)`.
///
/// The table is built once and never changes. Exact duplicate triples
/// collapse silently. Transitions keep the order in which they were first
/// supplied, and when several distinct transitions share a `(from, event)`
/// pair the earliest one is the one [`lookup`](Self::lookup) returns.
///
/// # Example
///
/// ```rust
/// use graphfsm::core::{Transition, TransitionTable};
///
/// let table = TransitionTable::new(vec![
///     Transition::new("locked", "coin", "unlocked"),
///     Transition::new("locked", "coin", "unlocked"),
///     Transition::new("unlocked", "push", "locked"),
/// ]);
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.lookup(&"locked", &"coin").map(|t| t.to), Some("unlocked"));
/// assert!(table.lookup(&"locked", &"push").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State, E: Event> {
    transitions: Vec<Transition<S, E>>,
    index: HashMap<(S, E), usize>,
}

impl<S: State, E: Event> TransitionTable<S, E> {
    /// Build a table from transitions in input order.
    pub fn new<I>(transitions: I) -> Self
    where
        I: IntoIterator<Item = Transition<S, E>>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut index = HashMap::new();

        for transition in transitions {
            if !seen.insert(transition.clone()) {
                continue;
            }
            index
                .entry((transition.from.clone(), transition.event.clone()))
                .or_insert(ordered.len());
            ordered.push(transition);
        }

        Self {
            transitions: ordered,
            index,
        }
    }

    /// Find the transition for `event` arriving in `state`.
    pub fn lookup(&self, state: &S, event: &E) -> Option<&Transition<S, E>> {
        // Keys are owned tuples, so probing needs a clone of both halves.
        self.index
            .get(&(state.clone(), event.clone()))
            .map(|&position| &self.transitions[position])
    }

    /// Transitions leaving `state`, in table order.
    pub fn outgoing<'a>(&'a self, state: &'a S) -> impl Iterator<Item = &'a Transition<S, E>> + 'a {
        self.transitions.iter().filter(move |t| t.from == *state)
    }

    /// Pairs of distinct transitions sharing a `(from, event)` key.
    ///
    /// Each pair is `(winner, shadowed)`: the first element is the transition
    /// lookup returns, the second one can never fire.
    pub fn conflicts(&self) -> Vec<(&Transition<S, E>, &Transition<S, E>)> {
        self.transitions
            .iter()
            .enumerate()
            .filter_map(|(position, transition)| {
                let winner = self.index[&(transition.from.clone(), transition.event.clone())];
                (winner != position).then_some((&self.transitions[winner], transition))
            })
            .collect()
    }

    /// Check that every `(from, event)` pair has at most one transition.
    pub fn is_deterministic(&self) -> bool {
        self.index.len() == self.transitions.len()
    }

    /// Iterate over transitions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transition<S, E>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl<S: State, E: Event> FromIterator<Transition<S, E>> for TransitionTable<S, E> {
    fn from_iter<I: IntoIterator<Item = Transition<S, E>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a, S: State, E: Event> IntoIterator for &'a TransitionTable<S, E> {
    type Item = &'a Transition<S, E>;
    type IntoIter = std::slice::Iter<'a, Transition<S, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
