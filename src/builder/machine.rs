//! Builder for constructing engines.

use crate::builder::error::BuildError;
use crate::core::{Event, State, Transition, TransitionTable};
use crate::engine::Engine;

/// Builder for constructing engines with a fluent API.
///
/// By default a table with several transitions for the same
/// `(from, event)` pair is accepted and the first one supplied wins.
/// Call [`reject_conflicts`](Self::reject_conflicts) to make such tables
/// a build error instead.
///
/// # Example
///
/// ```rust
/// use graphfsm::{BuildError, EngineBuilder};
///
/// let engine = EngineBuilder::new()
///     .initial("locked")
///     .transition("locked", "coin", "unlocked")
///     .transition("unlocked", "push", "locked")
///     .build()
///     .unwrap();
/// assert_eq!(engine.current_state(), &"locked");
///
/// let conflicting = EngineBuilder::new()
///     .initial("locked")
///     .transition("locked", "coin", "unlocked")
///     .transition("locked", "coin", "open")
///     .reject_conflicts()
///     .build();
/// assert!(matches!(conflicting, Err(BuildError::ConflictingTransitions { .. })));
/// ```
#[derive(Clone, Debug)]
pub struct EngineBuilder<S: State, E: Event> {
    initial: Option<S>,
    transitions: Vec<Transition<S, E>>,
    reject_conflicts: bool,
}

impl<S: State, E: Event> EngineBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            transitions: Vec::new(),
            reject_conflicts: false,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition from its parts.
    pub fn transition(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions<I>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = Transition<S, E>>,
    {
        self.transitions.extend(transitions);
        self
    }

    /// Fail the build when two distinct transitions share `(from, event)`.
    pub fn reject_conflicts(mut self) -> Self {
        self.reject_conflicts = true;
        self
    }

    /// Build the engine.
    /// Returns an error if the initial state is missing, or if conflicts
    /// are rejected and the table has any.
    pub fn build(self) -> Result<Engine<S, E>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let table = TransitionTable::new(self.transitions);

        for (winner, shadowed) in table.conflicts() {
            if self.reject_conflicts {
                return Err(BuildError::ConflictingTransitions {
                    from: format!("{:?}", winner.from),
                    event: format!("{:?}", winner.event),
                    first: winner.to_string(),
                    second: shadowed.to_string(),
                });
            }
            tracing::warn!(%winner, %shadowed, "Transition shadowed by an earlier one and will never fire");
        }

        Ok(Engine::with_table(initial, table))
    }
}

impl<S: State, E: Event> Default for EngineBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Locked,
        Unlocked,
        Open,
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestEvent {
        Coin,
        Push,
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = EngineBuilder::<TestState, TestEvent>::new().build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_allows_empty_table() {
        let engine = EngineBuilder::<TestState, TestEvent>::new()
            .initial(TestState::Locked)
            .build()
            .unwrap();

        assert_eq!(engine.current_state(), &TestState::Locked);
        assert!(engine.transitions().is_empty());
    }

    #[test]
    fn fluent_api_builds_engine() {
        let mut engine = EngineBuilder::new()
            .initial(TestState::Locked)
            .transition(TestState::Locked, TestEvent::Coin, TestState::Unlocked)
            .add_transition(Transition::new(
                TestState::Unlocked,
                TestEvent::Push,
                TestState::Locked,
            ))
            .build()
            .unwrap();

        engine.handle(TestEvent::Coin);
        assert_eq!(engine.current_state(), &TestState::Unlocked);
        engine.handle(TestEvent::Push);
        assert_eq!(engine.current_state(), &TestState::Locked);
    }

    #[test]
    fn duplicates_are_not_conflicts() {
        let engine = EngineBuilder::new()
            .initial(TestState::Locked)
            .transitions(vec![
                Transition::new(TestState::Locked, TestEvent::Coin, TestState::Unlocked),
                Transition::new(TestState::Locked, TestEvent::Coin, TestState::Unlocked),
            ])
            .reject_conflicts()
            .build()
            .unwrap();

        assert_eq!(engine.transitions().len(), 1);
    }

    #[test]
    fn strict_builder_rejects_conflicts() {
        let result = EngineBuilder::new()
            .initial(TestState::Locked)
            .transition(TestState::Locked, TestEvent::Coin, TestState::Unlocked)
            .transition(TestState::Locked, TestEvent::Coin, TestState::Open)
            .reject_conflicts()
            .build();

        match result {
            Err(BuildError::ConflictingTransitions {
                from,
                event,
                first,
                second,
            }) => {
                assert_eq!(from, "Locked");
                assert_eq!(event, "Coin");
                assert_eq!(first, "Locked --Coin--> Unlocked");
                assert_eq!(second, "Locked --Coin--> Open");
            }
            other => panic!("Expected conflict error, got {other:?}"),
        }
    }

    #[test]
    fn lenient_builder_keeps_first_conflict() {
        let mut engine = EngineBuilder::new()
            .initial(TestState::Locked)
            .transition(TestState::Locked, TestEvent::Coin, TestState::Open)
            .transition(TestState::Locked, TestEvent::Coin, TestState::Unlocked)
            .build()
            .unwrap();

        engine.handle(TestEvent::Coin);
        assert_eq!(engine.current_state(), &TestState::Open);
    }
}
