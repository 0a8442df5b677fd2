//! The transition engine.

use crate::core::{Event, HistoryHandle, State, Transition, TransitionTable};
use crate::engine::observers::{Channel, ObserverRegistry};
use uuid::Uuid;

/// Finite state machine that notifies observers as transitions fire.
///
/// The engine owns an immutable [`TransitionTable`], the current state and
/// an [`ObserverRegistry`]. [`handle`](Self::handle) is the only way the
/// current state changes, so it is always either the initial state or the
/// `to` of a transition that has fired.
///
/// # Example
///
/// ```rust
/// use graphfsm::{Engine, Transition};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Turnstile { Locked, Unlocked }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Input { Coin, Push }
///
/// let mut engine = Engine::new(
///     Turnstile::Locked,
///     vec![
///         Transition::new(Turnstile::Locked, Input::Coin, Turnstile::Unlocked),
///         Transition::new(Turnstile::Unlocked, Input::Push, Turnstile::Locked),
///     ],
/// );
///
/// let unlocks = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&unlocks);
/// engine.on_transition_to(Turnstile::Unlocked, move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// engine.handle(Input::Push); // no transition, ignored
/// assert_eq!(engine.current_state(), &Turnstile::Locked);
///
/// engine.handle(Input::Coin);
/// assert_eq!(engine.current_state(), &Turnstile::Unlocked);
/// assert_eq!(unlocks.load(Ordering::SeqCst), 1);
/// ```
#[derive(Debug)]
pub struct Engine<S: State, E: Event> {
    id: Uuid,
    table: TransitionTable<S, E>,
    current: S,
    observers: ObserverRegistry<S, E>,
}

impl<S: State, E: Event> Engine<S, E> {
    /// Create an engine in `initial` with the given transitions.
    ///
    /// Exact duplicate transitions collapse. No other validation happens;
    /// use [`EngineBuilder`](crate::EngineBuilder) to reject conflicting tables.
    pub fn new<I>(initial: S, transitions: I) -> Self
    where
        I: IntoIterator<Item = Transition<S, E>>,
    {
        Self::with_table(initial, TransitionTable::new(transitions))
    }

    pub(crate) fn with_table(initial: S, table: TransitionTable<S, E>) -> Self {
        let id = Uuid::new_v4();
        tracing::trace!(
            engine = %id,
            initial = ?initial,
            transitions = table.len(),
            "Created engine"
        );
        Self {
            id,
            table,
            current: initial,
            observers: ObserverRegistry::new(),
        }
    }

    /// Unique id, used to tag log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// The deduplicated transition table.
    pub fn transitions(&self) -> &TransitionTable<S, E> {
        &self.table
    }

    /// The transition `handle(event)` would fire from the current state.
    pub fn transition_for(&self, event: &E) -> Option<&Transition<S, E>> {
        self.table.lookup(&self.current, event)
    }

    /// Check if `event` would fire a transition from the current state.
    pub fn can_handle(&self, event: &E) -> bool {
        self.transition_for(event).is_some()
    }

    /// Events that have a transition out of the current state, in table order.
    pub fn permitted_events(&self) -> Vec<&E> {
        let mut events: Vec<&E> = Vec::new();
        for transition in self.table.outgoing(&self.current) {
            if !events.contains(&&transition.event) {
                events.push(&transition.event);
            }
        }
        events
    }

    /// Process an event.
    ///
    /// If a transition matches the current state and `event`, every
    /// interested observer runs (global, from, to, from+event, to+event, each
    /// in registration order) and then the state moves to the transition's
    /// `to`. Observers therefore run while the engine still reports the
    /// old state. An event with no matching transition is ignored.
    ///
    /// If an observer panics, the panic propagates, later observers are
    /// skipped and the state is left unchanged.
    pub fn handle(&mut self, event: E) {
        let Some(transition) = self.table.lookup(&self.current, &event) else {
            tracing::debug!(
                engine = %self.id,
                state = ?self.current,
                event = ?event,
                "No transition for event"
            );
            return;
        };

        let notified = self.observers.notify(transition);
        tracing::trace!(
            engine = %self.id,
            from = ?transition.from,
            event = ?transition.event,
            to = ?transition.to,
            notified,
            "Transition fired"
        );
        self.current = transition.to.clone();
    }

    /// Observe every transition.
    pub fn on_transition<F>(&mut self, callback: F)
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.observers.add_global(Box::new(callback));
    }

    /// Observe transitions leaving `from`.
    pub fn on_transition_from<F>(&mut self, from: S, callback: F)
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.observers.add_from(from, Box::new(callback));
    }

    /// Observe transitions entering `to`.
    pub fn on_transition_to<F>(&mut self, to: S, callback: F)
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.observers.add_to(to, Box::new(callback));
    }

    /// Observe transitions leaving `from` on `event`.
    pub fn on_transition_from_on<F>(&mut self, from: S, event: E, callback: F)
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.observers.add_from_event(from, event, Box::new(callback));
    }

    /// Observe transitions entering `to` on `event`.
    pub fn on_transition_to_on<F>(&mut self, to: S, event: E, callback: F)
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.observers.add_to_event(to, event, Box::new(callback));
    }

    /// Start recording fired transitions.
    ///
    /// Registers a global observer, so recording happens in global-channel
    /// order relative to other global observers. Each call starts an
    /// independent history.
    pub fn track_history(&mut self) -> HistoryHandle<S, E>
    where
        S: Send + 'static,
        E: Send + 'static,
    {
        let handle = HistoryHandle::new();
        let sink = handle.clone();
        self.on_transition(move |transition| sink.push(transition));
        handle
    }

    /// Total number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Number of observers registered on one channel.
    pub fn channel_observer_count(&self, channel: Channel) -> usize {
        self.observers.count(channel)
    }
}
