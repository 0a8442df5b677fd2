//! Observer registry and dispatch order.

use crate::core::{Event, State, Transition};
use std::collections::HashMap;
use std::fmt;

/// Callback notified when a transition fires.
///
/// Observers receive the full matched transition, whichever channel they
/// were registered on.
pub type Observer<S, E> = Box<dyn FnMut(&Transition<S, E>) + Send>;

/// The five notification channels, in dispatch order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Every transition
    Global,
    /// Transitions leaving a given state
    From,
    /// Transitions entering a given state
    To,
    /// Transitions leaving a given state on a given event
    FromEvent,
    /// Transitions entering a given state on a given event
    ToEvent,
}

impl Channel {
    /// Order in which channels are notified for a single transition.
    pub const DISPATCH_ORDER: [Channel; 5] = [
        Channel::Global,
        Channel::From,
        Channel::To,
        Channel::FromEvent,
        Channel::ToEvent,
    ];
}

/// Append-only observer lists for each channel and key.
///
/// Within one channel and key, observers run in registration order.
/// There is no way to remove an observer once registered.
pub struct ObserverRegistry<S: State, E: Event> {
    global: Vec<Observer<S, E>>,
    from: HashMap<S, Vec<Observer<S, E>>>,
    to: HashMap<S, Vec<Observer<S, E>>>,
    from_event: HashMap<(S, E), Vec<Observer<S, E>>>,
    to_event: HashMap<(S, E), Vec<Observer<S, E>>>,
}

impl<S: State, E: Event> Default for ObserverRegistry<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> ObserverRegistry<S, E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            global: Vec::new(),
            from: HashMap::new(),
            to: HashMap::new(),
            from_event: HashMap::new(),
            to_event: HashMap::new(),
        }
    }

    /// Register for every transition.
    pub fn add_global(&mut self, observer: Observer<S, E>) {
        self.global.push(observer);
    }

    /// Register for transitions leaving `from`.
    pub fn add_from(&mut self, from: S, observer: Observer<S, E>) {
        self.from.entry(from).or_default().push(observer);
    }

    /// Register for transitions entering `to`.
    pub fn add_to(&mut self, to: S, observer: Observer<S, E>) {
        self.to.entry(to).or_default().push(observer);
    }

    /// Register for transitions leaving `from` on `event`.
    pub fn add_from_event(&mut self, from: S, event: E, observer: Observer<S, E>) {
        self.from_event.entry((from, event)).or_default().push(observer);
    }

    /// Register for transitions entering `to` on `event`.
    pub fn add_to_event(&mut self, to: S, event: E, observer: Observer<S, E>) {
        self.to_event.entry((to, event)).or_default().push(observer);
    }

    /// Invoke every observer interested in `transition`.
    ///
    /// Channels run in [`Channel::DISPATCH_ORDER`]. Returns how many observers
    /// were called. A panicking observer unwinds through this call and the
    /// remaining observers are skipped.
    pub fn notify(&mut self, transition: &Transition<S, E>) -> usize {
        let mut notified = 0;
        for channel in Channel::DISPATCH_ORDER {
            if let Some(observers) = self.observers_mut(channel, transition) {
                for observer in observers.iter_mut() {
                    observer(transition);
                }
                notified += observers.len();
            }
        }
        notified
    }

    fn observers_mut(
        &mut self,
        channel: Channel,
        transition: &Transition<S, E>,
    ) -> Option<&mut Vec<Observer<S, E>>> {
        match channel {
            Channel::Global => Some(&mut self.global),
            Channel::From => self.from.get_mut(&transition.from),
            Channel::To => self.to.get_mut(&transition.to),
            Channel::FromEvent => self
                .from_event
                .get_mut(&(transition.from.clone(), transition.event.clone())),
            Channel::ToEvent => self
                .to_event
                .get_mut(&(transition.to.clone(), transition.event.clone())),
        }
    }

    /// Number of observers registered on a channel, across all keys.
    pub fn count(&self, channel: Channel) -> usize {
        match channel {
            Channel::Global => self.global.len(),
            Channel::From => self.from.values().map(Vec::len).sum(),
            Channel::To => self.to.values().map(Vec::len).sum(),
            Channel::FromEvent => self.from_event.values().map(Vec::len).sum(),
            Channel::ToEvent => self.to_event.values().map(Vec::len).sum(),
        }
    }

    /// Number of observers registered across all channels.
    pub fn len(&self) -> usize {
        Channel::DISPATCH_ORDER
            .into_iter()
            .map(|channel| self.count(channel))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: State, E: Event> fmt::Debug for ObserverRegistry<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("global", &self.count(Channel::Global))
            .field("from", &self.count(Channel::From))
            .field("to", &self.count(Channel::To))
            .field("from_event", &self.count(Channel::FromEvent))
            .field("to_event", &self.count(Channel::ToEvent))
            .finish()
    }
}
