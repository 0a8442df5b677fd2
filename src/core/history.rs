//! Transition history tracking.
//!
//! Keeps an ordered, timestamped log of the transitions a machine has fired.
//! History is filled by an ordinary global observer (see
//! [`Engine::track_history`](crate::Engine::track_history)), so recording it
//! never changes what `handle` does.

use super::state::{Event, State};
use super::transition::Transition;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A fired transition and when it fired.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionRecord<S, E> {
    /// The transition that fired
    pub transition: Transition<S, E>,
    /// When the observers were notified
    pub timestamp: DateTime<Utc>,
    /// Zero-based position in the history
    pub sequence: u64,
}

/// Ordered history of fired transitions.
///
/// # Example
///
/// ```rust
/// use graphfsm::core::{StateHistory, Transition};
///
/// let mut history = StateHistory::new();
/// history.record(Transition::new("start", "go", "middle"));
/// history.record(Transition::new("middle", "go", "end"));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.path(), vec![&"start", &"middle", &"end"]);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct StateHistory<S, E> {
    records: Vec<TransitionRecord<S, E>>,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a transition stamped with the current time.
    pub fn record(&mut self, transition: Transition<S, E>) {
        self.record_at(transition, Utc::now());
    }

    /// Append a transition with an explicit timestamp.
    pub fn record_at(&mut self, transition: Transition<S, E>, timestamp: DateTime<Utc>) {
        let sequence = self.records.len() as u64;
        self.records.push(TransitionRecord {
            transition,
            timestamp,
            sequence,
        });
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first record followed by the `to`
    /// state of every record. Empty when nothing has been recorded.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(&first.transition.from);
        }
        for record in &self.records {
            path.push(&record.transition.to);
        }
        path
    }

    /// Calculate total duration from first to last record.
    ///
    /// Returns `None` if there are no records, or if the clock went
    /// backwards between them.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<&TransitionRecord<S, E>> {
        self.records.last()
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[TransitionRecord<S, E>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Shared handle to a history filled by a registered observer.
///
/// Cloning the handle shares the same underlying history.
#[derive(Debug)]
pub struct HistoryHandle<S, E> {
    inner: Arc<Mutex<StateHistory<S, E>>>,
}

impl<S, E> Clone for HistoryHandle<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event> HistoryHandle<S, E> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StateHistory::new())),
        }
    }

    pub(crate) fn push(&self, transition: &Transition<S, E>) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(transition.clone());
    }

    /// Copy of the history as it stands now.
    pub fn snapshot(&self) -> StateHistory<S, E> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
