//! Thread-safe engine handle.
//!
//! [`SharedEngine`] puts a whole [`Engine`] behind one mutex, so lookup,
//! notification and the state update happen as a single step from every
//! caller's point of view. Observers run on the thread that called
//! `handle`, with the lock held.

use crate::core::{Event, HistoryHandle, State, Transition};
use crate::engine::error::DispatchError;
use crate::engine::machine::Engine;
use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use uuid::Uuid;

thread_local! {
    // Engines currently dispatching on this thread, innermost last.
    static DISPATCHING: RefCell<Vec<Uuid>> = const { RefCell::new(Vec::new()) };
}

fn is_dispatching(engine: Uuid) -> bool {
    DISPATCHING.with(|stack| stack.borrow().contains(&engine))
}

/// Marks an engine as dispatching on this thread until dropped.
struct DispatchScope {
    engine: Uuid,
}

impl DispatchScope {
    fn enter(engine: Uuid) -> Self {
        DISPATCHING.with(|stack| stack.borrow_mut().push(engine));
        Self { engine }
    }
}

impl Drop for DispatchScope {
    fn drop(&mut self) {
        DISPATCHING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(position) = stack.iter().rposition(|id| *id == self.engine) {
                stack.remove(position);
            }
        });
    }
}

struct Inner<S: State, E: Event> {
    id: Uuid,
    engine: Mutex<Engine<S, E>>,
    // Last committed state, readable while a dispatch holds the engine lock.
    committed: RwLock<S>,
}

/// Cloneable, mutex-guarded [`Engine`] for use from several threads.
///
/// Calls from different threads are serialized. A call made from inside one
/// of this engine's own observers (same thread, same engine) would deadlock
/// on the lock, so it is rejected with [`DispatchError::Reentrant`] instead,
/// without firing observers or touching state.
///
/// [`current_state`](Self::current_state) never takes the engine lock: it
/// returns the last committed state, which observers see as the state
/// before the transition they are being told about.
///
/// The engine owns its observers, so an observer holding a `SharedEngine`
/// clone keeps the engine alive forever. Observers that need to call back
/// into their own engine should capture a [`WeakEngine`] from
/// [`downgrade`](Self::downgrade) instead.
///
/// # Example
///
/// ```rust
/// use graphfsm::{Engine, SharedEngine, Transition};
/// use std::thread;
///
/// let shared = SharedEngine::new(Engine::new(
///     0u32,
///     (0..4u32).map(|n| Transition::new(n, "tick", n + 1)),
/// ));
///
/// let worker = shared.clone();
/// thread::spawn(move || worker.handle("tick").unwrap())
///     .join()
///     .unwrap();
///
/// assert_eq!(shared.current_state(), 1);
/// ```
pub struct SharedEngine<S: State, E: Event> {
    inner: Arc<Inner<S, E>>,
}

impl<S: State, E: Event> Clone for SharedEngine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event> SharedEngine<S, E> {
    /// Move an engine behind the shared lock.
    pub fn new(engine: Engine<S, E>) -> Self {
        let id = engine.id();
        let committed = RwLock::new(engine.current_state().clone());
        Self {
            inner: Arc::new(Inner {
                id,
                engine: Mutex::new(engine),
                committed,
            }),
        }
    }

    /// Id of the wrapped engine.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Create a handle that does not keep the engine alive.
    pub fn downgrade(&self) -> WeakEngine<S, E> {
        WeakEngine {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Last committed state.
    pub fn current_state(&self) -> S {
        self.inner
            .committed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Process an event under the engine lock.
    ///
    /// Blocks while another thread is dispatching. Returns an error only
    /// for re-entrant calls; an event with no matching transition is
    /// still `Ok(())`.
    pub fn handle(&self, event: E) -> Result<(), DispatchError> {
        self.guard("handle")?;
        let _scope = DispatchScope::enter(self.inner.id);

        let mut engine = self.lock();
        engine.handle(event);
        *self
            .inner
            .committed
            .write()
            .unwrap_or_else(PoisonError::into_inner) = engine.current_state().clone();
        Ok(())
    }

    /// Run a read-only query against the engine.
    pub fn inspect<R>(&self, query: impl FnOnce(&Engine<S, E>) -> R) -> Result<R, DispatchError> {
        self.guard("inspect")?;
        let _scope = DispatchScope::enter(self.inner.id);

        let engine = self.lock();
        Ok(query(&*engine))
    }

    /// Check whether `event` would fire a transition right now.
    pub fn can_handle(&self, event: &E) -> Result<bool, DispatchError> {
        self.inspect(|engine| engine.can_handle(event))
    }

    /// Observe every transition.
    pub fn on_transition<F>(&self, callback: F) -> Result<(), DispatchError>
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.register(|engine| engine.on_transition(callback))
    }

    /// Observe transitions leaving `from`.
    pub fn on_transition_from<F>(&self, from: S, callback: F) -> Result<(), DispatchError>
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.register(|engine| engine.on_transition_from(from, callback))
    }

    /// Observe transitions entering `to`.
    pub fn on_transition_to<F>(&self, to: S, callback: F) -> Result<(), DispatchError>
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.register(|engine| engine.on_transition_to(to, callback))
    }

    /// Observe transitions leaving `from` on `event`.
    pub fn on_transition_from_on<F>(&self, from: S, event: E, callback: F) -> Result<(), DispatchError>
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.register(|engine| engine.on_transition_from_on(from, event, callback))
    }

    /// Observe transitions entering `to` on `event`.
    pub fn on_transition_to_on<F>(&self, to: S, event: E, callback: F) -> Result<(), DispatchError>
    where
        F: FnMut(&Transition<S, E>) + Send + 'static,
    {
        self.register(|engine| engine.on_transition_to_on(to, event, callback))
    }

    /// Start recording fired transitions.
    pub fn track_history(&self) -> Result<HistoryHandle<S, E>, DispatchError>
    where
        S: Send + 'static,
        E: Send + 'static,
    {
        self.guard("track_history")?;
        let _scope = DispatchScope::enter(self.inner.id);
        let mut engine = self.lock();
        Ok(engine.track_history())
    }

    fn register(&self, add: impl FnOnce(&mut Engine<S, E>)) -> Result<(), DispatchError> {
        self.guard("registration")?;
        let _scope = DispatchScope::enter(self.inner.id);
        add(&mut *self.lock());
        Ok(())
    }

    fn guard(&self, operation: &'static str) -> Result<(), DispatchError> {
        if is_dispatching(self.inner.id) {
            tracing::warn!(engine = %self.inner.id, operation, "Rejected re-entrant call from observer");
            return Err(DispatchError::Reentrant {
                engine: self.inner.id,
                operation,
            });
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Engine<S, E>> {
        self.inner.engine.lock().unwrap_or_else(|poisoned| {
            // A panicking observer skips the state update, so the engine is intact.
            tracing::warn!(engine = %self.inner.id, "Recovered engine lock after observer panic");
            self.inner.engine.clear_poison();
            poisoned.into_inner()
        })
    }
}

impl<S: State, E: Event> fmt::Debug for SharedEngine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEngine")
            .field("id", &self.inner.id)
            .field("current_state", &self.current_state())
            .finish()
    }
}

/// Non-owning [`SharedEngine`] handle, for observers that drive their own engine.
pub struct WeakEngine<S: State, E: Event> {
    inner: Weak<Inner<S, E>>,
}

impl<S: State, E: Event> Clone for WeakEngine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event> WeakEngine<S, E> {
    /// Get the engine back, or `None` once every `SharedEngine` is dropped.
    pub fn upgrade(&self) -> Option<SharedEngine<S, E>> {
        self.inner.upgrade().map(|inner| SharedEngine { inner })
    }
}

impl<S: State, E: Event> fmt::Debug for WeakEngine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEngine")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Locked,
        Unlocked,
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestEvent {
        Coin,
        Push,
    }

    fn turnstile() -> SharedEngine<TestState, TestEvent> {
        SharedEngine::new(Engine::new(
            TestState::Locked,
            vec![
                Transition::new(TestState::Locked, TestEvent::Coin, TestState::Unlocked),
                Transition::new(TestState::Unlocked, TestEvent::Push, TestState::Locked),
            ],
        ))
    }

    #[test]
    fn handle_commits_state() {
        let shared = turnstile();

        shared.handle(TestEvent::Coin).unwrap();
        assert_eq!(shared.current_state(), TestState::Unlocked);

        shared.handle(TestEvent::Coin).unwrap();
        assert_eq!(shared.current_state(), TestState::Unlocked);
        assert_eq!(shared.can_handle(&TestEvent::Push), Ok(true));
    }

    #[test]
    fn observers_see_state_before_transition() {
        let shared = turnstile();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handle = shared.downgrade();
        let sink = Arc::clone(&seen);
        shared
            .on_transition(move |t| {
                let state = handle.upgrade().unwrap().current_state();
                sink.lock().unwrap().push((state, t.to.clone()));
            })
            .unwrap();

        shared.handle(TestEvent::Coin).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(TestState::Locked, TestState::Unlocked)]
        );
    }

    #[test]
    fn reentrant_handle_is_rejected() {
        let shared = turnstile();
        let results = Arc::new(Mutex::new(Vec::new()));

        let handle = shared.downgrade();
        let sink = Arc::clone(&results);
        shared
            .on_transition_to(TestState::Unlocked, move |_| {
                let engine = handle.upgrade().unwrap();
                sink.lock().unwrap().push(engine.handle(TestEvent::Push));
            })
            .unwrap();

        shared.handle(TestEvent::Coin).unwrap();

        let results = results.lock().unwrap();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(DispatchError::Reentrant {
                operation: "handle",
                ..
            })
        ));
        assert_eq!(shared.current_state(), TestState::Unlocked);
    }

    #[test]
    fn reentrant_registration_is_rejected() {
        let shared = turnstile();
        let rejected = Arc::new(AtomicUsize::new(0));

        let handle = shared.downgrade();
        let counter = Arc::clone(&rejected);
        shared
            .on_transition(move |_| {
                let engine = handle.upgrade().unwrap();
                if engine.on_transition(|_| {}).is_err() {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();

        shared.handle(TestEvent::Coin).unwrap();
        assert_eq!(rejected.load(Ordering::SeqCst), 1);
        assert_eq!(shared.inspect(|engine| engine.observer_count()), Ok(1));
    }

    #[test]
    fn reentrant_inspect_is_rejected() {
        let shared = turnstile();
        let (tx, rx) = mpsc::channel();

        // Run on a worker so a deadlock fails the test instead of hanging it.
        let worker = shared.clone();
        thread::spawn(move || {
            let outer = worker.clone();
            let nested = worker.inspect(move |_| {
                (
                    outer.handle(TestEvent::Coin),
                    outer.inspect(|engine| engine.observer_count()),
                    outer.track_history().map(|_| ()),
                )
            });
            let _ = tx.send(nested);
        });

        let (handled, inspected, tracked) = rx
            .recv_timeout(Duration::from_secs(3))
            .expect("nested call from inspect blocked on the engine lock")
            .unwrap();
        assert!(matches!(
            handled,
            Err(DispatchError::Reentrant {
                operation: "handle",
                ..
            })
        ));
        assert!(matches!(
            inspected,
            Err(DispatchError::Reentrant {
                operation: "inspect",
                ..
            })
        ));
        assert!(matches!(
            tracked,
            Err(DispatchError::Reentrant {
                operation: "track_history",
                ..
            })
        ));
        assert_eq!(shared.current_state(), TestState::Locked);
        assert_eq!(shared.inspect(|engine| engine.observer_count()), Ok(0));
    }

    #[test]
    fn inspect_scope_ends_with_the_call() {
        let shared = turnstile();

        assert_eq!(shared.inspect(|engine| engine.can_handle(&TestEvent::Coin)), Ok(true));
        shared.handle(TestEvent::Coin).unwrap();
        assert_eq!(shared.current_state(), TestState::Unlocked);
    }

    #[test]
    fn weak_observer_does_not_keep_engine_alive() {
        let shared = turnstile();
        let weak = shared.downgrade();

        let handle = shared.downgrade();
        shared
            .on_transition(move |_| {
                if let Some(engine) = handle.upgrade() {
                    let _ = engine.handle(TestEvent::Push);
                }
            })
            .unwrap();
        shared.handle(TestEvent::Coin).unwrap();
        assert!(weak.upgrade().is_some());

        drop(shared);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn strong_observer_keeps_engine_alive() {
        let shared = turnstile();
        let weak = shared.downgrade();

        let handle = shared.clone();
        shared
            .on_transition(move |_| {
                let _ = handle.current_state();
            })
            .unwrap();

        drop(shared);
        assert!(weak.upgrade().is_some());
    }

    #[test]
    fn other_engines_can_be_driven_from_observers() {
        let outer = turnstile();
        let inner = turnstile();

        let target = inner.clone();
        outer
            .on_transition(move |_| target.handle(TestEvent::Coin).unwrap())
            .unwrap();

        outer.handle(TestEvent::Coin).unwrap();
        assert_eq!(inner.current_state(), TestState::Unlocked);
    }

    #[test]
    fn recovers_after_observer_panic() {
        let shared = turnstile();
        shared
            .on_transition_from_on(TestState::Locked, TestEvent::Coin, |_| {
                panic!("observer failed")
            })
            .unwrap();

        let worker = shared.clone();
        let outcome = thread::spawn(move || worker.handle(TestEvent::Coin)).join();
        assert!(outcome.is_err());

        assert_eq!(shared.current_state(), TestState::Locked);
        assert_eq!(shared.can_handle(&TestEvent::Coin), Ok(true));
    }

    #[test]
    fn concurrent_events_are_serialized() {
        let shared = SharedEngine::new(Engine::new(
            0u32,
            (0..100u32).map(|n| Transition::new(n, TestEvent::Coin, n + 1)),
        ));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        shared
            .on_transition(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let worker = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        worker.handle(TestEvent::Coin).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(shared.current_state(), 100);
        assert_eq!(fired.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn history_tracks_shared_dispatch() {
        let shared = turnstile();
        let history = shared.track_history().unwrap();

        shared.handle(TestEvent::Coin).unwrap();
        shared.handle(TestEvent::Push).unwrap();

        assert_eq!(history.len(), 2);
    }
}
