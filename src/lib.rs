//! GraphFSM: a generic finite state machine engine with transition observers
//!
//! An [`Engine`] is built from an initial state and a fixed set of
//! `(from, event, to)` rules. Each call to [`Engine::handle`] looks up the
//! rule for the current state and the event, notifies observers, and only
//! then moves to the rule's `to` state. Events with no matching rule are
//! ignored.
//!
//! # Core Concepts
//!
//! - **State / Event**: any `Clone + Eq + Hash + Debug` type
//! - **Transition**: an immutable `(from, event, to)` rule
//! - **Channels**: observers can listen globally, by source state, by target
//!   state, or by either state combined with an event
//! - **Dispatch order**: global, from, to, from+event, to+event, each in
//!   registration order, followed by the state update
//!
//! # Example
//!
//! ```rust
//! use graphfsm::{transitions, Engine};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Turnstile {
//!     Locked,
//!     Unlocked,
//! }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Input {
//!     Coin,
//!     Push,
//! }
//!
//! let mut engine = Engine::new(Turnstile::Locked, transitions![
//!     Turnstile::Locked, Input::Coin => Turnstile::Unlocked;
//!     Turnstile::Unlocked, Input::Push => Turnstile::Locked;
//! ]);
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&log);
//! engine.on_transition(move |t| sink.lock().unwrap().push(t.to_string()));
//!
//! engine.handle(Input::Coin);
//! engine.handle(Input::Coin); // already unlocked, ignored
//! engine.handle(Input::Push);
//!
//! assert_eq!(engine.current_state(), &Turnstile::Locked);
//! assert_eq!(
//!     *log.lock().unwrap(),
//!     vec!["Locked --Coin--> Unlocked", "Unlocked --Push--> Locked"]
//! );
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, EngineBuilder, MachineDefinition};
pub use crate::core::{Event, HistoryHandle, State, StateHistory, Transition, TransitionTable};
pub use engine::{Channel, DispatchError, Engine, SharedEngine, WeakEngine};
