//! Bounds for state machine states and events.
//!
//! The engine treats states and events as opaque values. All it needs is
//! to compare them, use them as map keys, clone them into transition records
//! and print them in diagnostics.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// Implemented automatically for every type that is `Clone + Eq + Hash + Debug`,
/// so enums, strings, integers and structured values all qualify without
/// any boilerplate.
///
/// # Example
///
/// ```rust
/// use graphfsm::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// fn assert_state<S: State>(_: &S) {}
///
/// assert_state(&Door::Open);
/// assert_state(&"idle".to_string());
/// assert_state(&42u32);
/// ```
pub trait State: Clone + Eq + Hash + Debug {}

impl<T> State for T where T: Clone + Eq + Hash + Debug {}

/// Trait for stimuli that may move a state machine between states.
///
/// Same bounds as [`State`], kept as a separate trait so signatures read
/// `Engine<S: State, E: Event>`.
pub trait Event: Clone + Eq + Hash + Debug {}

impl<T> Event for T where T: Clone + Eq + Hash + Debug {}
