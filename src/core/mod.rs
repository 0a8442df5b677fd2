//! Core state machine types.
//!
//! This module contains the data side of the machine:
//! - State and event bounds via the `State` and `Event` traits
//! - The `Transition` rule and the immutable `TransitionTable`
//! - Timestamped history of fired transitions
//!
//! Nothing here holds a current state or invokes callbacks; that lives
//! in [`crate::engine`].

mod history;
mod state;
mod table;
mod transition;

pub use history::{HistoryHandle, StateHistory, TransitionRecord};
pub use state::{Event, State};
pub use table::TransitionTable;
pub use transition::Transition;
