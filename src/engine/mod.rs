//! The transition engine and its observers.
//!
//! - [`Engine`]: single-owner machine; `handle` runs lookup, observer
//!   notification and the state update to completion before returning
//! - [`ObserverRegistry`]: the five notification channels
//! - [`SharedEngine`]: the same engine behind a mutex for cross-thread use,
//!   with [`WeakEngine`] for observers that call back into it

mod error;
mod machine;
mod observers;
mod shared;

pub use error::DispatchError;
pub use machine::Engine;
pub use observers::{Channel, Observer, ObserverRegistry};
pub use shared::{SharedEngine, WeakEngine};
