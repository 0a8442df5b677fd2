//! Dispatch errors.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by [`SharedEngine`](crate::SharedEngine) when it is
/// called back into from one of its own observers.
///
/// A plain [`Engine`](crate::Engine) never produces these: `handle` takes
/// `&mut self`, so an observer cannot reach the engine that is notifying it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("Engine {engine} is dispatching on this thread; re-entrant {operation} rejected")]
    Reentrant {
        engine: Uuid,
        operation: &'static str,
    },
}
