//! Build errors for engine construction.

use thiserror::Error;

/// Errors that can occur when building an engine through
/// [`EngineBuilder`](crate::EngineBuilder) or a
/// [`MachineDefinition`](crate::MachineDefinition).
///
/// [`Engine::new`](crate::Engine::new) itself never fails.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Conflicting transitions from {from} on {event}: '{first}' shadows '{second}'")]
    ConflictingTransitions {
        from: String,
        event: String,
        first: String,
        second: String,
    },

    #[error("Invalid machine definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),
}
