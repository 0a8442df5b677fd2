//! Serializable machine definitions.
//!
//! Lets embedding applications keep their transition tables as data
//! (for example in a JSON settings file) and turn them into engines.

use crate::builder::error::BuildError;
use crate::builder::machine::EngineBuilder;
use crate::core::{Event, State, Transition};
use crate::engine::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Data description of a machine: initial state plus transition list.
///
/// # Example
///
/// ```rust
/// use graphfsm::MachineDefinition;
/// use serde::Deserialize;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Deserialize)]
/// enum Light { Red, Green, Yellow }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Deserialize)]
/// enum Signal { Timer }
///
/// let definition: MachineDefinition<Light, Signal> = MachineDefinition::from_json(r#"{
///     "initial": "Red",
///     "transitions": [
///         { "from": "Red", "event": "Timer", "to": "Green" },
///         { "from": "Green", "event": "Timer", "to": "Yellow" },
///         { "from": "Yellow", "event": "Timer", "to": "Red" }
///     ]
/// }"#).unwrap();
///
/// let mut engine = definition.build().unwrap();
/// engine.handle(Signal::Timer);
/// assert_eq!(engine.current_state(), &Light::Green);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition<S, E> {
    /// State the engine starts in
    pub initial: S,

    /// Transition table, in priority order
    #[serde(default = "Vec::new")]
    pub transitions: Vec<Transition<S, E>>,

    /// Reject tables with several transitions for one `(from, event)` pair
    #[serde(default)]
    pub reject_conflicts: bool,
}

impl<S: State, E: Event> MachineDefinition<S, E> {
    /// Create a lenient definition.
    pub fn new(initial: S, transitions: Vec<Transition<S, E>>) -> Self {
        Self {
            initial,
            transitions,
            reject_conflicts: false,
        }
    }

    /// Parse a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, BuildError>
    where
        S: DeserializeOwned,
        E: DeserializeOwned,
    {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the definition as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, BuildError>
    where
        S: Serialize,
        E: Serialize,
    {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Convert into an [`EngineBuilder`] with the same settings.
    pub fn into_builder(self) -> EngineBuilder<S, E> {
        let builder = EngineBuilder::new()
            .initial(self.initial)
            .transitions(self.transitions);
        if self.reject_conflicts {
            builder.reject_conflicts()
        } else {
            builder
        }
    }

    /// Build the engine this definition describes.
    pub fn build(self) -> Result<Engine<S, E>, BuildError> {
        self.into_builder().build()
    }
}
