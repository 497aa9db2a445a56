//! Boundary records exchanged with UI and serialization collaborators.
//!
//! These are plain data: everything the engine needs plus the opaque
//! layout fields (`x`, `y`, offsets) that the rendering layer owns and
//! the project formats round-trip untouched.

use super::transition::EPSILON;
use super::{Graph, State, Transition};

/// Flat description of one state, keyed by name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StateRecord {
    /// Unique state name
    pub name: String,
    /// Canvas x coordinate (opaque passthrough)
    #[cfg_attr(feature = "serialization", serde(default))]
    pub x: f64,
    /// Canvas y coordinate (opaque passthrough)
    #[cfg_attr(feature = "serialization", serde(default))]
    pub y: f64,
    /// Whether this is the initial state
    #[cfg_attr(feature = "serialization", serde(default))]
    pub initial: bool,
    /// Whether this state accepts
    #[cfg_attr(feature = "serialization", serde(default))]
    pub accepting: bool,
    /// Moore output symbol
    #[cfg_attr(feature = "serialization", serde(default))]
    pub output_symbol: String,
}

/// Flat description of one transition, endpoints referenced by state name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TransitionRecord {
    /// Origin state name
    pub origin: String,
    /// Destination state name
    pub destination: String,
    /// Input symbols; empty means ε
    #[cfg_attr(feature = "serialization", serde(default))]
    pub input_symbols: Vec<String>,
    /// Mealy output symbol
    #[cfg_attr(feature = "serialization", serde(default))]
    pub output_symbol: String,
    /// Visual x offset (opaque passthrough)
    #[cfg_attr(feature = "serialization", serde(default))]
    pub offset_x: f64,
    /// Visual y offset (opaque passthrough)
    #[cfg_attr(feature = "serialization", serde(default))]
    pub offset_y: f64,
}

impl StateRecord {
    /// Record with just a name, everything else defaulted
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            initial: false,
            accepting: false,
            output_symbol: String::new(),
        }
    }

    pub(crate) fn from_state(state: &State) -> Self {
        Self {
            name: state.name().to_string(),
            x: state.pos.0,
            y: state.pos.1,
            initial: state.is_initial,
            accepting: state.is_accepting,
            output_symbol: state.output_symbol.clone(),
        }
    }
}

impl TransitionRecord {
    /// Record for a transition `origin --symbols--> destination`
    pub fn new<S: Into<String>>(
        origin: impl Into<String>,
        destination: impl Into<String>,
        input_symbols: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            input_symbols: input_symbols.into_iter().map(Into::into).collect(),
            output_symbol: String::new(),
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Record for a spontaneous (ε) transition
    pub fn epsilon(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(origin, destination, [EPSILON])
    }

    /// Attach a Mealy output symbol
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output_symbol = output.into();
        self
    }

    pub(crate) fn from_transition(graph: &Graph, transition: &Transition) -> Option<Self> {
        let origin = graph.state(transition.origin)?.name().to_string();
        let destination = graph.state(transition.destination)?.name().to_string();
        Some(Self {
            origin,
            destination,
            input_symbols: transition.input_symbols().to_vec(),
            output_symbol: transition.output_symbol.clone(),
            offset_x: transition.offset.0,
            offset_y: transition.offset.1,
        })
    }
}
