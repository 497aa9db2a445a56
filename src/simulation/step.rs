//! Configurations, step records, and traces.

use crate::automaton::AutomatonClass;
use crate::graph::{Graph, StateId};
use smallvec::SmallVec;

/// The set of states a simulation occupies between two steps.
///
/// Deterministic and transducer classes always hold exactly one state;
/// the nondeterministic classes hold a set. States are kept sorted by
/// id and deduplicated, so configurations compare structurally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Configuration(SmallVec<[StateId; 4]>);

impl Configuration {
    /// Configuration holding a single state
    pub fn single(state: StateId) -> Self {
        Self(SmallVec::from_slice(&[state]))
    }

    /// Configuration from an arbitrary collection of states
    pub fn from_states(states: impl IntoIterator<Item = StateId>) -> Self {
        let mut states: SmallVec<[StateId; 4]> = states.into_iter().collect();
        states.sort_unstable();
        states.dedup();
        Self(states)
    }

    /// The states, sorted by id
    pub fn states(&self) -> &[StateId] {
        &self.0
    }

    /// Check membership
    pub fn contains(&self, state: StateId) -> bool {
        self.0.binary_search(&state).is_ok()
    }

    /// Check if no states are occupied
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of occupied states
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The only state, when the configuration is a singleton
    pub fn as_single(&self) -> Option<StateId> {
        match self.0.as_slice() {
            [state] => Some(*state),
            _ => None,
        }
    }

    /// Check if any occupied state is accepting
    pub fn any_accepting(&self, graph: &Graph) -> bool {
        self.0
            .iter()
            .any(|id| graph.state(*id).is_some_and(|s| s.is_accepting))
    }

    /// Render as state names, e.g. `[q0, q1]`
    pub fn describe(&self, graph: &Graph) -> String {
        let names: Vec<String> = self.0.iter().map(|id| graph.state_name(*id)).collect();
        format!("[{}]", names.join(", "))
    }
}

/// One record of the trace: what a single step consumed and produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Position of this step in the trace
    pub index: usize,
    /// The consumed input symbol. `None` only for the Moore bootstrap
    /// step, which emits the initial state's output before any input.
    pub symbol: Option<char>,
    /// Configuration before the step
    pub before: Configuration,
    /// Configuration after the step
    pub after: Configuration,
    /// Output emitted by this step (possibly empty)
    pub output: String,
}

/// How a finished run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Acceptor run consumed the word and ended in an accepting state
    Accepted,
    /// Acceptor run consumed the word without reaching acceptance
    Rejected,
    /// No applicable transition for the next symbol. A valid terminal
    /// outcome (reject for acceptors), not a system error.
    Stuck {
        /// The symbol no transition consumed
        symbol: char,
        /// The configuration the run was stuck in
        at: Configuration,
    },
    /// Transducer run consumed the whole word (Mealy/Moore have no
    /// accept/reject verdict)
    Completed,
}

impl Outcome {
    /// Check if the run ended in acceptance
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    /// Check if the run ended stuck mid-word
    pub fn is_stuck(&self) -> bool {
        matches!(self, Outcome::Stuck { .. })
    }

    /// Render a user-facing verdict line
    pub fn describe(&self, graph: &Graph) -> String {
        match self {
            Outcome::Accepted => "accepted".to_string(),
            Outcome::Rejected => "rejected".to_string(),
            Outcome::Stuck { symbol, at } => {
                format!("rejected (stuck on '{}' at {})", symbol, at.describe(graph))
            }
            Outcome::Completed => "completed".to_string(),
        }
    }
}

/// The full ordered record of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Class the run was stepped under
    pub class: AutomatonClass,
    /// The input word
    pub word: String,
    /// One record per step, in order
    pub steps: Vec<Step>,
    /// Terminal outcome
    pub outcome: Outcome,
}

impl Trace {
    /// The concatenated output of every step, in order
    pub fn output(&self) -> String {
        self.steps.iter().map(|s| s.output.as_str()).collect()
    }

    /// Per-step output emissions, in order
    pub fn emissions(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.output.as_str())
    }
}
