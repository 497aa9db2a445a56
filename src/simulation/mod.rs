//! Word simulation under the five stepping semantics.
//!
//! One run takes a graph, a class, and a word, and produces an ordered
//! [`Trace`] of [`Step`] records ending in an [`Outcome`]. Stepping is
//! pull-based: [`SimulationRun`] is an [`Iterator`] the caller advances
//! at whatever pace it likes, and the run borrows the graph so no edit
//! can slip in underneath it.
//!
//! # Example
//!
//! ```rust
//! use libautomata::automaton::AutomatonClass;
//! use libautomata::graph::Graph;
//! use libautomata::simulation::{simulate, Outcome};
//!
//! let mut graph = Graph::new();
//! let q0 = graph.add_state(None).unwrap(); // becomes initial
//! let q1 = graph.add_state(None).unwrap();
//! graph.toggle_accepting(q1).unwrap();
//! graph.add_transition(q0, q1, vec!["a".into()], String::new()).unwrap();
//!
//! let trace = simulate(&graph, AutomatonClass::Dfa, "a").unwrap();
//! assert_eq!(trace.outcome, Outcome::Accepted);
//! ```

mod closure;
mod run;
mod step;

pub use closure::epsilon_closure;
pub use run::SimulationRun;
pub use step::{Configuration, Outcome, Step, Trace};

use crate::automaton::AutomatonClass;
use crate::graph::Graph;
use crate::validation::ValidationError;
use thiserror::Error;

/// Why a run could not start. Note that getting stuck mid-word is not
/// an error; it is the [`Outcome::Stuck`] terminal outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The graph has no initial state to start from.
    #[error("No initial state to start the simulation from")]
    NoInitialState,

    /// The graph violates the structural rules of the chosen class.
    #[error("Automaton is not valid for this class: {0}")]
    InvalidAutomaton(#[from] ValidationError),
}

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Run a word to completion and collect the full trace.
///
/// Convenience over [`SimulationRun`] for callers that do not need
/// step-at-a-time pacing.
pub fn simulate(graph: &Graph, class: AutomatonClass, word: &str) -> Result<Trace> {
    Ok(SimulationRun::new(graph, class, word)?.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EPSILON;

    #[test]
    fn test_simulate_requires_initial_state() {
        let graph = Graph::new();
        assert_eq!(
            simulate(&graph, AutomatonClass::Dfa, "a"),
            Err(SimulationError::NoInitialState)
        );
    }

    #[test]
    fn test_simulate_rejects_invalid_dfa() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        graph
            .add_transition(q0, q0, vec![EPSILON.into()], String::new())
            .unwrap();
        assert!(matches!(
            simulate(&graph, AutomatonClass::Dfa, "a"),
            Err(SimulationError::InvalidAutomaton(_))
        ));
        // The same graph is fine as NFA-ε.
        assert!(simulate(&graph, AutomatonClass::NfaEpsilon, "").is_ok());
    }

    #[test]
    fn test_dfa_accepts_even_number_of_as() {
        let mut graph = Graph::new();
        let even = graph.add_state(Some("even".into())).unwrap();
        let odd = graph.add_state(Some("odd".into())).unwrap();
        graph.toggle_accepting(even).unwrap();
        graph
            .add_transition(even, odd, vec!["a".into()], String::new())
            .unwrap();
        graph
            .add_transition(odd, even, vec!["a".into()], String::new())
            .unwrap();

        let trace = simulate(&graph, AutomatonClass::Dfa, "aaaa").unwrap();
        assert_eq!(trace.outcome, Outcome::Accepted);
        assert_eq!(trace.steps.len(), 4);

        let trace = simulate(&graph, AutomatonClass::Dfa, "aaa").unwrap();
        assert_eq!(trace.outcome, Outcome::Rejected);
    }

    #[test]
    fn test_dfa_stuck_on_unknown_symbol() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph.toggle_accepting(q1).unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();

        let trace = simulate(&graph, AutomatonClass::Dfa, "ab").unwrap();
        assert_eq!(trace.steps.len(), 1);
        match trace.outcome {
            Outcome::Stuck { symbol, ref at } => {
                assert_eq!(symbol, 'b');
                assert_eq!(at.as_single(), Some(q1));
            }
            other => panic!("expected stuck outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_nfa_tracks_state_sets() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        let q2 = graph.add_state(None).unwrap();
        graph.toggle_accepting(q2).unwrap();
        graph
            .add_transition(q0, q0, vec!["a".into()], String::new())
            .unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();
        graph
            .add_transition(q1, q2, vec!["b".into()], String::new())
            .unwrap();

        let trace = simulate(&graph, AutomatonClass::Nfa, "ab").unwrap();
        assert_eq!(trace.steps[0].after.states(), &[q0, q1]);
        assert_eq!(trace.steps[1].after.states(), &[q2]);
        assert_eq!(trace.outcome, Outcome::Accepted);
    }

    #[test]
    fn test_nfa_epsilon_closes_before_and_after_steps() {
        // q0 -ε-> q1 -a-> q2 -ε-> q3(accepting)
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        let q2 = graph.add_state(None).unwrap();
        let q3 = graph.add_state(None).unwrap();
        graph.toggle_accepting(q3).unwrap();
        graph
            .add_transition(q0, q1, vec![EPSILON.into()], String::new())
            .unwrap();
        graph
            .add_transition(q1, q2, vec!["a".into()], String::new())
            .unwrap();
        graph
            .add_transition(q2, q3, vec![EPSILON.into()], String::new())
            .unwrap();

        let trace = simulate(&graph, AutomatonClass::NfaEpsilon, "a").unwrap();
        assert_eq!(trace.steps[0].before.states(), &[q0, q1]);
        assert_eq!(trace.steps[0].after.states(), &[q2, q3]);
        assert_eq!(trace.outcome, Outcome::Accepted);
    }

    #[test]
    fn test_nfa_epsilon_stuck_when_no_branch_moves() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph
            .add_transition(q0, q1, vec![EPSILON.into()], String::new())
            .unwrap();

        let trace = simulate(&graph, AutomatonClass::NfaEpsilon, "x").unwrap();
        assert!(trace.outcome.is_stuck());
        assert!(trace.steps.is_empty());
    }

    #[test]
    fn test_mealy_emits_per_transition() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], "1".into())
            .unwrap();
        graph
            .add_transition(q1, q0, vec!["b".into()], "0".into())
            .unwrap();

        let trace = simulate(&graph, AutomatonClass::Mealy, "abab").unwrap();
        assert_eq!(trace.outcome, Outcome::Completed);
        assert_eq!(trace.output(), "1010");
        assert_eq!(trace.steps.len(), 4);
    }

    #[test]
    fn test_moore_emits_initial_output_first() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph.set_state_output(q0, "x".into()).unwrap();
        graph.set_state_output(q1, "y".into()).unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();
        graph
            .add_transition(q1, q0, vec!["a".into()], String::new())
            .unwrap();

        let trace = simulate(&graph, AutomatonClass::Moore, "aa").unwrap();
        // Bootstrap emission plus one per consumed symbol.
        assert_eq!(trace.steps.len(), 3);
        assert_eq!(trace.steps[0].symbol, None);
        assert_eq!(trace.steps[0].index, 0);
        assert_eq!(trace.steps[1].index, 1);
        assert_eq!(trace.output(), "xyx");
    }

    #[test]
    fn test_moore_empty_word_still_bootstraps() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        graph.set_state_output(q0, "z".into()).unwrap();

        let trace = simulate(&graph, AutomatonClass::Moore, "").unwrap();
        assert_eq!(trace.steps.len(), 1);
        assert_eq!(trace.output(), "z");
        assert_eq!(trace.outcome, Outcome::Completed);
    }

    #[test]
    fn test_step_at_a_time_pacing() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph.toggle_accepting(q1).unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();

        let mut run = SimulationRun::new(&graph, AutomatonClass::Dfa, "a").unwrap();
        assert!(!run.is_finished());
        let step = run.next().unwrap();
        assert_eq!(step.symbol, Some('a'));
        assert_eq!(run.current().as_single(), Some(q1));
        assert!(run.next().is_none());
        assert_eq!(run.outcome(), Some(&Outcome::Accepted));
    }

    #[test]
    fn test_empty_word_verdict_on_initial_closure() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph.toggle_accepting(q1).unwrap();
        graph
            .add_transition(q0, q1, vec![EPSILON.into()], String::new())
            .unwrap();

        // ε-closure of the initial state already reaches acceptance.
        let trace = simulate(&graph, AutomatonClass::NfaEpsilon, "").unwrap();
        assert_eq!(trace.outcome, Outcome::Accepted);
        // Plain NFA does not follow the ε edge (and is invalid anyway).
        assert!(simulate(&graph, AutomatonClass::Nfa, "").is_ok());
    }
}
