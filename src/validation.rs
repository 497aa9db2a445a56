//! Per-class structural validation.
//!
//! The deterministic class is validated before every run; an invalid
//! DFA must never start stepping. Validation order is deterministic:
//! states in insertion order, each state's outgoing transitions in
//! insertion order, symbols in label order. The first violation found
//! is the one reported.

use crate::automaton::AutomatonClass;
use crate::graph::{Graph, EPSILON};
use thiserror::Error;

/// A structural rule violation, carrying the offending state and symbol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The class forbids ε and the state has a spontaneous transition.
    #[error("State '{state}' has an ε-transition, which this class forbids")]
    EpsilonTransition {
        /// Name of the offending state
        state: String,
    },

    /// Two outgoing transitions of one state share an input symbol.
    #[error("Nondeterminism at state '{state}': more than one transition consumes '{symbol}'")]
    Nondeterministic {
        /// Name of the offending state
        state: String,
        /// The symbol claimed by more than one outgoing transition
        symbol: String,
    },
}

/// Check the graph's well-formedness under the given class.
///
/// - `Dfa`: no ε anywhere, and for every state the outgoing
///   input-symbol sets must be pairwise disjoint.
/// - `Nfa`: no ε anywhere; nondeterminism is fine.
/// - `NfaEpsilon`, `Mealy`, `Moore`: nothing beyond the data-model
///   invariants, which the Graph Store already enforces.
pub fn validate(graph: &Graph, class: AutomatonClass) -> Result<(), ValidationError> {
    match class {
        AutomatonClass::Dfa => {
            for (id, state) in graph.states() {
                let mut seen: Vec<&str> = Vec::new();
                for (_, transition) in graph.transitions_from(id) {
                    if transition.is_epsilon() {
                        return Err(ValidationError::EpsilonTransition {
                            state: state.name().to_string(),
                        });
                    }
                    for symbol in transition.input_symbols() {
                        if seen.contains(&symbol.as_str()) {
                            return Err(ValidationError::Nondeterministic {
                                state: state.name().to_string(),
                                symbol: symbol.clone(),
                            });
                        }
                        seen.push(symbol);
                    }
                }
            }
            Ok(())
        }
        AutomatonClass::Nfa => {
            for (_, transition) in graph.transitions() {
                if transition.is_epsilon() {
                    let state = graph.state_name(transition.origin);
                    return Err(ValidationError::EpsilonTransition { state });
                }
            }
            Ok(())
        }
        AutomatonClass::NfaEpsilon | AutomatonClass::Mealy | AutomatonClass::Moore => Ok(()),
    }
}

/// Check a prospective transition label against the class and the rest
/// of the graph, before it is applied.
///
/// This is the edit-time rule checklist: ε is rejected for DFA/NFA, and
/// for a DFA a symbol already consumed by a *different* transition out
/// of the same origin is rejected. `editing` names the transition being
/// relabeled so its own current symbols are not held against it; pass
/// `None` when creating a new transition.
pub fn check_label(
    graph: &Graph,
    class: AutomatonClass,
    origin: crate::graph::StateId,
    symbols: &[String],
    editing: Option<crate::graph::TransitionId>,
) -> Result<(), ValidationError> {
    if !class.allows_epsilon() && symbols.iter().any(|s| s == EPSILON) {
        return Err(ValidationError::EpsilonTransition {
            state: graph.state_name(origin),
        });
    }
    if class.requires_determinism() {
        for symbol in symbols {
            for (tid, other) in graph.transitions_from(origin) {
                if Some(tid) == editing {
                    continue;
                }
                if other.input_symbols().iter().any(|s| s == symbol) {
                    return Err(ValidationError::Nondeterministic {
                        state: graph.state_name(origin),
                        symbol: symbol.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
