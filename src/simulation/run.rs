//! The pull-based stepping iterator.
//!
//! A [`SimulationRun`] is a pure function of (graph, word): it borrows
//! the graph for its whole lifetime, which statically rules out a graph
//! mutation interleaving with a partially-stepped run. An external
//! scheduler (an animation timer, a REPL loop, a test) advances it one
//! [`Step`] at a time; dropping it mid-word discards the run with no
//! side effects.

use super::closure::epsilon_closure;
use super::step::{Configuration, Outcome, Step, Trace};
use super::SimulationError;
use crate::automaton::AutomatonClass;
use crate::graph::{Graph, StateId};
use crate::validation::validate;

/// An in-flight simulation over a borrowed graph.
pub struct SimulationRun<'g> {
    graph: &'g Graph,
    class: AutomatonClass,
    word: Vec<char>,
    /// Index of the next symbol to consume
    position: usize,
    current: Configuration,
    /// Moore emits the initial state's output before any input
    bootstrap_pending: bool,
    outcome: Option<Outcome>,
}

impl<'g> SimulationRun<'g> {
    /// Set up a run.
    ///
    /// Fails with [`SimulationError::NoInitialState`] when the graph has
    /// no initial state, and with [`SimulationError::InvalidAutomaton`]
    /// when the class is DFA and the graph fails validation; an invalid
    /// DFA never starts stepping.
    pub fn new(
        graph: &'g Graph,
        class: AutomatonClass,
        word: &str,
    ) -> Result<Self, SimulationError> {
        if class.requires_determinism() {
            validate(graph, class)?;
        }
        let initial = graph
            .initial_state()
            .ok_or(SimulationError::NoInitialState)?;
        let current = match class {
            AutomatonClass::NfaEpsilon => epsilon_closure(graph, [initial]),
            AutomatonClass::Nfa => Configuration::from_states([initial]),
            _ => Configuration::single(initial),
        };
        Ok(Self {
            graph,
            class,
            word: word.chars().collect(),
            position: 0,
            current,
            bootstrap_pending: class == AutomatonClass::Moore,
            outcome: None,
        })
    }

    /// The configuration the run currently occupies
    pub fn current(&self) -> &Configuration {
        &self.current
    }

    /// The terminal outcome, once the run has ended
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Check if the run has reached a terminal outcome
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Drive the run to completion and collect the full trace
    pub fn finish(mut self) -> Trace {
        let mut steps = Vec::with_capacity(self.word.len());
        for step in &mut self {
            steps.push(step);
        }
        let outcome = self
            .outcome
            .take()
            .unwrap_or(Outcome::Completed);
        Trace {
            class: self.class,
            word: self.word.iter().collect(),
            steps,
            outcome,
        }
    }

    /// Step a single-state class: find the first applicable transition
    /// out of the current state (unique for a validated DFA).
    fn step_single(&self, state: StateId, symbol: char) -> Option<(StateId, String)> {
        let (_, transition) = self
            .graph
            .transitions_from(state)
            .find(|(_, t)| t.accepts(symbol))?;
        let output = match self.class {
            AutomatonClass::Mealy => transition.output_symbol.clone(),
            AutomatonClass::Moore => self
                .graph
                .state(transition.destination)
                .map(|s| s.output_symbol.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };
        Some((transition.destination, output))
    }

    /// Step a set-valued class: union of destinations over every
    /// applicable transition, side output accumulated in encounter
    /// order. Returns the raw successor set, not yet ε-closed.
    fn step_set(&self, symbol: char) -> (Vec<StateId>, String) {
        let mut raw_next = Vec::new();
        let mut output = String::new();
        for &state in self.current.states() {
            for (_, transition) in self.graph.transitions_from(state) {
                if transition.accepts(symbol) {
                    raw_next.push(transition.destination);
                    output.push_str(&transition.output_symbol);
                }
            }
        }
        (raw_next, output)
    }

    /// The verdict once the word is exhausted
    fn final_outcome(&self) -> Outcome {
        if !self.class.is_acceptor() {
            Outcome::Completed
        } else if self.current.any_accepting(self.graph) {
            Outcome::Accepted
        } else {
            Outcome::Rejected
        }
    }
}

impl Iterator for SimulationRun<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.outcome.is_some() {
            return None;
        }

        if self.bootstrap_pending {
            self.bootstrap_pending = false;
            let output = self
                .current
                .as_single()
                .and_then(|id| self.graph.state(id))
                .map(|s| s.output_symbol.clone())
                .unwrap_or_default();
            return Some(Step {
                index: 0,
                symbol: None,
                before: self.current.clone(),
                after: self.current.clone(),
                output,
            });
        }

        let Some(&symbol) = self.word.get(self.position) else {
            self.outcome = Some(self.final_outcome());
            return None;
        };

        let before = self.current.clone();
        let (after, output) = match self.class {
            AutomatonClass::Dfa | AutomatonClass::Mealy | AutomatonClass::Moore => {
                // Single-state classes: a validated DFA has at most one
                // applicable transition; Mealy/Moore take the first.
                let state = before.as_single().expect("single-state configuration");
                match self.step_single(state, symbol) {
                    Some((destination, output)) => (Configuration::single(destination), output),
                    None => {
                        self.outcome = Some(Outcome::Stuck { symbol, at: before });
                        return None;
                    }
                }
            }
            AutomatonClass::Nfa | AutomatonClass::NfaEpsilon => {
                let (raw_next, output) = self.step_set(symbol);
                if raw_next.is_empty() {
                    self.outcome = Some(Outcome::Stuck { symbol, at: before });
                    return None;
                }
                let after = if self.class == AutomatonClass::NfaEpsilon {
                    epsilon_closure(self.graph, raw_next)
                } else {
                    Configuration::from_states(raw_next)
                };
                (after, output)
            }
        };

        // The Moore bootstrap step holds index 0; consumed symbols
        // follow from 1. Every other class indexes symbols from 0.
        let index = if self.class == AutomatonClass::Moore {
            self.position + 1
        } else {
            self.position
        };
        self.position += 1;
        self.current = after.clone();
        Some(Step {
            index,
            symbol: Some(symbol),
            before,
            after,
            output,
        })
    }
}
