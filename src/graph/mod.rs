//! Graph Store: owns the states and transitions of one automaton.
//!
//! Storage is arena-style: records live in insertion-ordered vectors and
//! are addressed through stable typed ids ([`StateId`], [`TransitionId`]).
//! Ids are handed out by monotonic counters and never reused, so a
//! command can capture an id, see the item deleted, and later restore it
//! under the same id at the same position. Iteration order is insertion
//! order everywhere;
//! the validator relies on this for deterministic tie-breaking.

mod record;
mod state;
pub mod transition;

pub use record::{StateRecord, TransitionRecord};
pub use state::State;
pub use transition::{normalize_symbols, parse_label, Transition, EPSILON};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Stable handle to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Stable handle to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u32);

impl std::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Errors from Graph Store mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A state with this name already exists.
    #[error("A state named '{0}' already exists")]
    DuplicateName(String),

    /// The referenced state is not in the graph.
    #[error("State {0} is not in the graph")]
    StateNotFound(StateId),

    /// The referenced transition is not in the graph.
    #[error("Transition {0} is not in the graph")]
    TransitionNotFound(TransitionId),

    /// ε cannot share a transition with concrete symbols.
    #[error("ε cannot be combined with other symbols on one transition")]
    EpsilonMixed,
}

/// A specialized `Result` type for Graph Store operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// A removed transition, captured with enough context to reinstate it
/// under its original id at its original position.
#[derive(Debug, Clone)]
pub struct RemovedTransition {
    /// The id the transition had (and will get back on restore)
    pub id: TransitionId,
    /// Position in insertion order at the moment of removal
    pub index: usize,
    /// The removed transition record
    pub transition: Transition,
}

/// Everything removed by a cascading state deletion, captured so the
/// deleting command can restore the full cascade on undo.
#[derive(Debug, Clone)]
pub struct RemovedState {
    /// The id the state had (and will get back on restore)
    pub id: StateId,
    /// Position in insertion order at the moment of removal
    pub index: usize,
    /// The removed state record
    pub state: State,
    /// Every transition that had the state as origin or destination,
    /// in ascending position order
    pub transitions: Vec<RemovedTransition>,
}

/// The graph of one automaton: states, transitions, and the name index.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    states: Vec<(StateId, State)>,
    transitions: Vec<(TransitionId, Transition)>,
    name_index: FxHashMap<String, StateId>,
    next_state_id: u32,
    next_transition_id: u32,
    name_counter: u64,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of transitions
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Check if the graph has no states
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Add a state.
    ///
    /// With `name: None` a fresh `q{N}` name is synthesized from a
    /// counter that only ever increases, so deleted names are not
    /// recycled. An explicit name must be unused. If no state of the
    /// graph is currently initial, the new state becomes initial.
    pub fn add_state(&mut self, name: Option<String>) -> Result<StateId> {
        let name = match name {
            Some(name) => {
                if self.name_index.contains_key(&name) {
                    return Err(GraphError::DuplicateName(name));
                }
                name
            }
            None => loop {
                let candidate = format!("q{}", self.name_counter);
                self.name_counter += 1;
                if !self.name_index.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        let mut state = State::new(name.clone(), (0.0, 0.0));
        if self.initial_state().is_none() {
            state.is_initial = true;
        }

        let id = StateId(self.next_state_id);
        self.next_state_id += 1;
        self.name_index.insert(name, id);
        self.states.push((id, state));
        Ok(id)
    }

    /// Remove a state and, atomically, every transition incident to it.
    ///
    /// Returns the full cascade, positions included, so the caller can
    /// restore it on undo.
    pub fn remove_state(&mut self, id: StateId) -> Result<RemovedState> {
        let index = self
            .states
            .iter()
            .position(|(sid, _)| *sid == id)
            .ok_or(GraphError::StateNotFound(id))?;

        let removed_transitions: Vec<RemovedTransition> = self
            .transitions
            .iter()
            .enumerate()
            .filter(|(_, (_, t))| t.origin == id || t.destination == id)
            .map(|(position, (tid, t))| RemovedTransition {
                id: *tid,
                index: position,
                transition: t.clone(),
            })
            .collect();
        self.transitions
            .retain(|(_, t)| t.origin != id && t.destination != id);

        let (_, state) = self.states.remove(index);
        self.name_index.remove(state.name());
        Ok(RemovedState {
            id,
            index,
            state,
            transitions: removed_transitions,
        })
    }

    /// Reinstate a previously removed state under its original id, at
    /// its original position in insertion order.
    ///
    /// Undo path only; fails if the id or name is meanwhile taken. The
    /// cascaded transitions are not restored here — the caller puts them
    /// back once every endpoint state is present again.
    pub fn restore_state(&mut self, removed: &RemovedState) -> Result<()> {
        if self.name_index.contains_key(removed.state.name()) {
            return Err(GraphError::DuplicateName(removed.state.name().to_string()));
        }
        debug_assert!(self.states.iter().all(|(sid, _)| *sid != removed.id));
        self.name_index
            .insert(removed.state.name().to_string(), removed.id);
        let index = removed.index.min(self.states.len());
        self.states.insert(index, (removed.id, removed.state.clone()));
        Ok(())
    }

    /// Add a transition. Symbols are normalized (empty ⇒ ε); no
    /// uniqueness or determinism check happens here — that is the
    /// validator's job.
    pub fn add_transition(
        &mut self,
        origin: StateId,
        destination: StateId,
        symbols: Vec<String>,
        output_symbol: String,
    ) -> Result<TransitionId> {
        if self.state(origin).is_none() {
            return Err(GraphError::StateNotFound(origin));
        }
        if self.state(destination).is_none() {
            return Err(GraphError::StateNotFound(destination));
        }
        let input_symbols = normalize_symbols(symbols)?;
        let id = TransitionId(self.next_transition_id);
        self.next_transition_id += 1;
        self.transitions.push((
            id,
            Transition {
                origin,
                destination,
                input_symbols,
                output_symbol,
                offset: (0.0, 0.0),
            },
        ));
        Ok(id)
    }

    /// Remove a transition, returning it (position included) for undo
    /// capture
    pub fn remove_transition(&mut self, id: TransitionId) -> Result<RemovedTransition> {
        let index = self
            .transitions
            .iter()
            .position(|(tid, _)| *tid == id)
            .ok_or(GraphError::TransitionNotFound(id))?;
        let (_, transition) = self.transitions.remove(index);
        Ok(RemovedTransition {
            id,
            index,
            transition,
        })
    }

    /// Reinstate a previously removed transition under its original id,
    /// at its original position in insertion order.
    ///
    /// Undo path only; both endpoints must already be back in the graph.
    pub fn restore_transition(&mut self, removed: &RemovedTransition) -> Result<()> {
        if self.state(removed.transition.origin).is_none() {
            return Err(GraphError::StateNotFound(removed.transition.origin));
        }
        if self.state(removed.transition.destination).is_none() {
            return Err(GraphError::StateNotFound(removed.transition.destination));
        }
        debug_assert!(self.transitions.iter().all(|(tid, _)| *tid != removed.id));
        let index = removed.index.min(self.transitions.len());
        self.transitions
            .insert(index, (removed.id, removed.transition.clone()));
        Ok(())
    }

    /// Rename a state. The name index is updated; transitions are
    /// untouched since they reference the state by id.
    ///
    /// Returns the previous name.
    pub fn rename_state(&mut self, id: StateId, new_name: String) -> Result<String> {
        if let Some(&existing) = self.name_index.get(&new_name) {
            if existing != id {
                return Err(GraphError::DuplicateName(new_name));
            }
        }
        let state = self
            .states
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
            .ok_or(GraphError::StateNotFound(id))?;
        let old_name = std::mem::replace(&mut state.name, new_name.clone());
        self.name_index.remove(&old_name);
        self.name_index.insert(new_name, id);
        Ok(old_name)
    }

    /// Replace a transition's symbols and output, returning the previous
    /// values for undo capture
    pub fn update_transition(
        &mut self,
        id: TransitionId,
        symbols: Vec<String>,
        output_symbol: String,
    ) -> Result<(Vec<String>, String)> {
        let input_symbols = normalize_symbols(symbols)?;
        let transition = self
            .transition_mut(id)
            .ok_or(GraphError::TransitionNotFound(id))?;
        let old_symbols = std::mem::replace(&mut transition.input_symbols, input_symbols);
        let old_output = std::mem::replace(&mut transition.output_symbol, output_symbol);
        Ok((old_symbols, old_output))
    }

    /// Flip a state's accepting flag, returning the new value
    pub fn toggle_accepting(&mut self, id: StateId) -> Result<bool> {
        let state = self.state_mut(id).ok_or(GraphError::StateNotFound(id))?;
        state.is_accepting = !state.is_accepting;
        Ok(state.is_accepting)
    }

    /// Set a state's Moore output symbol, returning the previous value
    pub fn set_state_output(&mut self, id: StateId, output: String) -> Result<String> {
        let state = self.state_mut(id).ok_or(GraphError::StateNotFound(id))?;
        Ok(std::mem::replace(&mut state.output_symbol, output))
    }

    /// Look up a state by id
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
    }

    pub(crate) fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
    }

    /// Look up a state id by name
    pub fn state_by_name(&self, name: &str) -> Option<StateId> {
        self.name_index.get(name).copied()
    }

    /// The display name of a state, or its id rendered as a fallback
    pub fn state_name(&self, id: StateId) -> String {
        self.state(id)
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Look up a transition by id
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|(tid, _)| *tid == id)
            .map(|(_, t)| t)
    }

    pub(crate) fn transition_mut(&mut self, id: TransitionId) -> Option<&mut Transition> {
        self.transitions
            .iter_mut()
            .find(|(tid, _)| *tid == id)
            .map(|(_, t)| t)
    }

    /// Iterate states in insertion order
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().map(|(id, s)| (*id, s))
    }

    /// Iterate transitions in insertion order
    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions.iter().map(|(id, t)| (*id, t))
    }

    /// Transitions with the given origin, in insertion order
    pub fn transitions_from(&self, origin: StateId) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions()
            .filter(move |(_, t)| t.origin == origin)
    }

    /// Transitions with the given destination, in insertion order
    pub fn transitions_to(&self, destination: StateId) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions()
            .filter(move |(_, t)| t.destination == destination)
    }

    /// The initial state, if any (at most one exists)
    pub fn initial_state(&self) -> Option<StateId> {
        self.states
            .iter()
            .find(|(_, s)| s.is_initial)
            .map(|(id, _)| *id)
    }

    /// Export the graph as flat boundary records
    pub fn export(&self) -> (Vec<StateRecord>, Vec<TransitionRecord>) {
        let states = self
            .states()
            .map(|(_, s)| StateRecord::from_state(s))
            .collect();
        let transitions = self
            .transitions()
            .filter_map(|(_, t)| TransitionRecord::from_transition(self, t))
            .collect();
        (states, transitions)
    }

    /// Build a graph from boundary records.
    ///
    /// Duplicate state names abort with [`GraphError::DuplicateName`].
    /// Only the first record flagged initial becomes initial (the data
    /// model allows at most one). Transitions whose endpoints are
    /// unknown are skipped, matching the original loader. The `q{N}`
    /// name counter resumes past the highest numbered name so later
    /// auto-named states cannot collide.
    pub fn from_records(
        states: Vec<StateRecord>,
        transitions: Vec<TransitionRecord>,
    ) -> Result<Self> {
        let mut graph = Graph::new();
        let mut saw_initial = false;
        for record in states {
            if graph.name_index.contains_key(&record.name) {
                return Err(GraphError::DuplicateName(record.name));
            }
            let id = StateId(graph.next_state_id);
            graph.next_state_id += 1;
            let mut state = State::new(record.name.clone(), (record.x, record.y));
            state.is_initial = record.initial && !saw_initial;
            saw_initial |= state.is_initial;
            state.is_accepting = record.accepting;
            state.output_symbol = record.output_symbol;
            graph.name_index.insert(record.name.clone(), id);
            graph.states.push((id, state));

            if let Some(n) = record
                .name
                .strip_prefix('q')
                .and_then(|n| n.parse::<u64>().ok())
            {
                graph.name_counter = graph.name_counter.max(n + 1);
            }
        }
        for record in transitions {
            let (origin, destination) = match (
                graph.state_by_name(&record.origin),
                graph.state_by_name(&record.destination),
            ) {
                (Some(o), Some(d)) => (o, d),
                _ => continue,
            };
            let id = graph.add_transition(
                origin,
                destination,
                record.input_symbols,
                record.output_symbol,
            )?;
            if let Some(t) = graph.transition_mut(id) {
                t.offset = (record.offset_x, record.offset_y);
            }
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_names_are_never_reused() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let _q1 = graph.add_state(None).unwrap();
        graph.remove_state(q0).unwrap();
        let next = graph.add_state(None).unwrap();
        assert_eq!(graph.state(next).unwrap().name(), "q2");
    }

    #[test]
    fn test_first_state_becomes_initial() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        assert!(graph.state(q0).unwrap().is_initial);
        assert!(!graph.state(q1).unwrap().is_initial);
        assert_eq!(graph.initial_state(), Some(q0));
    }

    #[test]
    fn test_next_state_inherits_initial_after_deletion() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        graph.remove_state(q0).unwrap();
        let q1 = graph.add_state(None).unwrap();
        assert!(graph.state(q1).unwrap().is_initial);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut graph = Graph::new();
        graph.add_state(Some("start".into())).unwrap();
        assert_eq!(
            graph.add_state(Some("start".into())),
            Err(GraphError::DuplicateName("start".into()))
        );
    }

    #[test]
    fn test_remove_state_cascades() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();
        graph
            .add_transition(q1, q1, vec!["b".into()], String::new())
            .unwrap();
        graph
            .add_transition(q1, q0, vec!["c".into()], String::new())
            .unwrap();

        let removed = graph.remove_state(q1).unwrap();
        assert_eq!(removed.transitions.len(), 3);
        assert_eq!(graph.transition_count(), 0);
        assert_eq!(graph.state_count(), 1);
    }

    #[test]
    fn test_cascade_restore_reproduces_graph() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();
        let before = graph.export();

        let removed = graph.remove_state(q1).unwrap();
        graph.restore_state(&removed).unwrap();
        for t in &removed.transitions {
            graph.restore_transition(t).unwrap();
        }
        assert_eq!(graph.export(), before);
    }

    #[test]
    fn test_restore_keeps_insertion_order() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        let q2 = graph.add_state(None).unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();
        let middle = graph
            .add_transition(q1, q1, vec!["b".into()], String::new())
            .unwrap();
        graph
            .add_transition(q2, q0, vec!["c".into()], String::new())
            .unwrap();

        // Removing the middle state and putting it back must not shuffle
        // anything to the end of the iteration order.
        let removed = graph.remove_state(q1).unwrap();
        graph.restore_state(&removed).unwrap();
        for t in &removed.transitions {
            graph.restore_transition(t).unwrap();
        }
        let states: Vec<StateId> = graph.states().map(|(id, _)| id).collect();
        assert_eq!(states, vec![q0, q1, q2]);
        let transitions: Vec<TransitionId> = graph.transitions().map(|(id, _)| id).collect();
        assert_eq!(transitions[1], middle);

        let removed = graph.remove_transition(middle).unwrap();
        graph.restore_transition(&removed).unwrap();
        let transitions: Vec<TransitionId> = graph.transitions().map(|(id, _)| id).collect();
        assert_eq!(transitions[1], middle);
    }

    #[test]
    fn test_rename_keeps_transitions_valid() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        let t = graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();

        graph.rename_state(q1, "sink".into()).unwrap();
        assert_eq!(graph.state_by_name("sink"), Some(q1));
        assert_eq!(graph.state_by_name("q1"), None);
        assert_eq!(graph.transition(t).unwrap().destination, q1);
    }

    #[test]
    fn test_rename_collision_leaves_graph_unchanged() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        let err = graph.rename_state(q1, "q0".into()).unwrap_err();
        assert_eq!(err, GraphError::DuplicateName("q0".into()));
        assert_eq!(graph.state(q0).unwrap().name(), "q0");
        assert_eq!(graph.state(q1).unwrap().name(), "q1");
    }

    #[test]
    fn test_rename_to_own_name_is_allowed() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        assert!(graph.rename_state(q0, "q0".into()).is_ok());
    }

    #[test]
    fn test_from_records_skips_dangling_transitions() {
        let graph = Graph::from_records(
            vec![StateRecord::named("a")],
            vec![TransitionRecord::new("a", "ghost", ["x"])],
        )
        .unwrap();
        assert_eq!(graph.transition_count(), 0);
    }

    #[test]
    fn test_from_records_resumes_name_counter() {
        let mut graph = Graph::from_records(
            vec![StateRecord::named("q7"), StateRecord::named("other")],
            vec![],
        )
        .unwrap();
        let id = graph.add_state(None).unwrap();
        assert_eq!(graph.state(id).unwrap().name(), "q8");
    }

    #[test]
    fn test_from_records_single_initial() {
        let mut a = StateRecord::named("a");
        a.initial = true;
        let mut b = StateRecord::named("b");
        b.initial = true;
        let graph = Graph::from_records(vec![a, b], vec![]).unwrap();
        let initials: Vec<_> = graph.states().filter(|(_, s)| s.is_initial).collect();
        assert_eq!(initials.len(), 1);
        assert_eq!(initials[0].1.name(), "a");
    }
}
