//! ε-closure computation.

use super::step::Configuration;
use crate::graph::{Graph, StateId};
use rustc_hash::FxHashSet;

/// The smallest superset of `seed` closed under following ε-transitions.
///
/// Worklist traversal: pop a state, follow its outgoing ε-transitions,
/// and push destinations not seen before. The seed itself is always in
/// the closure.
pub fn epsilon_closure(graph: &Graph, seed: impl IntoIterator<Item = StateId>) -> Configuration {
    let mut closure: FxHashSet<StateId> = seed.into_iter().collect();
    let mut pending: Vec<StateId> = closure.iter().copied().collect();

    while let Some(state) = pending.pop() {
        for (_, transition) in graph.transitions_from(state) {
            if transition.is_epsilon() && closure.insert(transition.destination) {
                pending.push(transition.destination);
            }
        }
    }

    Configuration::from_states(closure)
}
