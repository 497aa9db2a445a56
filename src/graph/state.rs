//! State records.

/// A named state in the automaton graph.
///
/// Position is opaque to the engine: it is carried for the rendering
/// layer and round-tripped through the project formats untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Unique display name. Mutated only through
    /// [`Graph::rename_state`](crate::graph::Graph::rename_state) so the
    /// name index stays consistent.
    pub(crate) name: String,

    /// Canvas position, opaque passthrough.
    pub pos: (f64, f64),

    /// Whether this is the initial state. At most one state per graph
    /// has this set.
    pub is_initial: bool,

    /// Whether this state accepts (acceptor classes only).
    pub is_accepting: bool,

    /// Output symbol emitted on entry, used by Moore semantics.
    pub output_symbol: String,
}

impl State {
    /// Create a plain state with the given name and position
    pub fn new(name: impl Into<String>, pos: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            pos,
            is_initial: false,
            is_accepting: false,
            output_symbol: String::new(),
        }
    }

    /// The state's unique name
    pub fn name(&self) -> &str {
        &self.name
    }
}
