//! REPL session state
//!
//! Holds the engine being edited plus the session's file binding.

use crate::automaton::AutomatonClass;
use crate::engine::Engine;
use crate::graph::{StateId, TransitionId};
use crate::serialization::{load_file, save_file};
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Everything a REPL session carries between commands.
pub struct ReplState {
    /// The automaton being edited
    pub engine: Engine,
    /// File the session was loaded from / last saved to
    pub file: Option<PathBuf>,
}

impl ReplState {
    /// Fresh session holding an empty NFA-ε
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
            file: None,
        }
    }

    /// Fresh session for a given class
    pub fn with_class(class: AutomatonClass) -> Self {
        Self {
            engine: Engine::with_class(class),
            file: None,
        }
    }

    /// Resolve a state name to its id
    pub fn resolve_state(&self, name: &str) -> Result<StateId> {
        self.engine
            .graph()
            .state_by_name(name)
            .ok_or_else(|| anyhow!("No state named '{}'", name))
    }

    /// Resolve a 1-based transition index (as shown by `list`) to its id
    pub fn resolve_transition(&self, index: usize) -> Result<TransitionId> {
        self.engine
            .graph()
            .transitions()
            .nth(index.checked_sub(1).ok_or_else(|| anyhow!("Transition indices start at 1"))?)
            .map(|(id, _)| id)
            .ok_or_else(|| anyhow!("No transition #{} (see 'list')", index))
    }

    /// Replace the graph from a project file; the previous graph is
    /// kept on failure
    pub fn load(&mut self, path: &Path) -> Result<(usize, usize)> {
        let (states, transitions) = load_file(path)?;
        self.engine.load_graph(states, transitions)?;
        self.file = Some(path.to_path_buf());
        Ok((
            self.engine.graph().state_count(),
            self.engine.graph().transition_count(),
        ))
    }

    /// Save the graph to a path, or to the session's bound file
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| self.file.clone())
            .ok_or_else(|| anyhow!("No file bound to this session; use 'save <path>'"))?;
        let (states, transitions) = self.engine.export_graph();
        save_file(&path, &states, &transitions)?;
        self.file = Some(path.clone());
        Ok(path)
    }
}

impl Default for ReplState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::EditCommand;

    #[test]
    fn test_resolve_state_by_name() {
        let mut state = ReplState::new();
        state.engine.execute(EditCommand::create_state()).unwrap();
        assert!(state.resolve_state("q0").is_ok());
        assert!(state.resolve_state("missing").is_err());
    }

    #[test]
    fn test_resolve_transition_index_is_one_based() {
        let mut state = ReplState::new();
        state.engine.execute(EditCommand::create_state()).unwrap();
        let q0 = state.resolve_state("q0").unwrap();
        state
            .engine
            .execute(EditCommand::create_transition(
                q0,
                q0,
                vec!["a".into()],
                String::new(),
            ))
            .unwrap();
        assert!(state.resolve_transition(1).is_ok());
        assert!(state.resolve_transition(0).is_err());
        assert!(state.resolve_transition(2).is_err());
    }
}
