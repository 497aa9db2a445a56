//! Reversible edit commands.
//!
//! A command is a plain payload describing one mutation; no I/O, no
//! interaction. Applying a command captures exactly the prior state it
//! needs to invert its own effect, so `apply` followed by `revert`
//! restores the graph bit for bit, including the ids of anything it
//! deleted and recreated.

use crate::automaton::AutomatonClass;
use crate::graph::{Graph, GraphError, RemovedState, RemovedTransition, StateId, TransitionId};
use crate::validation::{check_label, ValidationError};
use thiserror::Error;

/// Why a command could not be applied or reverted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The underlying graph mutation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The mutation would violate the current class's rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `revert` was called on a command that holds no captured state.
    #[error("Command has not been applied; nothing to revert")]
    NotApplied,
}

/// What applying a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    /// The graph changed; the command belongs in history.
    Applied,
    /// The command turned out to be a no-op (same name, same label,
    /// meaningless flag for the class). Nothing changed and nothing
    /// goes into history.
    Abandoned,
}

/// Everything a `DeleteItems` removed, kept for restoration.
#[derive(Debug, Clone, Default)]
pub struct DeletionCapture {
    /// Directly targeted transitions, in removal order
    transitions: Vec<RemovedTransition>,
    /// Removed states, each with its cascaded incident transitions
    states: Vec<RemovedState>,
}

/// One reversible unit of graph mutation.
///
/// The `Option` fields start `None` and are filled in by `apply`; they
/// are what `revert` consumes and what a redo `apply` restores from, so
/// redo brings back the exact same ids and names.
#[derive(Debug, Clone)]
pub enum EditCommand {
    /// Add a state, auto-named when `name` is `None`.
    CreateState {
        /// Explicit name, or `None` for the next `q{N}`
        name: Option<String>,
        /// Id assigned on first apply
        created: Option<StateId>,
        /// The removed state, held between revert and redo
        snapshot: Option<RemovedState>,
    },

    /// Add a transition between two existing states.
    CreateTransition {
        /// Origin state
        origin: StateId,
        /// Destination state
        destination: StateId,
        /// Input symbols (empty ⇒ ε)
        symbols: Vec<String>,
        /// Mealy output
        output: String,
        /// Id assigned on first apply
        created: Option<TransitionId>,
        /// The removed transition, held between revert and redo
        snapshot: Option<RemovedTransition>,
    },

    /// Replace a transition's symbols and output.
    EditTransitionLabel {
        /// The transition to relabel
        id: TransitionId,
        /// New input symbols
        symbols: Vec<String>,
        /// New Mealy output
        output: String,
        /// Prior (symbols, output), captured on apply
        previous: Option<(Vec<String>, String)>,
    },

    /// Flip a state's accepting flag. Abandoned under Mealy/Moore,
    /// where acceptance has no meaning.
    ToggleAcceptance {
        /// The state to toggle
        id: StateId,
    },

    /// Rename a state; transitions keep referring to it by id.
    RenameState {
        /// The state to rename
        id: StateId,
        /// The new name
        name: String,
        /// Prior name, captured on apply
        previous: Option<String>,
    },

    /// Set a state's Moore output symbol.
    SetStateOutput {
        /// The state to update
        id: StateId,
        /// The new output symbol
        output: String,
        /// Prior output, captured on apply
        previous: Option<String>,
    },

    /// Delete a selection of states and transitions as one undoable
    /// unit. Deleting a state cascades to its incident transitions, and
    /// the full cascade is captured.
    DeleteItems {
        /// States to delete
        states: Vec<StateId>,
        /// Transitions to delete (incident ones are covered by the
        /// state cascade and need not be listed)
        transitions: Vec<TransitionId>,
        /// Everything removed, captured on apply
        captured: Option<DeletionCapture>,
    },
}

impl EditCommand {
    /// Shorthand for an auto-named state creation
    pub fn create_state() -> Self {
        EditCommand::CreateState {
            name: None,
            created: None,
            snapshot: None,
        }
    }

    /// Shorthand for a named state creation
    pub fn create_named_state(name: impl Into<String>) -> Self {
        EditCommand::CreateState {
            name: Some(name.into()),
            created: None,
            snapshot: None,
        }
    }

    /// Shorthand for a transition creation
    pub fn create_transition(
        origin: StateId,
        destination: StateId,
        symbols: Vec<String>,
        output: String,
    ) -> Self {
        EditCommand::CreateTransition {
            origin,
            destination,
            symbols,
            output,
            created: None,
            snapshot: None,
        }
    }

    /// Shorthand for deleting a single state
    pub fn delete_state(id: StateId) -> Self {
        EditCommand::DeleteItems {
            states: vec![id],
            transitions: Vec::new(),
            captured: None,
        }
    }

    /// Shorthand for deleting a single transition
    pub fn delete_transition(id: TransitionId) -> Self {
        EditCommand::DeleteItems {
            states: Vec::new(),
            transitions: vec![id],
            captured: None,
        }
    }

    /// The id of the state or transition this command created, once
    /// applied
    pub fn created_state(&self) -> Option<StateId> {
        match self {
            EditCommand::CreateState { created, .. } => *created,
            _ => None,
        }
    }

    /// The id of the transition this command created, once applied
    pub fn created_transition(&self) -> Option<TransitionId> {
        match self {
            EditCommand::CreateTransition { created, .. } => *created,
            _ => None,
        }
    }

    /// A short human-readable description, for history listings
    pub fn describe(&self) -> String {
        match self {
            EditCommand::CreateState { name: Some(n), .. } => format!("create state '{n}'"),
            EditCommand::CreateState { name: None, .. } => "create state".to_string(),
            EditCommand::CreateTransition { symbols, .. } => {
                format!("create transition on {}", symbols.join(","))
            }
            EditCommand::EditTransitionLabel { id, .. } => format!("relabel {id}"),
            EditCommand::ToggleAcceptance { id } => format!("toggle acceptance of {id}"),
            EditCommand::RenameState { name, .. } => format!("rename state to '{name}'"),
            EditCommand::SetStateOutput { id, .. } => format!("set output of {id}"),
            EditCommand::DeleteItems { states, transitions, .. } => {
                format!("delete {} state(s), {} transition(s)", states.len(), transitions.len())
            }
        }
    }

    /// Apply the mutation, validating it against the current class and
    /// capturing whatever `revert` will need.
    ///
    /// Re-applying after a revert restores the original ids rather than
    /// allocating fresh ones.
    pub fn apply(
        &mut self,
        graph: &mut Graph,
        class: AutomatonClass,
    ) -> Result<CommandEffect, CommandError> {
        match self {
            EditCommand::CreateState { name, created, snapshot } => {
                if let Some(removed) = snapshot.take() {
                    graph.restore_state(&removed)?;
                    *created = Some(removed.id);
                } else {
                    *created = Some(graph.add_state(name.clone())?);
                }
                Ok(CommandEffect::Applied)
            }

            EditCommand::CreateTransition {
                origin,
                destination,
                symbols,
                output,
                created,
                snapshot,
            } => {
                if let Some(removed) = snapshot.take() {
                    graph.restore_transition(&removed)?;
                    *created = Some(removed.id);
                } else {
                    check_label(graph, class, *origin, symbols, None)?;
                    *created = Some(graph.add_transition(
                        *origin,
                        *destination,
                        symbols.clone(),
                        output.clone(),
                    )?);
                }
                Ok(CommandEffect::Applied)
            }

            EditCommand::EditTransitionLabel { id, symbols, output, previous } => {
                let current = graph
                    .transition(*id)
                    .ok_or(GraphError::TransitionNotFound(*id))?;
                if current.input_symbols() == symbols.as_slice()
                    && current.output_symbol == *output
                {
                    return Ok(CommandEffect::Abandoned);
                }
                check_label(graph, class, current.origin, symbols, Some(*id))?;
                *previous = Some(graph.update_transition(*id, symbols.clone(), output.clone())?);
                Ok(CommandEffect::Applied)
            }

            EditCommand::ToggleAcceptance { id } => {
                if class.is_transducer() {
                    return Ok(CommandEffect::Abandoned);
                }
                graph.toggle_accepting(*id)?;
                Ok(CommandEffect::Applied)
            }

            EditCommand::RenameState { id, name, previous } => {
                if graph.state(*id).ok_or(GraphError::StateNotFound(*id))?.name() == name {
                    return Ok(CommandEffect::Abandoned);
                }
                *previous = Some(graph.rename_state(*id, name.clone())?);
                Ok(CommandEffect::Applied)
            }

            EditCommand::SetStateOutput { id, output, previous } => {
                if graph.state(*id).ok_or(GraphError::StateNotFound(*id))?.output_symbol == *output
                {
                    return Ok(CommandEffect::Abandoned);
                }
                *previous = Some(graph.set_state_output(*id, output.clone())?);
                Ok(CommandEffect::Applied)
            }

            EditCommand::DeleteItems { states, transitions, captured } => {
                if states.is_empty() && transitions.is_empty() {
                    return Ok(CommandEffect::Abandoned);
                }
                // Check every target and drop duplicates before the
                // first removal; a stale id must not leave a
                // half-applied deletion behind.
                let mut state_targets: Vec<StateId> = Vec::new();
                for &sid in states.iter() {
                    if graph.state(sid).is_none() {
                        return Err(GraphError::StateNotFound(sid).into());
                    }
                    if !state_targets.contains(&sid) {
                        state_targets.push(sid);
                    }
                }
                let mut transition_targets: Vec<TransitionId> = Vec::new();
                for &tid in transitions.iter() {
                    if graph.transition(tid).is_none() {
                        return Err(GraphError::TransitionNotFound(tid).into());
                    }
                    if !transition_targets.contains(&tid) {
                        transition_targets.push(tid);
                    }
                }
                let mut capture = DeletionCapture::default();
                // Directly targeted transitions go first so the state
                // cascade does not capture them twice.
                for tid in transition_targets {
                    capture.transitions.push(graph.remove_transition(tid)?);
                }
                for sid in state_targets {
                    capture.states.push(graph.remove_state(sid)?);
                }
                *captured = Some(capture);
                Ok(CommandEffect::Applied)
            }
        }
    }

    /// Invert the mutation using the state captured by `apply`.
    pub fn revert(&mut self, graph: &mut Graph) -> Result<(), CommandError> {
        match self {
            EditCommand::CreateState { created, snapshot, .. } => {
                let id = created.ok_or(CommandError::NotApplied)?;
                *snapshot = Some(graph.remove_state(id)?);
                Ok(())
            }

            EditCommand::CreateTransition { created, snapshot, .. } => {
                let id = created.ok_or(CommandError::NotApplied)?;
                *snapshot = Some(graph.remove_transition(id)?);
                Ok(())
            }

            EditCommand::EditTransitionLabel { id, previous, .. } => {
                let (symbols, output) = previous.take().ok_or(CommandError::NotApplied)?;
                graph.update_transition(*id, symbols, output)?;
                Ok(())
            }

            EditCommand::ToggleAcceptance { id } => {
                graph.toggle_accepting(*id)?;
                Ok(())
            }

            EditCommand::RenameState { id, previous, .. } => {
                let old = previous.take().ok_or(CommandError::NotApplied)?;
                graph.rename_state(*id, old)?;
                Ok(())
            }

            EditCommand::SetStateOutput { id, previous, .. } => {
                let old = previous.take().ok_or(CommandError::NotApplied)?;
                graph.set_state_output(*id, old)?;
                Ok(())
            }

            EditCommand::DeleteItems { captured, .. } => {
                let capture = captured.take().ok_or(CommandError::NotApplied)?;
                // Inverses replay in reverse removal order so every
                // captured position is valid when its item goes back in.
                for removed in capture.states.iter().rev() {
                    graph.restore_state(removed)?;
                    for cascaded in &removed.transitions {
                        graph.restore_transition(cascaded)?;
                    }
                }
                for removed in capture.transitions.iter().rev() {
                    graph.restore_transition(removed)?;
                }
                Ok(())
            }
        }
    }
}
