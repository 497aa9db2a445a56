//! Linear undo/redo history.
//!
//! Two stacks of applied commands. Executing a new command pushes it on
//! the undo stack and discards the redo stack (linear history, no redo
//! tree). Undo pops, reverts, and moves the command to the redo stack;
//! redo re-applies and moves it back without touching the rest of the
//! redo stack. Commands whose apply reports [`CommandEffect::Abandoned`]
//! never enter history.
//!
//! # Example
//!
//! ```rust
//! use libautomata::automaton::AutomatonClass;
//! use libautomata::graph::Graph;
//! use libautomata::history::{CommandLog, EditCommand};
//!
//! let mut graph = Graph::new();
//! let mut log = CommandLog::new();
//! log.execute(EditCommand::create_state(), &mut graph, AutomatonClass::NfaEpsilon).unwrap();
//! assert_eq!(graph.state_count(), 1);
//! log.undo(&mut graph).unwrap();
//! assert_eq!(graph.state_count(), 0);
//! log.redo(&mut graph, AutomatonClass::NfaEpsilon).unwrap();
//! assert_eq!(graph.state_count(), 1);
//! ```

mod command;

pub use command::{CommandEffect, CommandError, DeletionCapture, EditCommand};

use crate::automaton::AutomatonClass;
use crate::graph::Graph;
use tracing::debug;

/// The undo and redo stacks of one editing session.
#[derive(Debug, Default)]
pub struct CommandLog {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl CommandLog {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there is anything to undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there is anything to redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of commands available to undo
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of commands available to redo
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Descriptions of the undoable commands, most recent first
    pub fn describe_undo(&self) -> impl Iterator<Item = String> + '_ {
        self.undo_stack.iter().rev().map(EditCommand::describe)
    }

    /// Forget all history. The graph is untouched.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Apply a new command against the graph.
    ///
    /// On [`CommandEffect::Applied`] the command joins the undo stack
    /// and the redo stack is discarded. An abandoned command leaves
    /// history untouched, and a failing one leaves both history and
    /// graph untouched.
    pub fn execute(
        &mut self,
        mut command: EditCommand,
        graph: &mut Graph,
        class: AutomatonClass,
    ) -> Result<CommandEffect, CommandError> {
        let effect = command.apply(graph, class)?;
        match effect {
            CommandEffect::Applied => {
                debug!(command = %command.describe(), "command applied");
                self.undo_stack.push(command);
                self.redo_stack.clear();
            }
            CommandEffect::Abandoned => {
                debug!(command = %command.describe(), "command abandoned");
            }
        }
        Ok(effect)
    }

    /// Revert the most recent command, moving it to the redo stack.
    ///
    /// Returns the description of the undone command, or `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self, graph: &mut Graph) -> Result<Option<String>, CommandError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(None);
        };
        if let Err(err) = command.revert(graph) {
            // Leave history as it was; the graph did not change.
            self.undo_stack.push(command);
            return Err(err);
        }
        let description = command.describe();
        debug!(command = %description, "command undone");
        self.redo_stack.push(command);
        Ok(Some(description))
    }

    /// Re-apply the most recently undone command, moving it back to the
    /// undo stack. Unlike [`CommandLog::execute`], this does not clear
    /// the redo stack, so a chain of redos replays in order.
    ///
    /// Returns the description of the redone command, or `None` when
    /// there is nothing to redo.
    pub fn redo(
        &mut self,
        graph: &mut Graph,
        class: AutomatonClass,
    ) -> Result<Option<String>, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(None);
        };
        if let Err(err) = command.apply(graph, class) {
            self.redo_stack.push(command);
            return Err(err);
        }
        let description = command.describe();
        debug!(command = %description, "command redone");
        self.undo_stack.push(command);
        Ok(Some(description))
    }
}
