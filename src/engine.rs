//! The engine context: one automaton, its class, and its history.
//!
//! All state lives in an explicit [`Engine`] value; nothing is ambient,
//! so independent automata coexist and tests construct engines freely.
//! Graph mutations flow through [`Engine::execute`] so every change is
//! undoable, and simulation borrows the graph, so the borrow checker
//! enforces the exclusive simulation mode: no command can be executed
//! while a [`SimulationRun`] is alive.

use crate::automaton::AutomatonClass;
use crate::graph::{Graph, StateRecord, TransitionRecord};
use crate::history::{CommandEffect, CommandError, CommandLog, EditCommand};
use crate::simulation::{self, SimulationRun, Trace};
use crate::validation::{validate, ValidationError};
use tracing::info;

/// An editable automaton with undo/redo and simulation.
#[derive(Debug, Default)]
pub struct Engine {
    graph: Graph,
    class: AutomatonClass,
    history: CommandLog,
    revision: u64,
}

impl Engine {
    /// Fresh engine holding an empty NFA-ε
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh engine for a given class
    pub fn with_class(class: AutomatonClass) -> Self {
        Self {
            class,
            ..Self::default()
        }
    }

    /// The current graph, for reading and simulation
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The class the automaton is edited and simulated as
    pub fn class(&self) -> AutomatonClass {
        self.class
    }

    /// The undo/redo history
    pub fn history(&self) -> &CommandLog {
        &self.history
    }

    /// Monotonic edit counter; bumps on every applied, undone, or
    /// redone command and on every load. A collaborator can compare
    /// revisions to detect that a cached trace is stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Switch the automaton class.
    ///
    /// Starts over: the graph and history are cleared. Confirming the
    /// discard of unsaved work is the caller's concern.
    pub fn set_class(&mut self, class: AutomatonClass) {
        info!(%class, "switching automaton class");
        self.class = class;
        self.graph = Graph::new();
        self.history.clear();
        self.revision += 1;
    }

    /// Replace the graph from boundary records.
    ///
    /// All-or-nothing: on any error the previous graph is kept intact.
    /// History is cleared on success since it refers to the old graph.
    pub fn load_graph(
        &mut self,
        states: Vec<StateRecord>,
        transitions: Vec<TransitionRecord>,
    ) -> crate::graph::Result<()> {
        let graph = Graph::from_records(states, transitions)?;
        info!(
            states = graph.state_count(),
            transitions = graph.transition_count(),
            "graph loaded"
        );
        self.graph = graph;
        self.history.clear();
        self.revision += 1;
        Ok(())
    }

    /// Snapshot the graph as boundary records
    pub fn export_graph(&self) -> (Vec<StateRecord>, Vec<TransitionRecord>) {
        self.graph.export()
    }

    /// Check the graph against the current class's structural rules
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(&self.graph, self.class)
    }

    /// Apply an edit command through the history
    pub fn execute(&mut self, command: EditCommand) -> Result<CommandEffect, CommandError> {
        let effect = self.history.execute(command, &mut self.graph, self.class)?;
        if effect == CommandEffect::Applied {
            self.revision += 1;
        }
        Ok(effect)
    }

    /// Undo the most recent command; `None` when history is empty
    pub fn undo(&mut self) -> Result<Option<String>, CommandError> {
        let undone = self.history.undo(&mut self.graph)?;
        if undone.is_some() {
            self.revision += 1;
        }
        Ok(undone)
    }

    /// Redo the most recently undone command; `None` when nothing is
    /// available
    pub fn redo(&mut self) -> Result<Option<String>, CommandError> {
        let redone = self.history.redo(&mut self.graph, self.class)?;
        if redone.is_some() {
            self.revision += 1;
        }
        Ok(redone)
    }

    /// Run a word to completion under the current class
    pub fn run(&self, word: &str) -> simulation::Result<Trace> {
        simulation::simulate(&self.graph, self.class, word)
    }

    /// Start a step-at-a-time run. The returned iterator borrows the
    /// engine, so no mutation can interleave with it.
    pub fn begin_run(&self, word: &str) -> simulation::Result<SimulationRun<'_>> {
        SimulationRun::new(&self.graph, self.class, word)
    }
}
