//! # libautomata
//!
//! An editable finite-automaton model and simulation engine: a graph of
//! states and labeled transitions, per-class validity rules, stepping
//! semantics for DFA, NFA, NFA-ε, Mealy, and Moore machines, and an
//! undo/redo command log that makes every mutation reversible.
//!
//! ## Example
//!
//! ```rust
//! use libautomata::prelude::*;
//!
//! let mut engine = Engine::with_class(AutomatonClass::Dfa);
//! engine.execute(EditCommand::create_state()).unwrap();
//! engine.execute(EditCommand::create_state()).unwrap();
//!
//! let q0 = engine.graph().state_by_name("q0").unwrap();
//! let q1 = engine.graph().state_by_name("q1").unwrap();
//! engine.execute(EditCommand::create_transition(q0, q1, vec!["a".into()], String::new())).unwrap();
//! engine.execute(EditCommand::ToggleAcceptance { id: q1 }).unwrap();
//!
//! let trace = engine.run("a").unwrap();
//! assert!(trace.outcome.is_accepted());
//!
//! engine.undo().unwrap(); // q1 no longer accepts
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod automaton;
pub mod engine;
pub mod graph;
pub mod history;
pub mod simulation;
pub mod validation;

#[cfg(feature = "serialization")]
pub mod serialization;

/// Interactive REPL for building and running automata
#[cfg(feature = "cli")]
pub mod repl;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::automaton::AutomatonClass;
    pub use crate::engine::Engine;
    pub use crate::graph::{
        Graph, GraphError, State, StateId, StateRecord, Transition, TransitionId,
        TransitionRecord, EPSILON,
    };
    pub use crate::history::{CommandEffect, CommandError, CommandLog, EditCommand};
    pub use crate::simulation::{
        epsilon_closure, simulate, Configuration, Outcome, SimulationError, SimulationRun, Step,
        Trace,
    };
    pub use crate::validation::{check_label, validate, ValidationError};

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{
        write_trace_report, FileError, FileFormat, JflapSerializer, JsonSerializer,
        ProjectSerializer,
    };
}
