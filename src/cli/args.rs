//! CLI argument definitions

use crate::automaton::AutomatonClass;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "libautomata")]
#[command(about = "Finite automaton editor and simulator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive REPL
    Repl {
        /// Project file to load (.json, or .jff/.xml for JFLAP)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Automaton class (defaults to nfa-epsilon)
        #[arg(short, long)]
        class: Option<AutomatonClass>,
    },

    /// Run a word through an automaton and print the trace
    Run {
        /// Project file
        file: PathBuf,

        /// Input word
        word: String,

        /// Automaton class to simulate as
        #[arg(short, long, default_value = "nfa-epsilon")]
        class: AutomatonClass,

        /// Print each step of the trace
        #[arg(short, long)]
        trace: bool,

        /// Write a CSV step report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Check an automaton against a class's structural rules
    Validate {
        /// Project file
        file: PathBuf,

        /// Automaton class to validate as
        #[arg(short, long, default_value = "dfa")]
        class: AutomatonClass,
    },

    /// Convert between the native JSON and JFLAP formats
    Convert {
        /// Input file (format chosen by extension)
        input: PathBuf,

        /// Output file (format chosen by extension)
        output: PathBuf,
    },

    /// Display automaton information
    Info {
        /// Project file
        file: PathBuf,
    },
}
