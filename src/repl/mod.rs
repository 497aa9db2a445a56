//! Interactive REPL for libautomata
//!
//! A Read-Eval-Print Loop for building automata, walking the edit
//! history, and running words interactively.

pub mod command;
pub mod state;

pub use command::{Command, CommandResult};
pub use state::ReplState;

/// REPL configuration
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string
    pub prompt: String,
    /// History file path
    pub history_file: Option<std::path::PathBuf>,
    /// Maximum history entries
    pub max_history: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "libautomata> ".to_string(),
            history_file: Some(
                dirs::home_dir()
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
                    .join(".libautomata_history"),
            ),
            max_history: 1000,
        }
    }
}
