//! CLI interface for libautomata
//!
//! Provides command-line utilities for loading, validating, converting,
//! and simulating automata.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
