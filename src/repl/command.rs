//! Command parsing and execution
//!
//! Defines all REPL commands and their execution logic. Parsing turns a
//! line into a plain [`Command`] payload; execution applies it to the
//! session. Interactive input never happens inside the engine.

use super::state::ReplState;
use crate::automaton::AutomatonClass;
use crate::graph::{parse_label, Transition};
use crate::history::EditCommand;
use crate::serialization::write_trace_report;
use crate::simulation::{Outcome, Trace};
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// REPL command
#[derive(Debug, Clone)]
pub enum Command {
    /// Add a state: state [name]
    AddState {
        /// Explicit name, or auto `q{N}`
        name: Option<String>,
    },
    /// Add a transition: trans <origin> <destination> <label>
    AddTransition {
        /// Origin state name
        origin: String,
        /// Destination state name
        destination: String,
        /// Label, e.g. `a,b` or `a/1` (empty symbols ⇒ ε)
        label: String,
    },
    /// Relabel a transition: relabel <n> <label>
    Relabel {
        /// 1-based index from `list`
        index: usize,
        /// New label
        label: String,
    },
    /// Rename a state: rename <old> <new>
    Rename {
        /// Current name
        from: String,
        /// New name
        to: String,
    },
    /// Toggle a state's accepting flag: accept <name>
    ToggleAccept {
        /// State name
        name: String,
    },
    /// Set a state's Moore output: output <name> <symbol>
    SetOutput {
        /// State name
        name: String,
        /// Output symbol
        symbol: String,
    },
    /// Delete a state (cascading): delstate <name>
    DeleteState {
        /// State name
        name: String,
    },
    /// Delete a transition: deltrans <n>
    DeleteTransition {
        /// 1-based index from `list`
        index: usize,
    },
    /// Show or switch the automaton class: class [name]
    Class {
        /// New class; `None` just shows the current one
        class: Option<AutomatonClass>,
    },
    /// Run a word: run [word] (bare `run` runs the empty word)
    Run {
        /// Input word
        word: String,
    },
    /// Validate the graph against the current class: validate
    Validate,
    /// List states and transitions: list
    List,
    /// Undo the last command: undo
    Undo,
    /// Redo the last undone command: redo
    Redo,
    /// Show the undo history: history
    History,
    /// Load a project file: load <path>
    Load {
        /// Path to load
        path: PathBuf,
    },
    /// Save the project: save [path]
    Save {
        /// Path to save to; defaults to the session's file
        path: Option<PathBuf>,
    },
    /// Write a CSV step report: report <word> <path>
    Report {
        /// Input word
        word: String,
        /// Report destination
        path: PathBuf,
    },
    /// Remove every state and transition: clear
    Clear,
    /// Show help: help
    Help,
    /// Exit REPL: exit | quit
    Exit,
}

/// Command result
pub enum CommandResult {
    /// Continue REPL
    Continue(String),
    /// Exit REPL
    Exit,
}

impl Command {
    /// Parse command from input string
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(anyhow!("Empty command"));
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "state" | "addstate" | "s" => Ok(Self::AddState {
                name: parts.get(1).map(|s| s.to_string()),
            }),
            "trans" | "addtrans" | "t" => Self::parse_transition(&parts[1..]),
            "relabel" | "edit" => Self::parse_relabel(&parts[1..]),
            "rename" | "mv" => Self::parse_rename(&parts[1..]),
            "accept" | "final" => Self::parse_accept(&parts[1..]),
            "output" | "moore" => Self::parse_output(&parts[1..]),
            "delstate" | "rmstate" => Self::parse_delete_state(&parts[1..]),
            "deltrans" | "rmtrans" => Self::parse_delete_transition(&parts[1..]),
            "class" | "mode" => Self::parse_class(&parts[1..]),
            "run" | "simulate" | "r" => Ok(Self::Run {
                word: parts.get(1).map(|s| s.to_string()).unwrap_or_default(),
            }),
            "validate" | "check" => Ok(Self::Validate),
            "list" | "ls" | "show" => Ok(Self::List),
            "undo" | "u" => Ok(Self::Undo),
            "redo" => Ok(Self::Redo),
            "history" | "hist" => Ok(Self::History),
            "load" => Self::parse_load(&parts[1..]),
            "save" => Ok(Self::Save {
                path: parts.get(1).map(PathBuf::from),
            }),
            "report" => Self::parse_report(&parts[1..]),
            "clear" => Ok(Self::Clear),
            "help" | "?" => Ok(Self::Help),
            "exit" | "quit" => Ok(Self::Exit),
            _ => Err(anyhow!(
                "Unknown command: '{}'. Type 'help' for available commands.",
                cmd
            )),
        }
    }

    fn parse_transition(args: &[&str]) -> Result<Self> {
        if args.len() < 2 {
            return Err(anyhow!("Usage: trans <origin> <destination> [label]"));
        }
        Ok(Self::AddTransition {
            origin: args[0].to_string(),
            destination: args[1].to_string(),
            // No label means a spontaneous (ε) transition.
            label: args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default(),
        })
    }

    fn parse_relabel(args: &[&str]) -> Result<Self> {
        if args.len() < 2 {
            return Err(anyhow!("Usage: relabel <n> <label>"));
        }
        Ok(Self::Relabel {
            index: args[0].parse().context("Invalid transition index")?,
            label: args[1..].join(" "),
        })
    }

    fn parse_rename(args: &[&str]) -> Result<Self> {
        if args.len() != 2 {
            return Err(anyhow!("Usage: rename <old> <new>"));
        }
        Ok(Self::Rename {
            from: args[0].to_string(),
            to: args[1].to_string(),
        })
    }

    fn parse_accept(args: &[&str]) -> Result<Self> {
        if args.len() != 1 {
            return Err(anyhow!("Usage: accept <state>"));
        }
        Ok(Self::ToggleAccept {
            name: args[0].to_string(),
        })
    }

    fn parse_output(args: &[&str]) -> Result<Self> {
        if args.is_empty() {
            return Err(anyhow!("Usage: output <state> [symbol]"));
        }
        Ok(Self::SetOutput {
            name: args[0].to_string(),
            symbol: args.get(1).map(|s| s.to_string()).unwrap_or_default(),
        })
    }

    fn parse_delete_state(args: &[&str]) -> Result<Self> {
        if args.len() != 1 {
            return Err(anyhow!("Usage: delstate <state>"));
        }
        Ok(Self::DeleteState {
            name: args[0].to_string(),
        })
    }

    fn parse_delete_transition(args: &[&str]) -> Result<Self> {
        if args.len() != 1 {
            return Err(anyhow!("Usage: deltrans <n>"));
        }
        Ok(Self::DeleteTransition {
            index: args[0].parse().context("Invalid transition index")?,
        })
    }

    fn parse_class(args: &[&str]) -> Result<Self> {
        let class = match args.first() {
            Some(name) => Some(name.parse::<AutomatonClass>().map_err(|e| anyhow!(e))?),
            None => None,
        };
        Ok(Self::Class { class })
    }

    fn parse_load(args: &[&str]) -> Result<Self> {
        if args.len() != 1 {
            return Err(anyhow!("Usage: load <path>"));
        }
        Ok(Self::Load {
            path: PathBuf::from(args[0]),
        })
    }

    fn parse_report(args: &[&str]) -> Result<Self> {
        if args.len() != 2 {
            return Err(anyhow!("Usage: report <word> <path>"));
        }
        Ok(Self::Report {
            word: args[0].to_string(),
            path: PathBuf::from(args[1]),
        })
    }

    /// Execute command against REPL state
    pub fn execute(&self, state: &mut ReplState) -> Result<CommandResult> {
        match self {
            Self::AddState { name } => {
                let command = match name {
                    Some(name) => EditCommand::create_named_state(name.clone()),
                    None => EditCommand::create_state(),
                };
                state.engine.execute(command)?;
                // New states always land at the end of insertion order.
                let created = state
                    .engine
                    .graph()
                    .states()
                    .last()
                    .map(|(_, s)| s.name().to_string())
                    .unwrap_or_default();
                Ok(CommandResult::Continue(format!(
                    "Added state {} ({} total)",
                    created.cyan(),
                    state.engine.graph().state_count()
                )))
            }

            Self::AddTransition {
                origin,
                destination,
                label,
            } => {
                let origin_id = state.resolve_state(origin)?;
                let destination_id = state.resolve_state(destination)?;
                let (symbols, output) = parse_label(label)?;
                state.engine.execute(EditCommand::create_transition(
                    origin_id,
                    destination_id,
                    symbols,
                    output,
                ))?;
                Ok(CommandResult::Continue(format!(
                    "{} --{}--> {}",
                    origin.cyan(),
                    if label.is_empty() { "ε" } else { label },
                    destination.cyan()
                )))
            }

            Self::Relabel { index, label } => {
                let id = state.resolve_transition(*index)?;
                let (symbols, output) = parse_label(label)?;
                state.engine.execute(EditCommand::EditTransitionLabel {
                    id,
                    symbols,
                    output,
                    previous: None,
                })?;
                Ok(CommandResult::Continue(format!("Transition #{index} relabeled")))
            }

            Self::Rename { from, to } => {
                let id = state.resolve_state(from)?;
                state.engine.execute(EditCommand::RenameState {
                    id,
                    name: to.clone(),
                    previous: None,
                })?;
                Ok(CommandResult::Continue(format!(
                    "{} renamed to {}",
                    from.cyan(),
                    to.cyan()
                )))
            }

            Self::ToggleAccept { name } => {
                let id = state.resolve_state(name)?;
                let effect = state.engine.execute(EditCommand::ToggleAcceptance { id })?;
                if effect == crate::history::CommandEffect::Abandoned {
                    return Ok(CommandResult::Continue(format!(
                        "{} has no acceptance concept",
                        state.engine.class().to_string().yellow()
                    )));
                }
                let accepting = state
                    .engine
                    .graph()
                    .state(id)
                    .map(|s| s.is_accepting)
                    .unwrap_or(false);
                Ok(CommandResult::Continue(format!(
                    "{} is {}accepting",
                    name.cyan(),
                    if accepting { "" } else { "no longer " }
                )))
            }

            Self::SetOutput { name, symbol } => {
                let id = state.resolve_state(name)?;
                state.engine.execute(EditCommand::SetStateOutput {
                    id,
                    output: symbol.clone(),
                    previous: None,
                })?;
                Ok(CommandResult::Continue(format!(
                    "{} now emits '{}'",
                    name.cyan(),
                    symbol
                )))
            }

            Self::DeleteState { name } => {
                let id = state.resolve_state(name)?;
                let incident = state.engine.graph().transitions_from(id).count()
                    + state
                        .engine
                        .graph()
                        .transitions_to(id)
                        .filter(|(_, t)| !t.is_loop())
                        .count();
                state.engine.execute(EditCommand::delete_state(id))?;
                Ok(CommandResult::Continue(format!(
                    "Deleted {} and {} incident transition(s)",
                    name.cyan(),
                    incident
                )))
            }

            Self::DeleteTransition { index } => {
                let id = state.resolve_transition(*index)?;
                state.engine.execute(EditCommand::delete_transition(id))?;
                Ok(CommandResult::Continue(format!("Deleted transition #{index}")))
            }

            Self::Class { class: None } => Ok(CommandResult::Continue(format!(
                "Current class: {}",
                state.engine.class().to_string().green()
            ))),

            Self::Class { class: Some(class) } => {
                // Switching starts a fresh automaton.
                state.engine.set_class(*class);
                Ok(CommandResult::Continue(format!(
                    "Class set to {}; graph and history cleared",
                    class.to_string().green()
                )))
            }

            Self::Run { word } => {
                let trace = state.engine.run(word)?;
                Ok(CommandResult::Continue(render_trace(state, &trace)))
            }

            Self::Validate => match state.engine.validate() {
                Ok(()) => Ok(CommandResult::Continue(format!(
                    "{} as {}",
                    "Valid".green().bold(),
                    state.engine.class().to_string().green()
                ))),
                Err(error) => Ok(CommandResult::Continue(format!(
                    "{}: {}",
                    "Invalid".red().bold(),
                    error
                ))),
            },

            Self::List => Ok(CommandResult::Continue(render_listing(state))),

            Self::Undo => match state.engine.undo()? {
                Some(description) => {
                    Ok(CommandResult::Continue(format!("Undid: {description}")))
                }
                None => Ok(CommandResult::Continue("Nothing to undo".yellow().to_string())),
            },

            Self::Redo => match state.engine.redo()? {
                Some(description) => {
                    Ok(CommandResult::Continue(format!("Redid: {description}")))
                }
                None => Ok(CommandResult::Continue("Nothing to redo".yellow().to_string())),
            },

            Self::History => {
                let entries: Vec<String> = state
                    .engine
                    .history()
                    .describe_undo()
                    .enumerate()
                    .map(|(position, description)| format!("  {} {description}", position + 1))
                    .collect();
                if entries.is_empty() {
                    Ok(CommandResult::Continue("History is empty".to_string()))
                } else {
                    Ok(CommandResult::Continue(entries.join("\n")))
                }
            }

            Self::Load { path } => {
                let (states, transitions) = state
                    .load(path)
                    .with_context(|| format!("Could not load '{}'", path.display()))?;
                Ok(CommandResult::Continue(format!(
                    "Loaded {} state(s), {} transition(s) from {}",
                    states,
                    transitions,
                    path.display().to_string().cyan()
                )))
            }

            Self::Save { path } => {
                let written = state.save(path.as_deref())?;
                Ok(CommandResult::Continue(format!(
                    "Saved to {}",
                    written.display().to_string().cyan()
                )))
            }

            Self::Report { word, path } => {
                let trace = state.engine.run(word)?;
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Could not create '{}'", path.display()))?;
                write_trace_report(state.engine.graph(), &trace, file)?;
                Ok(CommandResult::Continue(format!(
                    "Report written to {}",
                    path.display().to_string().cyan()
                )))
            }

            Self::Clear => {
                let ids: Vec<_> = state.engine.graph().states().map(|(id, _)| id).collect();
                if ids.is_empty() {
                    return Ok(CommandResult::Continue("Graph is already empty".to_string()));
                }
                state.engine.execute(EditCommand::DeleteItems {
                    states: ids,
                    transitions: Vec::new(),
                    captured: None,
                })?;
                Ok(CommandResult::Continue(
                    "Graph cleared (undo restores it)".to_string(),
                ))
            }

            Self::Help => Ok(CommandResult::Continue(help_text())),

            Self::Exit => Ok(CommandResult::Exit),
        }
    }
}

fn render_transition(state: &ReplState, transition: &Transition) -> String {
    let graph = state.engine.graph();
    format!(
        "{} --{}--> {}",
        graph.state_name(transition.origin).cyan(),
        transition.label(state.engine.class().is_transducer()),
        graph.state_name(transition.destination).cyan()
    )
}

fn render_listing(state: &ReplState) -> String {
    let graph = state.engine.graph();
    let mut lines = Vec::new();
    lines.push(format!("{}", "States:".bold()));
    for (_, s) in graph.states() {
        let mut flags = Vec::new();
        if s.is_initial {
            flags.push("initial");
        }
        if s.is_accepting {
            flags.push("accepting");
        }
        let mut line = format!("  {}", s.name().cyan());
        if !flags.is_empty() {
            line.push_str(&format!(" ({})", flags.join(", ")));
        }
        if !s.output_symbol.is_empty() {
            line.push_str(&format!(" emits '{}'", s.output_symbol));
        }
        lines.push(line);
    }
    lines.push(format!("{}", "Transitions:".bold()));
    for (position, (_, transition)) in graph.transitions().enumerate() {
        lines.push(format!(
            "  {} {}",
            position + 1,
            render_transition(state, transition)
        ));
    }
    if graph.is_empty() {
        return "Graph is empty".to_string();
    }
    lines.join("\n")
}

fn render_trace(state: &ReplState, trace: &Trace) -> String {
    let graph = state.engine.graph();
    let mut lines = Vec::new();
    for step in &trace.steps {
        let symbol = step
            .symbol
            .map(String::from)
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!(
            "  {:>3}  {} --{}--> {}",
            step.index,
            step.before.describe(graph),
            symbol,
            step.after.describe(graph)
        );
        if !step.output.is_empty() {
            line.push_str(&format!("  emits {}", step.output.cyan()));
        }
        lines.push(line);
    }
    let verdict = trace.outcome.describe(graph);
    let verdict = match trace.outcome {
        Outcome::Accepted => verdict.green().bold(),
        Outcome::Completed => verdict.cyan().bold(),
        _ => verdict.red().bold(),
    };
    lines.push(format!("{}: {}", "Result".bold(), verdict));
    if state.engine.class().is_transducer() {
        lines.push(format!("{}: {}", "Output".bold(), trace.output()));
    }
    lines.join("\n")
}

fn help_text() -> String {
    let commands: &[(&str, &str)] = &[
        ("state [name]", "add a state (first one becomes initial)"),
        ("trans <from> <to> [label]", "add a transition; label 'a,b' or 'a/1', none for ε"),
        ("relabel <n> <label>", "change transition #n's label"),
        ("rename <old> <new>", "rename a state"),
        ("accept <state>", "toggle a state's accepting flag"),
        ("output <state> [symbol]", "set a state's Moore output"),
        ("delstate <state>", "delete a state and its transitions"),
        ("deltrans <n>", "delete transition #n"),
        ("class [name]", "show or switch the class (dfa, nfa, nfa-epsilon, mealy, moore)"),
        ("run [word]", "simulate a word and print the trace; bare 'run' for the empty word"),
        ("validate", "check the graph against the current class"),
        ("list", "list states and transitions"),
        ("undo / redo", "walk the edit history"),
        ("history", "show the undo stack"),
        ("load <path>", "load a project (.json) or JFLAP file (.jff)"),
        ("save [path]", "save the project"),
        ("report <word> <path>", "write a CSV step report"),
        ("clear", "delete everything (one undoable operation)"),
        ("exit", "leave the REPL"),
    ];
    let mut lines = vec![format!("{}", "Commands:".bold())];
    for (usage, description) in commands {
        lines.push(format!("  {:<28} {}", usage.cyan(), description));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert!(matches!(
            Command::parse("state q5").unwrap(),
            Command::AddState { name: Some(n) } if n == "q5"
        ));
        assert!(matches!(
            Command::parse("trans q0 q1 a,b/1").unwrap(),
            Command::AddTransition { label, .. } if label == "a,b/1"
        ));
        assert!(matches!(Command::parse("undo").unwrap(), Command::Undo));
        assert!(matches!(Command::parse("exit").unwrap(), Command::Exit));
    }

    #[test]
    fn test_parse_bare_run_is_the_empty_word() {
        assert!(matches!(
            Command::parse("run").unwrap(),
            Command::Run { word } if word.is_empty()
        ));
    }

    #[test]
    fn test_parse_epsilon_transition_has_empty_label() {
        assert!(matches!(
            Command::parse("trans q0 q1").unwrap(),
            Command::AddTransition { label, .. } if label.is_empty()
        ));
    }

    #[test]
    fn test_parse_class() {
        assert!(matches!(
            Command::parse("class mealy").unwrap(),
            Command::Class { class: Some(AutomatonClass::Mealy) }
        ));
        assert!(matches!(
            Command::parse("class").unwrap(),
            Command::Class { class: None }
        ));
        assert!(Command::parse("class pushdown").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(Command::parse("frobnicate").is_err());
        assert!(Command::parse("").is_err());
    }

    #[test]
    fn test_execute_build_and_run() {
        let mut state = ReplState::with_class(AutomatonClass::Dfa);
        for line in ["state", "state", "trans q0 q1 a", "accept q1"] {
            Command::parse(line)
                .unwrap()
                .execute(&mut state)
                .unwrap();
        }
        let result = Command::parse("run a").unwrap().execute(&mut state).unwrap();
        match result {
            CommandResult::Continue(output) => assert!(output.contains("accepted")),
            _ => panic!("expected output"),
        }
    }

    #[test]
    fn test_execute_undo_round_trip() {
        let mut state = ReplState::new();
        Command::parse("state").unwrap().execute(&mut state).unwrap();
        assert_eq!(state.engine.graph().state_count(), 1);
        Command::parse("undo").unwrap().execute(&mut state).unwrap();
        assert_eq!(state.engine.graph().state_count(), 0);
        Command::parse("redo").unwrap().execute(&mut state).unwrap();
        assert_eq!(state.engine.graph().state_count(), 1);
    }
}
