//! libautomata - Finite automaton editor and simulator
//!
//! Provides CLI utilities and an interactive REPL for building and
//! running automata.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use libautomata::automaton::AutomatonClass;
use libautomata::cli::{commands, Cli, Commands};
use libautomata::repl::{Command, CommandResult, ReplConfig, ReplState};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Repl { file, class } => run_repl(file, class),
        _ => commands::execute(cli.command),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run_repl(file: Option<PathBuf>, class: Option<AutomatonClass>) -> anyhow::Result<()> {
    print_banner();

    let mut state = match class {
        Some(class) => ReplState::with_class(class),
        None => ReplState::new(),
    };

    if let Some(path) = file {
        match state.load(&path) {
            Ok((states, transitions)) => {
                println!(
                    "  Loaded {} state(s), {} transition(s) from {}",
                    states.to_string().green().bold(),
                    transitions.to_string().green().bold(),
                    path.display().to_string().cyan()
                );
                println!();
            }
            Err(e) => {
                eprintln!("  {}: Could not load project: {}", "Warning".yellow(), e);
                println!();
            }
        }
    }

    let repl_config = ReplConfig::default();
    let rustyline_config = Config::builder()
        .auto_add_history(true)
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .build();
    let mut editor = DefaultEditor::with_config(rustyline_config)?;

    if let Some(history_path) = &repl_config.history_file {
        if history_path.exists() {
            let _ = editor.load_history(history_path);
        }
    }

    loop {
        let prompt = format!(
            "{} {}> ",
            "libautomata".bright_cyan().bold(),
            state.engine.class().to_string().bright_yellow()
        );

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}: {:?}", "Readline error".red().bold(), err);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}: {}", "Parse error".red(), e);
                continue;
            }
        };

        match command.execute(&mut state) {
            Ok(CommandResult::Continue(output)) => println!("{output}"),
            Ok(CommandResult::Exit) => break,
            Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
        }
    }

    if let Some(history_path) = &repl_config.history_file {
        if let Err(e) = editor.save_history(history_path) {
            eprintln!("{}: Failed to save history: {}", "Warning".yellow(), e);
        }
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!(
        "{}",
        "═══════════════════════════════════════════════════════".bright_cyan()
    );
    println!(
        "{}",
        "   libautomata - Finite Automaton Workbench"
            .bright_cyan()
            .bold()
    );
    println!(
        "{}",
        "═══════════════════════════════════════════════════════".bright_cyan()
    );
    println!();
    println!("  Version: {}", env!("CARGO_PKG_VERSION").green());
    println!("  Type {} for available commands", "'help'".yellow().bold());
    println!(
        "  Type {} or press {} to exit",
        "'exit'".yellow().bold(),
        "Ctrl+D".yellow().bold()
    );
    println!();
    println!("{}", "  Quick Start:".bold());
    println!("    • Add two states:     {}", "state / state".cyan());
    println!("    • Connect them:       {}", "trans q0 q1 a".cyan());
    println!("    • Mark acceptance:    {}", "accept q1".cyan());
    println!("    • Run a word:         {}", "run aab".cyan());
    println!();
}
