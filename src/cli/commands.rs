//! CLI command implementations

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::automaton::AutomatonClass;
use crate::engine::Engine;
use crate::serialization::{load_file, save_file, write_trace_report, FileFormat};
use crate::simulation::{Outcome, Trace};
use crate::validation::validate;

use super::args::Commands;

/// Execute a CLI command
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Repl { .. } => {
            // Handled in main.rs
            unreachable!("REPL command should be handled in main");
        }
        Commands::Run {
            file,
            word,
            class,
            trace,
            report,
        } => cmd_run(&file, &word, class, trace, report.as_deref()),
        Commands::Validate { file, class } => cmd_validate(&file, class),
        Commands::Convert { input, output } => cmd_convert(&input, &output),
        Commands::Info { file } => cmd_info(&file),
    }
}

/// Load a project file into a fresh engine
fn load_engine(path: &Path, class: AutomatonClass) -> Result<Engine> {
    let (states, transitions) = load_file(path)
        .with_context(|| format!("Could not read '{}'", path.display()))?;
    let mut engine = Engine::with_class(class);
    engine
        .load_graph(states, transitions)
        .with_context(|| format!("Could not load '{}'", path.display()))?;
    Ok(engine)
}

fn print_trace(engine: &Engine, trace: &Trace) {
    for step in &trace.steps {
        let symbol = step
            .symbol
            .map(String::from)
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!(
            "  {:>3}  {} --{}--> {}",
            step.index,
            step.before.describe(engine.graph()),
            symbol,
            step.after.describe(engine.graph()),
        );
        if !step.output.is_empty() {
            line.push_str(&format!("  emits {}", step.output.cyan()));
        }
        println!("{line}");
    }
}

fn print_verdict(engine: &Engine, trace: &Trace) {
    let verdict = trace.outcome.describe(engine.graph());
    let verdict = match trace.outcome {
        Outcome::Accepted => verdict.green().bold(),
        Outcome::Completed => verdict.cyan().bold(),
        _ => verdict.red().bold(),
    };
    println!("{}: {}", "Result".bold(), verdict);
    if engine.class().is_transducer() {
        println!("{}: {}", "Output".bold(), trace.output());
    }
}

/// Run command
fn cmd_run(
    path: &Path,
    word: &str,
    class: AutomatonClass,
    show_trace: bool,
    report: Option<&Path>,
) -> Result<()> {
    let engine = load_engine(path, class)?;
    let trace = engine
        .run(word)
        .with_context(|| format!("Simulation of '{word}' failed"))?;

    println!(
        "Simulating '{}' as {} ({} state(s), {} transition(s))",
        word.yellow(),
        class.to_string().green(),
        engine.graph().state_count(),
        engine.graph().transition_count(),
    );
    if show_trace {
        print_trace(&engine, &trace);
    }
    print_verdict(&engine, &trace);

    if let Some(report_path) = report {
        let file = std::fs::File::create(report_path)
            .with_context(|| format!("Could not create '{}'", report_path.display()))?;
        write_trace_report(engine.graph(), &trace, file)?;
        println!(
            "Report written to {}",
            report_path.display().to_string().cyan()
        );
    }
    Ok(())
}

/// Validate command
fn cmd_validate(path: &Path, class: AutomatonClass) -> Result<()> {
    let engine = load_engine(path, class)?;
    match validate(engine.graph(), class) {
        Ok(()) => {
            println!(
                "{}: valid {}",
                "OK".green().bold(),
                class.to_string().green()
            );
            Ok(())
        }
        Err(error) => {
            println!("{}: {}", "Invalid".red().bold(), error);
            std::process::exit(1);
        }
    }
}

/// Convert command
fn cmd_convert(input: &Path, output: &Path) -> Result<()> {
    let (states, transitions) = load_file(input)
        .with_context(|| format!("Could not read '{}'", input.display()))?;

    if FileFormat::from_path(output) == FileFormat::Jflap {
        let multi = transitions
            .iter()
            .filter(|t| t.input_symbols.len() > 1)
            .count();
        let outputs = states.iter().any(|s| !s.output_symbol.is_empty())
            || transitions.iter().any(|t| !t.output_symbol.is_empty());
        if multi > 0 {
            eprintln!(
                "{}: {} transition(s) carry several symbols; only the first survives",
                "Warning".yellow(),
                multi
            );
        }
        if outputs {
            eprintln!(
                "{}: output symbols are not representable and will be dropped",
                "Warning".yellow()
            );
        }
    }

    save_file(output, &states, &transitions)
        .with_context(|| format!("Could not write '{}'", output.display()))?;
    println!(
        "Converted {} -> {}",
        input.display().to_string().cyan(),
        output.display().to_string().cyan()
    );
    Ok(())
}

/// Info command
fn cmd_info(path: &Path) -> Result<()> {
    let engine = load_engine(path, AutomatonClass::NfaEpsilon)?;
    let graph = engine.graph();

    println!("{}: {}", "File".bold(), path.display());
    println!("{}: {}", "States".bold(), graph.state_count());
    println!("{}: {}", "Transitions".bold(), graph.transition_count());
    match graph.initial_state() {
        Some(id) => println!("{}: {}", "Initial".bold(), graph.state_name(id)),
        None => println!("{}: {}", "Initial".bold(), "none".red()),
    }
    let accepting: Vec<String> = graph
        .states()
        .filter(|(_, s)| s.is_accepting)
        .map(|(_, s)| s.name().to_string())
        .collect();
    println!(
        "{}: {}",
        "Accepting".bold(),
        if accepting.is_empty() {
            "none".to_string()
        } else {
            accepting.join(", ")
        }
    );

    // Which acceptor classes the graph is valid under, as loaded
    let valid: Vec<&str> = [
        AutomatonClass::Dfa,
        AutomatonClass::Nfa,
        AutomatonClass::NfaEpsilon,
    ]
    .iter()
    .filter(|&&class| validate(graph, class).is_ok())
    .map(|class| class.name())
    .collect();
    println!("{}: {}", "Valid as".bold(), valid.join(", "));
    Ok(())
}
