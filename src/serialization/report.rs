//! CSV simulation reports.
//!
//! Flattens a [`Trace`] into a step table, one row per step, with a
//! final summary row carrying the outcome.

use super::file_error::Result;
use crate::graph::Graph;
use crate::simulation::Trace;
use std::io::Write;

/// Write a trace as a CSV step table.
///
/// Columns: step index, the configuration before, the consumed symbol
/// (`-` for the Moore bootstrap emission), the emitted output, and the
/// configuration after. A last row summarizes the outcome.
pub fn write_trace_report<W: Write>(graph: &Graph, trace: &Trace, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Step", "Current State", "Symbol Read", "Output Emitted", "Next State"])?;
    for step in &trace.steps {
        csv.write_record([
            step.index.to_string(),
            step.before.describe(graph),
            step.symbol.map(String::from).unwrap_or_else(|| "-".into()),
            step.output.clone(),
            step.after.describe(graph),
        ])?;
    }
    csv.write_record([
        "Result".to_string(),
        trace.outcome.describe(graph),
        trace.word.clone(),
        trace.output(),
        String::new(),
    ])?;
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonClass;
    use crate::simulation::simulate;

    #[test]
    fn test_report_has_one_row_per_step_plus_summary() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        let q1 = graph.add_state(None).unwrap();
        graph.toggle_accepting(q1).unwrap();
        graph
            .add_transition(q0, q1, vec!["a".into()], String::new())
            .unwrap();
        graph
            .add_transition(q1, q1, vec!["a".into()], String::new())
            .unwrap();

        let trace = simulate(&graph, AutomatonClass::Dfa, "aa").unwrap();
        let mut buffer = Vec::new();
        write_trace_report(&graph, &trace, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4); // header + 2 steps + summary
        assert!(lines[0].starts_with("Step,"));
        assert!(lines[1].contains("[q0]"));
        assert!(lines[3].contains("accepted"));
    }

    #[test]
    fn test_moore_bootstrap_row_has_no_symbol() {
        let mut graph = Graph::new();
        let q0 = graph.add_state(None).unwrap();
        graph.set_state_output(q0, "x".into()).unwrap();

        let trace = simulate(&graph, AutomatonClass::Moore, "").unwrap();
        let mut buffer = Vec::new();
        write_trace_report(&graph, &trace, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.lines().nth(1).unwrap().contains(",-,"));
    }
}
