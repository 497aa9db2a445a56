//! Transition records and label handling.

use super::{GraphError, StateId};

/// The distinguished symbol for a spontaneous (empty-input) transition.
pub const EPSILON: &str = "ε";

/// A directed, labeled transition between two states.
///
/// Transitions reference their endpoints by [`StateId`]; renaming a
/// state never invalidates them. The visual offset is opaque to the
/// engine and only round-tripped for the rendering layer, which uses it
/// to separate overlapping bidirectional edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Source state.
    pub origin: StateId,

    /// Target state. Equal to `origin` for a self-loop.
    pub destination: StateId,

    /// Input symbols, normalized: non-empty, deduplicated, and either
    /// exactly `["ε"]` or concrete symbols only.
    pub(crate) input_symbols: Vec<String>,

    /// Output symbol emitted when this transition fires (Mealy).
    pub output_symbol: String,

    /// Visual offset, opaque passthrough.
    pub offset: (f64, f64),
}

impl Transition {
    /// The normalized input symbol set
    pub fn input_symbols(&self) -> &[String] {
        &self.input_symbols
    }

    /// Check if this is a spontaneous (ε) transition
    pub fn is_epsilon(&self) -> bool {
        self.input_symbols.len() == 1 && self.input_symbols[0] == EPSILON
    }

    /// Check if this is a self-loop
    pub fn is_loop(&self) -> bool {
        self.origin == self.destination
    }

    /// Check if this transition fires on the given input symbol.
    ///
    /// A word is consumed one character at a time, so only single-character
    /// entries of the symbol set can ever match; ε never matches consumed
    /// input.
    pub fn accepts(&self, symbol: char) -> bool {
        if self.is_epsilon() {
            return false;
        }
        self.input_symbols.iter().any(|s| {
            let mut chars = s.chars();
            chars.next() == Some(symbol) && chars.next().is_none()
        })
    }

    /// Render the transition's label.
    ///
    /// `with_output` appends `/output` the way Mealy labels are shown.
    pub fn label(&self, with_output: bool) -> String {
        let symbols = self.input_symbols.join(",");
        if with_output && !self.output_symbol.is_empty() {
            format!("{}/{}", symbols, self.output_symbol)
        } else {
            symbols
        }
    }
}

/// Normalize a raw symbol list into a valid transition symbol set.
///
/// Entries are trimmed and deduplicated in first-seen order; an empty
/// list (or one reduced to nothing by trimming) becomes `["ε"]`. Mixing
/// ε with concrete symbols is rejected, since a transition is either
/// spontaneous or consuming, never both.
pub fn normalize_symbols<I, S>(symbols: I) -> Result<Vec<String>, GraphError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for raw in symbols {
        let symbol = raw.as_ref().trim();
        if symbol.is_empty() {
            continue;
        }
        if !normalized.iter().any(|s| s == symbol) {
            normalized.push(symbol.to_string());
        }
    }
    if normalized.is_empty() {
        return Ok(vec![EPSILON.to_string()]);
    }
    if normalized.len() > 1 && normalized.iter().any(|s| s == EPSILON) {
        return Err(GraphError::EpsilonMixed);
    }
    Ok(normalized)
}

/// Parse a user-entered transition label into symbols and output.
///
/// The format is the one the original editor prompts for: a
/// comma-separated symbol list, optionally followed by `/output` for
/// Mealy transitions (`a,b/1`). An empty symbol part means ε.
pub fn parse_label(label: &str) -> Result<(Vec<String>, String), GraphError> {
    let (symbol_part, output) = match label.split_once('/') {
        Some((symbols, output)) => (symbols, output.trim().to_string()),
        None => (label, String::new()),
    };
    let symbols = normalize_symbols(symbol_part.split(','))?;
    Ok((symbols, output))
}
