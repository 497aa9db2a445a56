//! Automaton class selector.

/// The class of automaton a graph is edited and simulated as.
///
/// The class determines which labels are legal (ε is forbidden for DFA
/// and NFA), whether determinism is required (DFA only), which stepping
/// algorithm runs, and how output is computed (Mealy: per transition,
/// Moore: per state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Default)]
pub enum AutomatonClass {
    /// Deterministic finite acceptor.
    ///
    /// No ε-transitions, and for every state the outgoing input-symbol
    /// sets must be pairwise disjoint. Validated before every run.
    Dfa,

    /// Nondeterministic finite acceptor without ε-transitions.
    Nfa,

    /// Nondeterministic finite acceptor with ε-transitions.
    ///
    /// This is the default class, matching a freshly opened editor.
    #[default]
    NfaEpsilon,

    /// Mealy machine: transducer emitting one output per transition.
    ///
    /// No acceptance concept; a run produces an output string.
    Mealy,

    /// Moore machine: transducer emitting one output per state, starting
    /// with the initial state's output before any input is consumed.
    Moore,
}

impl AutomatonClass {
    /// Get a human-readable name for this class
    pub fn name(&self) -> &'static str {
        match self {
            AutomatonClass::Dfa => "dfa",
            AutomatonClass::Nfa => "nfa",
            AutomatonClass::NfaEpsilon => "nfa-epsilon",
            AutomatonClass::Mealy => "mealy",
            AutomatonClass::Moore => "moore",
        }
    }

    /// Check if ε-labeled transitions are legal under this class
    pub fn allows_epsilon(&self) -> bool {
        !matches!(self, AutomatonClass::Dfa | AutomatonClass::Nfa)
    }

    /// Check if this class requires deterministic transitions
    pub fn requires_determinism(&self) -> bool {
        matches!(self, AutomatonClass::Dfa)
    }

    /// Check if this class produces an accept/reject verdict.
    ///
    /// Mealy and Moore machines only produce output; a run of either
    /// completes (or gets stuck) without a verdict.
    pub fn is_acceptor(&self) -> bool {
        !matches!(self, AutomatonClass::Mealy | AutomatonClass::Moore)
    }

    /// Check if this class emits output symbols during a run
    pub fn is_transducer(&self) -> bool {
        matches!(self, AutomatonClass::Mealy | AutomatonClass::Moore)
    }
}

impl std::fmt::Display for AutomatonClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for AutomatonClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dfa" | "afd" => Ok(AutomatonClass::Dfa),
            "nfa" | "afn" => Ok(AutomatonClass::Nfa),
            "nfa-epsilon" | "nfae" | "afne" | "nfa-e" => Ok(AutomatonClass::NfaEpsilon),
            "mealy" => Ok(AutomatonClass::Mealy),
            "moore" => Ok(AutomatonClass::Moore),
            _ => Err(format!(
                "Unknown automaton class: {}. Valid options: dfa, nfa, nfa-epsilon, mealy, moore",
                s
            )),
        }
    }
}
