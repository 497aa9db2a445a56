//! Native project format: a JSON object with `states` and `transitions`.

use super::file_error::Result;
use super::ProjectSerializer;
use crate::graph::{StateRecord, TransitionRecord};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// The on-disk shape of a project file.
#[derive(Debug, Serialize, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    states: Vec<StateRecord>,
    #[serde(default)]
    transitions: Vec<TransitionRecord>,
}

/// Serializer for the native JSON project format.
///
/// Layout fields (`x`, `y`, offsets) round-trip untouched; the engine
/// never interprets them.
pub struct JsonSerializer;

impl ProjectSerializer for JsonSerializer {
    fn save<W: Write>(
        states: &[StateRecord],
        transitions: &[TransitionRecord],
        writer: W,
    ) -> Result<()> {
        let file = ProjectFile {
            states: states.to_vec(),
            transitions: transitions.to_vec(),
        };
        serde_json::to_writer_pretty(writer, &file)?;
        Ok(())
    }

    fn load<R: Read>(reader: R) -> Result<(Vec<StateRecord>, Vec<TransitionRecord>)> {
        let file: ProjectFile = serde_json::from_reader(reader)?;
        Ok((file.states, file.transitions))
    }
}
