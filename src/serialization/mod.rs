//! Project persistence.
//!
//! Two formats cross this boundary: the native JSON project format and
//! the JFLAP XML interchange format. Both speak in boundary records, so
//! loading is two separate phases — parse the file into records, then
//! hand the records to [`Engine::load_graph`](crate::engine::Engine::load_graph)
//! — and a malformed file never leaves a half-populated graph behind.
//!
//! # Example
//!
//! ```rust
//! use libautomata::graph::{StateRecord, TransitionRecord};
//! use libautomata::serialization::{JsonSerializer, ProjectSerializer};
//!
//! let states = vec![StateRecord::named("q0")];
//! let transitions = vec![TransitionRecord::new("q0", "q0", ["a"])];
//!
//! let mut buffer = Vec::new();
//! JsonSerializer::save(&states, &transitions, &mut buffer).unwrap();
//! let (loaded, _) = JsonSerializer::load(&buffer[..]).unwrap();
//! assert_eq!(loaded[0].name, "q0");
//! ```

mod file_error;
mod jflap_impl;
mod json_impl;
mod report;

pub use self::file_error::{FileError, Result};
pub use self::jflap_impl::JflapSerializer;
pub use self::json_impl::JsonSerializer;
pub use self::report::write_trace_report;

use crate::graph::{StateRecord, TransitionRecord};
use std::io::{Read, Write};
use std::path::Path;

/// A format that can persist and restore a project as boundary records.
pub trait ProjectSerializer {
    /// Write the records to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or writing fails.
    fn save<W: Write>(
        states: &[StateRecord],
        transitions: &[TransitionRecord],
        writer: W,
    ) -> Result<()>;

    /// Read records from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Malformed`] (or a format-specific variant)
    /// on parse failure; nothing is partially loaded.
    fn load<R: Read>(reader: R) -> Result<(Vec<StateRecord>, Vec<TransitionRecord>)>;
}

/// The persisted formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Native JSON project format
    Json,
    /// JFLAP XML interchange format
    Jflap,
}

impl FileFormat {
    /// Pick the format from a path's extension: `.jff`/`.xml` is JFLAP,
    /// anything else is the native JSON format.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jff") | Some("xml") => FileFormat::Jflap,
            _ => FileFormat::Json,
        }
    }
}

/// Load a project file, picking the format from the extension
pub fn load_file(path: &Path) -> Result<(Vec<StateRecord>, Vec<TransitionRecord>)> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    match FileFormat::from_path(path) {
        FileFormat::Json => JsonSerializer::load(reader),
        FileFormat::Jflap => JflapSerializer::load(reader),
    }
}

/// Save a project file, picking the format from the extension
pub fn save_file(
    path: &Path,
    states: &[StateRecord],
    transitions: &[TransitionRecord],
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    match FileFormat::from_path(path) {
        FileFormat::Json => JsonSerializer::save(states, transitions, writer),
        FileFormat::Jflap => JflapSerializer::save(states, transitions, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.jff")), FileFormat::Jflap);
        assert_eq!(FileFormat::from_path(Path::new("a.xml")), FileFormat::Jflap);
        assert_eq!(FileFormat::from_path(Path::new("a.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("project")), FileFormat::Json);
    }
}
