//! JFLAP interchange format (`.jff`).
//!
//! The XML tree is `<structure><type>fa</type><automaton>` holding
//! `<state>` and `<transition>` elements. The format is strictly
//! narrower than the native one: a transition carries a single `<read>`
//! symbol (absent or empty ⇒ ε) and states have no output symbols, so
//! export keeps only the first input symbol of each transition and
//! drops Mealy/Moore outputs. This is a known lossy boundary.

use super::file_error::{FileError, Result};
use super::ProjectSerializer;
use crate::graph::{StateRecord, TransitionRecord, EPSILON};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use rustc_hash::FxHashMap;
use std::io::{Read, Write};

/// Serializer for the JFLAP `.jff` interchange format.
pub struct JflapSerializer;

/// A `<state>` element while it is being parsed.
#[derive(Default)]
struct PendingState {
    id: Option<u32>,
    name: Option<String>,
    x: f64,
    y: f64,
    initial: bool,
    accepting: bool,
}

/// A `<transition>` element while it is being parsed.
#[derive(Default)]
struct PendingTransition {
    from: Option<u32>,
    to: Option<u32>,
    read: Option<String>,
}

/// Which leaf element the parser is currently inside.
#[derive(Clone, Copy, PartialEq)]
enum Field {
    None,
    X,
    Y,
    From,
    To,
    Read,
}

fn malformed(message: impl Into<String>) -> FileError {
    FileError::Malformed(message.into())
}

fn parse_number<T: std::str::FromStr>(text: &str, what: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| malformed(format!("invalid {what}: '{text}'")))
}

impl ProjectSerializer for JflapSerializer {
    fn save<W: Write>(
        states: &[StateRecord],
        transitions: &[TransitionRecord],
        writer: W,
    ) -> Result<()> {
        let mut writer = Writer::new_with_indent(writer, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("structure")))?;
        writer.write_event(Event::Start(BytesStart::new("type")))?;
        writer.write_event(Event::Text(BytesText::new("fa")))?;
        writer.write_event(Event::End(BytesEnd::new("type")))?;
        writer.write_event(Event::Start(BytesStart::new("automaton")))?;

        let ids: FxHashMap<&str, usize> = states
            .iter()
            .enumerate()
            .map(|(index, state)| (state.name.as_str(), index))
            .collect();

        for (index, state) in states.iter().enumerate() {
            let mut element = BytesStart::new("state");
            element.push_attribute(("id", index.to_string().as_str()));
            element.push_attribute(("name", state.name.as_str()));
            writer.write_event(Event::Start(element))?;

            writer.write_event(Event::Start(BytesStart::new("x")))?;
            writer.write_event(Event::Text(BytesText::new(&state.x.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("x")))?;
            writer.write_event(Event::Start(BytesStart::new("y")))?;
            writer.write_event(Event::Text(BytesText::new(&state.y.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("y")))?;
            if state.initial {
                writer.write_event(Event::Empty(BytesStart::new("initial")))?;
            }
            if state.accepting {
                writer.write_event(Event::Empty(BytesStart::new("final")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("state")))?;
        }

        for transition in transitions {
            let from = ids
                .get(transition.origin.as_str())
                .ok_or_else(|| malformed(format!("unknown origin '{}'", transition.origin)))?;
            let to = ids
                .get(transition.destination.as_str())
                .ok_or_else(|| {
                    malformed(format!("unknown destination '{}'", transition.destination))
                })?;
            // Lossy: only the first symbol survives, outputs are gone.
            let symbol = transition
                .input_symbols
                .first()
                .map(String::as_str)
                .unwrap_or(EPSILON);

            writer.write_event(Event::Start(BytesStart::new("transition")))?;
            writer.write_event(Event::Start(BytesStart::new("from")))?;
            writer.write_event(Event::Text(BytesText::new(&from.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("from")))?;
            writer.write_event(Event::Start(BytesStart::new("to")))?;
            writer.write_event(Event::Text(BytesText::new(&to.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("to")))?;
            if symbol == EPSILON {
                writer.write_event(Event::Empty(BytesStart::new("read")))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new("read")))?;
                writer.write_event(Event::Text(BytesText::new(symbol)))?;
                writer.write_event(Event::End(BytesEnd::new("read")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("transition")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("automaton")))?;
        writer.write_event(Event::End(BytesEnd::new("structure")))?;
        Ok(())
    }

    fn load<R: Read>(mut reader: R) -> Result<(Vec<StateRecord>, Vec<TransitionRecord>)> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let mut xml = Reader::from_str(&text);
        xml.config_mut().trim_text(true);

        let mut states: Vec<(u32, StateRecord)> = Vec::new();
        let mut transitions: Vec<PendingTransition> = Vec::new();
        let mut state: Option<PendingState> = None;
        let mut transition: Option<PendingTransition> = None;
        let mut field = Field::None;

        loop {
            match xml.read_event()? {
                Event::Start(element) | Event::Empty(element) => {
                    match element.name().as_ref() {
                        b"state" => {
                            let mut pending = PendingState::default();
                            for attribute in element.attributes() {
                                let attribute =
                                    attribute.map_err(|e| malformed(e.to_string()))?;
                                let value = attribute
                                    .unescape_value()
                                    .map_err(|e| malformed(e.to_string()))?;
                                match attribute.key.as_ref() {
                                    b"id" => {
                                        pending.id = Some(parse_number(&value, "state id")?)
                                    }
                                    b"name" => pending.name = Some(value.into_owned()),
                                    _ => {}
                                }
                            }
                            state = Some(pending);
                        }
                        b"transition" => transition = Some(PendingTransition::default()),
                        b"x" => field = Field::X,
                        b"y" => field = Field::Y,
                        b"from" => field = Field::From,
                        b"to" => field = Field::To,
                        b"read" => field = Field::Read,
                        b"initial" => {
                            if let Some(pending) = state.as_mut() {
                                pending.initial = true;
                            }
                        }
                        b"final" => {
                            if let Some(pending) = state.as_mut() {
                                pending.accepting = true;
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(content) => {
                    let value = content.unescape().map_err(|e| malformed(e.to_string()))?;
                    match (field, state.as_mut(), transition.as_mut()) {
                        (Field::X, Some(pending), _) => {
                            pending.x = parse_number(&value, "x coordinate")?
                        }
                        (Field::Y, Some(pending), _) => {
                            pending.y = parse_number(&value, "y coordinate")?
                        }
                        (Field::From, _, Some(pending)) => {
                            pending.from = Some(parse_number(&value, "transition origin")?)
                        }
                        (Field::To, _, Some(pending)) => {
                            pending.to = Some(parse_number(&value, "transition destination")?)
                        }
                        (Field::Read, _, Some(pending)) => {
                            pending.read = Some(value.into_owned())
                        }
                        _ => {}
                    }
                }
                Event::End(element) => match element.name().as_ref() {
                    b"state" => {
                        let pending = state
                            .take()
                            .ok_or_else(|| malformed("unexpected </state>"))?;
                        let id = pending
                            .id
                            .ok_or_else(|| malformed("state without an id"))?;
                        let name = pending.name.unwrap_or_else(|| format!("q{id}"));
                        states.push((
                            id,
                            StateRecord {
                                name,
                                x: pending.x,
                                y: pending.y,
                                initial: pending.initial,
                                accepting: pending.accepting,
                                output_symbol: String::new(),
                            },
                        ));
                    }
                    b"transition" => {
                        transitions.push(
                            transition
                                .take()
                                .ok_or_else(|| malformed("unexpected </transition>"))?,
                        );
                    }
                    b"x" | b"y" | b"from" | b"to" | b"read" => field = Field::None,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        let names: FxHashMap<u32, &str> = states
            .iter()
            .map(|(id, record)| (*id, record.name.as_str()))
            .collect();

        let mut transition_records = Vec::with_capacity(transitions.len());
        for pending in transitions {
            let from = pending
                .from
                .ok_or_else(|| malformed("transition without <from>"))?;
            let to = pending
                .to
                .ok_or_else(|| malformed("transition without <to>"))?;
            let origin = *names
                .get(&from)
                .ok_or_else(|| malformed(format!("transition references unknown state {from}")))?;
            let destination = *names
                .get(&to)
                .ok_or_else(|| malformed(format!("transition references unknown state {to}")))?;
            // Absent or empty <read> means a spontaneous transition.
            let symbol = match pending.read {
                Some(read) if !read.trim().is_empty() => read.trim().to_string(),
                _ => EPSILON.to_string(),
            };
            transition_records.push(TransitionRecord::new(origin, destination, [symbol]));
        }

        let state_records = states.into_iter().map(|(_, record)| record).collect();
        Ok((state_records, transition_records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<structure>
  <type>fa</type>
  <automaton>
    <state id="0" name="q0">
      <x>50.0</x>
      <y>50.0</y>
      <initial/>
    </state>
    <state id="1" name="q1">
      <x>150.0</x>
      <y>50.0</y>
      <final/>
    </state>
    <transition>
      <from>0</from>
      <to>1</to>
      <read>a</read>
    </transition>
    <transition>
      <from>1</from>
      <to>0</to>
      <read/>
    </transition>
  </automaton>
</structure>"#;

    #[test]
    fn test_load_sample_file() {
        let (states, transitions) = JflapSerializer::load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(states.len(), 2);
        assert!(states[0].initial);
        assert!(states[1].accepting);
        assert_eq!(states[1].x, 150.0);

        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].input_symbols, vec!["a".to_string()]);
        // Empty <read/> is a spontaneous transition.
        assert_eq!(transitions[1].input_symbols, vec![EPSILON.to_string()]);
        assert_eq!(transitions[1].origin, "q1");
    }

    #[test]
    fn test_export_is_lossy_first_symbol_only() {
        let states = vec![StateRecord::named("q0")];
        let transitions =
            vec![TransitionRecord::new("q0", "q0", ["a", "b"]).with_output("ignored")];

        let mut buffer = Vec::new();
        JflapSerializer::save(&states, &transitions, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("<read>a</read>"));
        assert!(!text.contains('b'));
        assert!(!text.contains("ignored"));
    }

    #[test]
    fn test_roundtrip_single_symbol_automaton() {
        let states = vec![
            StateRecord {
                name: "start".into(),
                x: 1.0,
                y: 2.0,
                initial: true,
                accepting: false,
                output_symbol: String::new(),
            },
            StateRecord {
                name: "done".into(),
                x: 3.0,
                y: 4.0,
                initial: false,
                accepting: true,
                output_symbol: String::new(),
            },
        ];
        let transitions = vec![TransitionRecord::new("start", "done", ["x"])];

        let mut buffer = Vec::new();
        JflapSerializer::save(&states, &transitions, &mut buffer).unwrap();
        let (loaded_states, loaded_transitions) =
            JflapSerializer::load(&buffer[..]).unwrap();
        assert_eq!(loaded_states, states);
        assert_eq!(loaded_transitions, transitions);
    }

    #[test]
    fn test_unnamed_state_gets_default_name() {
        let text = r#"<structure><automaton>
            <state id="7"><x>0</x><y>0</y><initial/></state>
        </automaton></structure>"#;
        let (states, _) = JflapSerializer::load(text.as_bytes()).unwrap();
        assert_eq!(states[0].name, "q7");
    }

    #[test]
    fn test_entities_are_unescaped_on_load() {
        let text = r#"<structure><automaton>
            <state id="0" name="a&amp;b"><x>0</x><y>0</y><initial/></state>
            <transition><from>0</from><to>0</to><read>&lt;</read></transition>
        </automaton></structure>"#;
        let (states, transitions) = JflapSerializer::load(text.as_bytes()).unwrap();
        assert_eq!(states[0].name, "a&b");
        assert_eq!(transitions[0].input_symbols, vec!["<".to_string()]);
    }

    #[test]
    fn test_dangling_transition_is_malformed() {
        let text = r#"<structure><automaton>
            <state id="0" name="q0"><x>0</x><y>0</y></state>
            <transition><from>0</from><to>9</to><read>a</read></transition>
        </automaton></structure>"#;
        assert!(matches!(
            JflapSerializer::load(text.as_bytes()),
            Err(FileError::Malformed(_))
        ));
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let text = "<structure><automaton><state id=\"0\"";
        assert!(JflapSerializer::load(text.as_bytes()).is_err());
    }
}
