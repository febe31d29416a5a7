//! Measure nodes
//!
//! A measure keeps its events voice-major: `events[voice_index]` is the ordered
//! list of events that voice plays in the bar. Voices without events in the bar
//! have an empty list; rows are added lazily as higher voices show up.

use crate::utils::ids::Source;

use super::event::Event;
use super::node::{GraphNode, Properties};

#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub id: String,
    pub graph_id: String,
    pub source: String,
    /// 1-based position in the score
    pub number: u32,
    events: Vec<Vec<Event>>,
}

impl Measure {
    pub fn new(source: &Source, id: impl Into<String>, number: u32) -> Self {
        let id = id.into();
        Self {
            graph_id: source.graph_id(&id),
            source: source.name().to_string(),
            id,
            number,
            events: Vec::new(),
        }
    }

    /// Append an event to a voice (0-based); returns its index in that voice.
    pub fn add_event(&mut self, voice_index: usize, event: Event) -> usize {
        if self.events.len() <= voice_index {
            self.events.resize_with(voice_index + 1, Vec::new);
        }
        let row = &mut self.events[voice_index];
        row.push(event);
        row.len() - 1
    }

    pub fn events_for(&self, voice_index: usize) -> &[Event] {
        self.events.get(voice_index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows in voice order, including empty ones
    pub fn voices(&self) -> impl Iterator<Item = &[Event]> {
        self.events.iter().map(Vec::as_slice)
    }

    pub fn event_count(&self) -> usize {
        self.events.iter().map(Vec::len).sum()
    }
}

impl GraphNode for Measure {
    const LABEL: &'static str = "Measure";

    fn graph_id(&self) -> &str {
        &self.graph_id
    }

    fn properties(&self) -> Properties {
        vec![
            ("id", self.id.as_str().into()),
            ("source", self.source.as_str().into()),
            ("number", self.number.into()),
        ]
    }
}
