//! Voice nodes: one staff of the score

use crate::utils::ids::Source;

use super::node::{GraphNode, Properties};

/// Where an event lives: measure index, 0-based voice index, index in that voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventLocation {
    pub measure: usize,
    pub voice: usize,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub id: String,
    pub graph_id: String,
    pub source: String,
    pub staff_number: u32,
    /// Refers into the measures; the measure owns the event
    first_event: Option<EventLocation>,
}

impl Voice {
    /// Spaces in `id` become underscores.
    pub fn new(source: &Source, id: &str, staff_number: u32) -> Self {
        let id = id.replace(' ', "_");
        Self {
            graph_id: source.graph_id(&id),
            source: source.name().to_string(),
            id,
            staff_number,
            first_event: None,
        }
    }

    pub fn first_event(&self) -> Option<EventLocation> {
        self.first_event
    }

    pub fn set_first_event(&mut self, location: EventLocation) {
        self.first_event = Some(location);
    }
}

impl GraphNode for Voice {
    const LABEL: &'static str = "Voice";

    fn graph_id(&self) -> &str {
        &self.graph_id
    }

    fn properties(&self) -> Properties {
        vec![
            ("id", self.id.as_str().into()),
            ("source", self.source.as_str().into()),
            ("staff_number", self.staff_number.into()),
        ]
    }
}
