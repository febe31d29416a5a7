//! Score and TopRhythmic nodes
//!
//! The score is the root of the graph. It owns its voices and the single
//! TopRhythmic, which owns the measures, which own the events.

use crate::utils::ids::Source;

use super::event::Event;
use super::measure::Measure;
use super::node::{GraphNode, Properties};
use super::voice::{EventLocation, Voice};

/// Shared measure timeline of all voices
#[derive(Debug, Clone, PartialEq)]
pub struct TopRhythmic {
    pub graph_id: String,
    pub source: String,
    pub composer: String,
    pub collection: String,
    pub measures: Vec<Measure>,
}

impl TopRhythmic {
    pub const ID: &'static str = "top";
    pub const NAME: &'static str = "topRhythmic";

    pub fn new(source: &Source, composer: &str, collection: &str) -> Self {
        Self {
            graph_id: source.graph_id(Self::ID),
            source: source.name().to_string(),
            composer: composer.to_string(),
            collection: collection.to_string(),
            measures: Vec::new(),
        }
    }

    /// Append a measure; returns its index.
    pub fn add_measure(&mut self, measure: Measure) -> usize {
        self.measures.push(measure);
        self.measures.len() - 1
    }

    pub fn event(&self, location: EventLocation) -> Option<&Event> {
        self.measures
            .get(location.measure)?
            .events_for(location.voice)
            .get(location.index)
    }

    /// Last event of a voice in the closest measure before `measure_index`
    /// that has any event for it.
    pub fn last_event_before(&self, measure_index: usize, voice_index: usize) -> Option<&Event> {
        self.measures[..measure_index.min(self.measures.len())]
            .iter()
            .rev()
            .find_map(|m| m.events_for(voice_index).last())
    }
}

impl GraphNode for TopRhythmic {
    const LABEL: &'static str = "TopRhythmic";

    fn graph_id(&self) -> &str {
        &self.graph_id
    }

    fn properties(&self) -> Properties {
        vec![
            ("id", Self::ID.into()),
            ("name", Self::NAME.into()),
            ("source", self.source.as_str().into()),
            ("composer", self.composer.as_str().into()),
            ("collection", self.collection.as_str().into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub id: String,
    pub graph_id: String,
    pub source: String,
    pub composer: String,
    pub collection: String,
    pub voices: Vec<Voice>,
    pub top_rhythmic: TopRhythmic,
}

impl Score {
    /// Creates the score together with its TopRhythmic.
    pub fn new(source: &Source, id: impl Into<String>, composer: &str, collection: &str) -> Self {
        let id = id.into();
        Self {
            graph_id: source.graph_id(&id),
            source: source.name().to_string(),
            id,
            composer: composer.to_string(),
            collection: collection.to_string(),
            voices: Vec::new(),
            top_rhythmic: TopRhythmic::new(source, composer, collection),
        }
    }

    pub fn add_voice(&mut self, voice: Voice) {
        self.voices.push(voice);
    }

    /// Whether a voice with this markup id (spaces read as underscores) exists.
    pub fn has_voice(&self, id: &str) -> bool {
        let id = id.replace(' ', "_");
        self.voices.iter().any(|voice| voice.id == id)
    }

    pub fn measures(&self) -> &[Measure] {
        &self.top_rhythmic.measures
    }

    pub fn event(&self, location: EventLocation) -> Option<&Event> {
        self.top_rhythmic.event(location)
    }
}

impl GraphNode for Score {
    const LABEL: &'static str = "Score";

    fn graph_id(&self) -> &str {
        &self.graph_id
    }

    fn properties(&self) -> Properties {
        vec![
            ("id", self.id.as_str().into()),
            ("source", self.source.as_str().into()),
            ("composer", self.composer.as_str().into()),
            ("collection", self.collection.as_str().into()),
        ]
    }
}
