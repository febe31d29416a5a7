//! Event nodes: one time slot in one voice
//!
//! An event owns the facts sounding in its slot: one for a note or rest,
//! several for a chord, none for the END sentinel that closes a voice.

use num_rational::Rational64;
use num_traits::CheckedAdd;

use crate::converters::mei::errors::{ConversionError, MalformedInput, ValidationError};
use crate::utils::ids::Source;

use super::fact::{lowest_fact, Fact};
use super::node::{GraphNode, Properties, PropertyValue};
use super::rhythm::NoteValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Note,
    Rest,
    /// Terminal sentinel of a voice's NEXT chain
    End,
}

impl Kind {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "note" => Ok(Kind::Note),
            "rest" => Ok(Kind::Rest),
            "END" => Ok(Kind::End),
            other => Err(ValidationError::Kind(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Note => "note",
            Kind::Rest => "rest",
            Kind::End => "END",
        }
    }

    fn accepts_fact_count(self, count: usize) -> bool {
        match self {
            Kind::Note => count >= 1,
            Kind::Rest => count == 1,
            Kind::End => count == 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub graph_id: String,
    pub source: String,
    pub kind: Kind,
    pub value: NoteValue,
    pub start: Rational64,
    /// `None` for END
    pub end: Option<Rational64>,
    pub duration: Option<Rational64>,
    /// 1-based staff number
    pub voice: usize,
    pub facts: Vec<Fact>,
}

impl Event {
    pub fn new(
        source: &Source,
        id: impl Into<String>,
        kind: Kind,
        value: NoteValue,
        start: Rational64,
        voice: usize,
        facts: Vec<Fact>,
    ) -> Result<Self, ConversionError> {
        if !kind.accepts_fact_count(facts.len()) {
            return Err(ValidationError::FactCount {
                kind: kind.as_str(),
                count: facts.len(),
            }
            .into());
        }

        let duration = match kind {
            Kind::End => None,
            Kind::Note | Kind::Rest => Some(value.duration()?),
        };
        let end = match duration {
            Some(d) => Some(start.checked_add(&d).ok_or(MalformedInput::InvalidDuration {
                denominator: value.denominator as i64,
                dots: value.dots,
            })?),
            None => None,
        };
        let id = id.into();

        Ok(Self {
            graph_id: source.graph_id(&id),
            source: source.name().to_string(),
            id,
            kind,
            value,
            start,
            end,
            duration,
            voice,
            facts,
        })
    }

    /// Terminal event closing a voice's chain
    pub fn end_of_voice(
        source: &Source,
        id: impl Into<String>,
        start: Rational64,
        voice: usize,
    ) -> Result<Self, ConversionError> {
        Self::new(source, id, Kind::End, NoteValue::default(), start, voice, Vec::new())
    }

    /// The fact NEXT links measure intervals against
    pub fn first_fact(&self) -> Option<&Fact> {
        self.facts.first()
    }

    pub fn lowest_fact(&self) -> Option<&Fact> {
        lowest_fact(&self.facts)
    }
}

impl GraphNode for Event {
    const LABEL: &'static str = "Event";

    fn graph_id(&self) -> &str {
        &self.graph_id
    }

    fn properties(&self) -> Properties {
        vec![
            ("id", self.id.as_str().into()),
            ("source", self.source.as_str().into()),
            ("type", self.kind.as_str().into()),
            ("dur", self.value.denominator.into()),
            ("dots", self.value.dots.into()),
            ("duration", PropertyValue::optional_ratio(self.duration)),
            ("start", PropertyValue::ratio(self.start)),
            ("end", PropertyValue::optional_ratio(self.end)),
            ("voice", self.voice.into()),
        ]
    }
}
