//! Fact nodes: one sounding note or one rest

use num_rational::Rational64;

use crate::converters::mei::errors::{ConversionError, ValidationError};
use crate::utils::ids::Source;

use super::node::{GraphNode, Properties, PropertyValue};
use super::pitch::{self, Accidental, Pitch, PitchClass};
use super::rhythm::NoteValue;
use super::Kind;

/// Highest octave accepted on a note
pub const MAX_OCTAVE: u8 = 9;

/// Spelling of a notated pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteHead {
    pub class: PitchClass,
    pub octave: u8,
    pub accid: Option<Accidental>,
    pub accid_ges: Option<Accidental>,
}

impl NoteHead {
    /// Sounding pitch: the written accidental wins over the gestural one.
    pub fn pitch(&self) -> Pitch {
        Pitch::new(self.class, self.octave as i32).with_accidental(self.accid.or(self.accid_ges))
    }

    /// Uppercase class followed by octave, e.g. `C4`
    pub fn name(&self) -> String {
        format!("{}{}", self.class.as_str().to_ascii_uppercase(), self.octave)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sound {
    Note(NoteHead),
    Rest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub id: String,
    pub graph_id: String,
    pub source: String,
    pub sound: Sound,
    pub value: NoteValue,
    pub duration: Rational64,
    pub syllable: Option<String>,
    pub grace: Option<String>,
}

impl Fact {
    pub fn note(
        source: &Source,
        id: impl Into<String>,
        head: NoteHead,
        value: NoteValue,
    ) -> Result<Self, ConversionError> {
        Self::new(source, id.into(), Sound::Note(head), value)
    }

    pub fn rest(source: &Source, id: impl Into<String>, value: NoteValue) -> Result<Self, ConversionError> {
        Self::new(source, id.into(), Sound::Rest, value)
    }

    fn new(source: &Source, id: String, sound: Sound, value: NoteValue) -> Result<Self, ConversionError> {
        if let Sound::Note(head) = &sound {
            if head.octave > MAX_OCTAVE {
                return Err(ValidationError::Octave(head.octave as i64).into());
            }
        }
        let duration = value.duration()?;

        Ok(Self {
            graph_id: source.graph_id(&id),
            source: source.name().to_string(),
            id,
            sound,
            value,
            duration,
            syllable: None,
            grace: None,
        })
    }

    pub fn with_syllable(mut self, syllable: Option<String>) -> Self {
        self.syllable = syllable;
        self
    }

    pub fn with_grace(mut self, grace: Option<String>) -> Self {
        self.grace = grace;
        self
    }

    pub fn kind(&self) -> Kind {
        match self.sound {
            Sound::Note(_) => Kind::Note,
            Sound::Rest => Kind::Rest,
        }
    }

    pub fn head(&self) -> Option<&NoteHead> {
        match &self.sound {
            Sound::Note(head) => Some(head),
            Sound::Rest => None,
        }
    }

    pub fn pitch(&self) -> Option<Pitch> {
        self.head().map(NoteHead::pitch)
    }

    pub fn frequency(&self) -> Option<f64> {
        self.pitch().map(|p| pitch::frequency(&p))
    }

    /// Signed semitone offset from A4 (notes only)
    pub fn half_tones_from_a4(&self) -> Option<i32> {
        self.pitch().map(|p| pitch::semitone_interval(&Pitch::A4, &p))
    }
}

impl GraphNode for Fact {
    const LABEL: &'static str = "Fact";

    fn graph_id(&self) -> &str {
        &self.graph_id
    }

    fn properties(&self) -> Properties {
        let head = self.head();
        vec![
            ("id", self.id.as_str().into()),
            ("source", self.source.as_str().into()),
            ("type", self.kind().as_str().into()),
            ("class", PropertyValue::optional_text(head.map(|h| h.class.as_str()))),
            ("octave", head.map(|h| PropertyValue::Int(h.octave as i64)).unwrap_or(PropertyValue::Null)),
            ("name", head.map(|h| PropertyValue::Text(h.name())).unwrap_or(PropertyValue::Null)),
            ("dur", self.value.denominator.into()),
            ("dots", self.value.dots.into()),
            ("duration", PropertyValue::ratio(self.duration)),
            ("accid", PropertyValue::optional_text(head.and_then(|h| h.accid).map(Accidental::as_str))),
            ("accid_ges", PropertyValue::optional_text(head.and_then(|h| h.accid_ges).map(Accidental::as_str))),
            ("frequency", PropertyValue::optional_float(self.frequency())),
            (
                "half_tones_from_a4",
                self.half_tones_from_a4()
                    .map(|n| PropertyValue::Int(n as i64))
                    .unwrap_or(PropertyValue::Null),
            ),
            ("syllable", PropertyValue::optional_text(self.syllable.as_deref())),
            ("grace", PropertyValue::optional_text(self.grace.as_deref())),
        ]
    }
}

/// The chord member with the lowest frequency.
///
/// A single fact is returned as is, without computing its frequency. Rests
/// sort after every note.
pub fn lowest_fact(facts: &[Fact]) -> Option<&Fact> {
    if facts.len() == 1 {
        return facts.first();
    }
    facts.iter().min_by(|a, b| {
        let fa = a.frequency().unwrap_or(f64::INFINITY);
        let fb = b.frequency().unwrap_or(f64::INFINITY);
        fa.total_cmp(&fb)
    })
}
