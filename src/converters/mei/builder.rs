//! Incremental graph construction
//!
//! The builder consumes the markup stream in a single forward pass and grows
//! the score graph as tags open and close. It keeps a cursor on the current
//! measure, one "current event" per voice (so each voice chains across bars on
//! its own), and the notes of a chord that is still open.
//!
//! Tags it reacts to:
//!
//! | Tag | Boundary | Effect |
//! |---|---|---|
//! | `persName` | end | composer / collection (first one wins) |
//! | `staffGrp` | start | creates Score + TopRhythmic (first one only) |
//! | `staffDef`, `label` | start / end | declares a voice |
//! | `measure` | start | appends a measure and makes it current |
//! | `staff` | start | selects the current voice (`n`) |
//! | `chord` | start / end | collects member notes into one event |
//! | `syl` | end | syllable for the enclosing note |
//! | `note`, `rest` | end | a fact, and an event unless inside a chord |
//!
//! Notes are handled on their end tag because their `syl` child is only known
//! by then.

use log::{debug, error, warn};
use num_rational::Rational64;

use crate::models::fact::MAX_OCTAVE;
use crate::models::{
    Accidental, Event, EventLocation, Fact, Kind, Measure, NoteHead, NoteValue, Numbering,
    PitchClass, Score, Voice,
};
use crate::utils::ids::Source;

use super::errors::{MalformedInput, Result, StructuralError, ValidationError};
use super::reader::{Element, MarkupEvent, MarkupReader};
use super::types::{ConversionWarning, WarningKind};

/// Score id used when the staff group has none
pub const DEFAULT_SCORE_ID: &str = "StaffGroup1";

/// Suffix of note and rest event ids (the fact keeps the markup id)
const EVENT_SUFFIX: &str = "_event";

/// Suffix of the sentinel closing each voice
const END_SUFFIX: &str = "_END";

/// The graph of one file and what was recovered while building it
#[derive(Debug)]
pub struct BuiltGraph {
    pub score: Score,
    pub warnings: Vec<ConversionWarning>,
}

struct OpenChord {
    denominator: i64,
}

/// A `staffDef` without an id, waiting for its `label`
struct PendingStaffDef {
    n: Option<String>,
}

pub struct GraphBuilder<'n> {
    source: Source,
    numbering: &'n mut Numbering,
    verbose: bool,
    warnings: Vec<ConversionWarning>,

    composer: Option<String>,
    collection: Option<String>,
    score: Option<Score>,

    current_measure: Option<usize>,
    /// Indexed by 0-based voice; one slot per declared voice
    current_events: Vec<Option<EventLocation>>,
    /// 1-based, from the last `staff` tag
    current_voice: usize,

    pending_facts: Vec<Fact>,
    chord: Option<OpenChord>,
    pending_syllable: Option<String>,
    pending_staff_def: Option<PendingStaffDef>,
}

impl<'n> GraphBuilder<'n> {
    pub fn new(source_name: &str, numbering: &'n mut Numbering, verbose: bool) -> Self {
        Self {
            source: Source::new(source_name),
            numbering,
            verbose,
            warnings: Vec::new(),
            composer: None,
            collection: None,
            score: None,
            current_measure: None,
            current_events: Vec::new(),
            current_voice: 0,
            pending_facts: Vec::new(),
            chord: None,
            pending_syllable: None,
            pending_staff_def: None,
        }
    }

    pub fn handle(&mut self, event: MarkupEvent) -> Result<()> {
        match event {
            MarkupEvent::Start(element) => match element.tag.as_str() {
                "staffGrp" => self.start_staff_group(&element),
                "staffDef" => self.start_staff_def(&element),
                "measure" => self.start_measure(&element),
                "staff" => self.start_staff(&element),
                "chord" => self.start_chord(&element),
                _ => Ok(()),
            },
            MarkupEvent::End(element) => match element.tag.as_str() {
                "persName" => {
                    self.handle_pers_name(&element);
                    Ok(())
                }
                "label" => self.end_label(&element),
                "staffDef" => self.end_staff_def(),
                "syl" => {
                    self.pending_syllable = element.text;
                    Ok(())
                }
                "note" => self.end_note(&element),
                "rest" => self.end_rest(&element),
                "chord" => self.end_chord(&element),
                _ => Ok(()),
            },
        }
    }

    /// Close every voice with an END event and hand over the graph.
    pub fn finish(mut self) -> Result<BuiltGraph> {
        let voice_ids: Vec<String> = self
            .score
            .as_ref()
            .ok_or_else(|| StructuralError::MissingScore {
                element: "staffGrp".to_string(),
            })?
            .voices
            .iter()
            .map(|v| v.id.clone())
            .collect();

        for (index, voice_id) in voice_ids.iter().enumerate() {
            self.current_voice = index + 1;
            self.close_event(format!("{}{}", voice_id, END_SUFFIX), Kind::End, 0, 0)?;
        }

        let score = self.score.take().ok_or_else(|| StructuralError::MissingScore {
            element: "staffGrp".to_string(),
        })?;
        debug!(
            "{}: built {} voice(s), {} measure(s)",
            self.source.name(),
            score.voices.len(),
            score.measures().len()
        );

        Ok(BuiltGraph {
            score,
            warnings: self.warnings,
        })
    }

    // ------------------------------------------------------------------
    // Header and staff definitions
    // ------------------------------------------------------------------

    fn handle_pers_name(&mut self, element: &Element) {
        let text = element.text.clone().unwrap_or_default();
        match element.attribute("role") {
            Some("composer") => {
                if self.composer.is_none() {
                    self.composer = Some(text);
                }
            }
            Some("collection") => {
                if self.collection.is_none() {
                    self.collection = Some(text);
                }
            }
            role => {
                let message = format!("unknown persName role {:?}", role.unwrap_or(""));
                self.warn(WarningKind::UnknownRole, Some(&text), message);
            }
        }
    }

    fn start_staff_group(&mut self, element: &Element) -> Result<()> {
        if self.score.is_some() {
            return Ok(());
        }

        let composer = match self.composer.clone() {
            Some(composer) => composer,
            None => {
                self.warn(WarningKind::MissingComposer, None, "composer is not defined".to_string());
                String::new()
            }
        };
        let collection = match self.collection.clone() {
            Some(collection) => collection,
            None => {
                let message = format!("collection is not defined, using composer {:?}", composer);
                self.warn(WarningKind::MissingCollection, None, message);
                composer.clone()
            }
        };

        let id = element.attribute("id").unwrap_or(DEFAULT_SCORE_ID);
        self.score = Some(Score::new(&self.source, id, &composer, &collection));
        Ok(())
    }

    fn start_staff_def(&mut self, element: &Element) -> Result<()> {
        match element.attribute("id") {
            Some(id) => self.add_voice(id),
            None => {
                self.pending_staff_def = Some(PendingStaffDef {
                    n: element.attribute("n").map(str::to_string),
                });
                Ok(())
            }
        }
    }

    fn end_label(&mut self, element: &Element) -> Result<()> {
        if self.pending_staff_def.is_none() {
            return Ok(());
        }
        match element.text.as_deref() {
            Some(text) => {
                self.pending_staff_def = None;
                self.add_voice(text)
            }
            None => Ok(()),
        }
    }

    fn end_staff_def(&mut self) -> Result<()> {
        let Some(pending) = self.pending_staff_def.take() else {
            return Ok(());
        };
        if self.current_measure.is_some() {
            // Mid-score staffDef changes (key, clef, meter) redefine an existing staff
            debug!("unlabelled staffDef after the first measure, no voice added");
            return Ok(());
        }
        let ordinal = self.current_events.len() + 1;
        let id = format!("Staff{}", pending.n.unwrap_or_else(|| ordinal.to_string()));
        let message = format!("staffDef has neither id nor label, named {}", id);
        self.warn(WarningKind::UnlabelledVoice, Some(&id), message);
        self.add_voice(&id)
    }

    fn add_voice(&mut self, id: &str) -> Result<()> {
        let score = self.score.as_mut().ok_or_else(|| StructuralError::MissingScore {
            element: "staffDef".to_string(),
        })?;
        if score.has_voice(id) {
            debug!("voice {} already defined", id);
            return Ok(());
        }
        let voice = Voice::new(&self.source, id, self.numbering.next_staff());
        debug!("voice {} (staff {})", voice.id, voice.staff_number);
        score.add_voice(voice);
        self.current_events.push(None);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Music
    // ------------------------------------------------------------------

    fn start_measure(&mut self, element: &Element) -> Result<()> {
        let id = element.required("id")?;
        let score = self.score.as_mut().ok_or_else(|| StructuralError::MissingScore {
            element: "measure".to_string(),
        })?;
        let measure = Measure::new(&self.source, id, self.numbering.next_measure());
        self.current_measure = Some(score.top_rhythmic.add_measure(measure));
        Ok(())
    }

    fn start_staff(&mut self, element: &Element) -> Result<()> {
        let n = parse_int(element, "n")?;
        self.current_voice = usize::try_from(n).map_err(|_| ValidationError::NegativeField {
            field: "n",
            value: n,
        })?;
        Ok(())
    }

    fn start_chord(&mut self, element: &Element) -> Result<()> {
        let denominator = parse_int(element, "dur")?;
        self.chord = Some(OpenChord { denominator });
        Ok(())
    }

    fn end_chord(&mut self, element: &Element) -> Result<()> {
        let Some(chord) = self.chord.take() else {
            return Ok(());
        };
        let id = element.required("id")?;
        let dots = self.pending_facts.iter().map(|f| f.value.dots).max().unwrap_or(0);
        self.close_event(id.to_string(), Kind::Note, chord.denominator, dots)
    }

    fn end_note(&mut self, element: &Element) -> Result<()> {
        let id = element.required("id")?;
        let class = PitchClass::parse(element.required("pname")?)?;
        let octave = parse_int(element, "oct")?;
        if !(0..=MAX_OCTAVE as i64).contains(&octave) {
            return Err(ValidationError::Octave(octave).into());
        }
        let denominator = match &self.chord {
            Some(chord) if element.attribute("dur").is_none() => chord.denominator,
            _ => parse_int(element, "dur")?,
        };
        let dots = self.parse_dots(element);

        let head = NoteHead {
            class,
            octave: octave as u8,
            accid: element.attribute("accid").map(Accidental::parse).transpose()?,
            accid_ges: element.attribute("accid.ges").map(Accidental::parse).transpose()?,
        };
        let fact = Fact::note(&self.source, id, head, note_value(denominator, dots)?)?
            .with_syllable(self.pending_syllable.take())
            .with_grace(element.attribute("grace").map(str::to_string));
        self.pending_facts.push(fact);

        if self.chord.is_none() {
            self.close_event(format!("{}{}", id, EVENT_SUFFIX), Kind::Note, denominator, dots)?;
        }
        Ok(())
    }

    fn end_rest(&mut self, element: &Element) -> Result<()> {
        let id = element.required("id")?;
        let denominator = parse_int(element, "dur")?;
        let dots = self.parse_dots(element);

        let fact = Fact::rest(&self.source, id, note_value(denominator, dots)?)?;
        self.pending_facts.push(fact);
        self.close_event(format!("{}{}", id, EVENT_SUFFIX), Kind::Rest, denominator, dots)
    }

    /// Turn the pending facts into an event of the current voice.
    fn close_event(&mut self, id: String, kind: Kind, denominator: i64, dots: u32) -> Result<()> {
        let measure_index = self
            .current_measure
            .ok_or_else(|| StructuralError::OutOfMeasure { element: id.clone() })?;

        let declared = self.current_events.len();
        if self.current_voice == 0 || self.current_voice > declared {
            return Err(StructuralError::VoiceIndex {
                voice: self.current_voice,
                declared,
            }
            .into());
        }
        let voice_index = self.current_voice - 1;

        let score = self.score.as_mut().ok_or_else(|| StructuralError::MissingScore {
            element: id.clone(),
        })?;

        let start = self.current_events[voice_index]
            .and_then(|location| score.event(location))
            .and_then(|previous| previous.end)
            .unwrap_or_else(|| Rational64::from_integer(0));

        let facts = std::mem::take(&mut self.pending_facts);
        let event = Event::new(
            &self.source,
            id,
            kind,
            note_value(denominator, dots)?,
            start,
            self.current_voice,
            facts,
        )?;

        let index = score.top_rhythmic.measures[measure_index].add_event(voice_index, event);
        let location = EventLocation {
            measure: measure_index,
            voice: voice_index,
            index,
        };
        self.current_events[voice_index] = Some(location);

        let voice = &mut score.voices[voice_index];
        if voice.first_event().is_none() {
            voice.set_first_event(location);
        }
        Ok(())
    }

    /// Malformed dot counts are not fatal: they count as zero.
    fn parse_dots(&mut self, element: &Element) -> u32 {
        let Some(raw) = element.attribute("dots") else {
            return 0;
        };
        match raw.trim().parse::<u32>() {
            Ok(dots) => dots,
            Err(_) => {
                let id = element.attribute("id").unwrap_or(element.tag.as_str());
                let message = format!("<{}> has malformed dots {:?}, using 0", element.tag, raw);
                error!("{}: {}", self.source.name(), message);
                self.warnings
                    .push(ConversionWarning::new(WarningKind::MalformedDots, Some(id), message));
                0
            }
        }
    }

    fn warn(&mut self, kind: WarningKind, element: Option<&str>, message: String) {
        if self.verbose {
            warn!("{}: {}", self.source.name(), message);
        }
        self.warnings.push(ConversionWarning::new(kind, element, message));
    }
}

/// Build the graph of one MEI document.
pub fn build_graph(
    source_name: &str,
    mei: &str,
    numbering: &mut Numbering,
    verbose: bool,
) -> Result<BuiltGraph> {
    let mut builder = GraphBuilder::new(source_name, numbering, verbose);
    for event in MarkupReader::new(mei) {
        builder.handle(event?)?;
    }
    builder.finish()
}

fn parse_int(element: &Element, attribute: &str) -> std::result::Result<i64, MalformedInput> {
    let raw = element.required(attribute)?;
    raw.trim().parse::<i64>().map_err(|_| MalformedInput::InvalidNumber {
        element: element.tag.clone(),
        attribute: attribute.to_string(),
        value: raw.to_string(),
    })
}

fn note_value(denominator: i64, dots: u32) -> Result<NoteValue> {
    if denominator < 0 {
        return Err(ValidationError::NegativeField {
            field: "dur",
            value: denominator,
        }
        .into());
    }
    let denominator_u32 = u32::try_from(denominator)
        .map_err(|_| MalformedInput::InvalidDuration { denominator, dots })?;
    Ok(NoteValue::new(denominator_u32, dots))
}
