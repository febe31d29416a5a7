//! Pitch spelling and pitch math
//!
//! Pitches are compared on a sharp-only twelve-tone scale
//! (`c, c#, d, d#, e, f, f#, g, g#, a, a#, b`). Flats are rewritten to the
//! enharmonic sharp below, and the octave number changes at C, as in scientific
//! pitch notation, so `Cb4` sounds as `B3`.

use crate::converters::mei::errors::ValidationError;

/// Concert pitch of A4 in Hz
pub const A4_FREQUENCY: f64 = 440.0;

/// Diatonic pitch class (MEI `pname`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PitchClass {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "c" => Ok(PitchClass::C),
            "d" => Ok(PitchClass::D),
            "e" => Ok(PitchClass::E),
            "f" => Ok(PitchClass::F),
            "g" => Ok(PitchClass::G),
            "a" => Ok(PitchClass::A),
            "b" => Ok(PitchClass::B),
            other => Err(ValidationError::PitchClass(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PitchClass::C => "c",
            PitchClass::D => "d",
            PitchClass::E => "e",
            PitchClass::F => "f",
            PitchClass::G => "g",
            PitchClass::A => "a",
            PitchClass::B => "b",
        }
    }

    /// Index of the natural note in the sharp-only scale starting at C.
    pub fn semitones_above_c(self) -> i32 {
        match self {
            PitchClass::C => 0,
            PitchClass::D => 2,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::G => 7,
            PitchClass::A => 9,
            PitchClass::B => 11,
        }
    }
}

/// Written or gestural accidental (MEI `accid` / `accid.ges`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "s" => Ok(Accidental::Sharp),
            "f" => Ok(Accidental::Flat),
            other => Err(ValidationError::Accidental(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Accidental::Sharp => "s",
            Accidental::Flat => "f",
        }
    }

    pub fn alteration(self) -> i32 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// A sounding pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub class: PitchClass,
    pub accidental: Option<Accidental>,
    pub octave: i32,
}

impl Pitch {
    pub const A4: Pitch = Pitch {
        class: PitchClass::A,
        accidental: None,
        octave: 4,
    };

    pub fn new(class: PitchClass, octave: i32) -> Self {
        Self {
            class,
            accidental: None,
            octave,
        }
    }

    pub fn with_accidental(mut self, accidental: Option<Accidental>) -> Self {
        self.accidental = accidental;
        self
    }

    /// Position on the sharp-only scale, counted from C0.
    fn chromatic_index(&self) -> i32 {
        let alteration = self.accidental.map(Accidental::alteration).unwrap_or(0);
        12 * self.octave + self.class.semitones_above_c() + alteration
    }
}

/// Signed number of semitones from `from` up to `to`.
pub fn semitone_interval(from: &Pitch, to: &Pitch) -> i32 {
    to.chromatic_index() - from.chromatic_index()
}

/// Frequency in Hz, equal temperament tuned to A4 = 440 Hz.
pub fn frequency(pitch: &Pitch) -> f64 {
    let n = semitone_interval(&Pitch::A4, pitch);
    A4_FREQUENCY * 2f64.powf(n as f64 / 12.0)
}
