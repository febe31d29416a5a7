//! Error types for MEI conversion
//!
//! Failures fall into three families. Malformed input covers markup that cannot
//! be read or a core attribute that cannot be parsed. Structural errors mean the
//! entity graph would be inconsistent. Validation errors are entity invariants
//! violated at construction time. All three abort the conversion of one file.
//! Recoverable problems are not errors: they become
//! [`ConversionWarning`](super::types::ConversionWarning)s.

use thiserror::Error;

/// Top-level conversion error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInput),

    #[error("inconsistent score structure: {0}")]
    Structural(#[from] StructuralError),

    #[error("invalid entity: {0}")]
    Validation(#[from] ValidationError),
}

/// The markup cannot be read, or a core attribute has an unusable value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInput {
    /// XML is not well-formed
    #[error("invalid XML: {0}")]
    Xml(String),

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> attribute `{attribute}` is not an integer: {value:?}")]
    InvalidNumber {
        element: String,
        attribute: String,
        value: String,
    },

    /// Duration denominator is not positive, or the dotted value overflows
    #[error("invalid duration: denominator {denominator} with {dots} dot(s)")]
    InvalidDuration { denominator: i64, dots: u32 },
}

/// The graph being built would be inconsistent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("<{element}> found outside of any measure")]
    OutOfMeasure { element: String },

    #[error("staff {voice} referenced but only {declared} voice(s) declared")]
    VoiceIndex { voice: usize, declared: usize },

    #[error("voice {voice:?} has no first event")]
    MissingFirstEvent { voice: String },

    #[error("<{element}> found before any <staffGrp>")]
    MissingScore { element: String },
}

/// An entity invariant does not hold
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("pitch class must be one of a..g, got {0:?}")]
    PitchClass(String),

    #[error("accidental must be \"s\" or \"f\", got {0:?}")]
    Accidental(String),

    #[error("octave must be within 0..=9, got {0}")]
    Octave(i64),

    #[error("`{field}` must not be negative, got {value}")]
    NegativeField { field: &'static str, value: i64 },

    #[error("kind must be \"note\", \"rest\" or \"END\", got {0:?}")]
    Kind(String),

    #[error("a {kind} event cannot own {count} fact(s)")]
    FactCount { kind: &'static str, count: usize },
}

pub type Result<T> = std::result::Result<T, ConversionError>;
