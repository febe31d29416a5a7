//! Note values and their durations
//!
//! Durations and positions are exact rationals in whole-note units: a quarter
//! note lasts `1/4`, a dotted quarter `3/8`.

use crate::converters::mei::errors::MalformedInput;
use num_rational::Rational64;

/// Written note value: base denominator (4 = quarter) plus augmentation dots.
///
/// Terminal END events use denominator 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NoteValue {
    pub denominator: u32,
    pub dots: u32,
}

impl NoteValue {
    pub fn new(denominator: u32, dots: u32) -> Self {
        Self { denominator, dots }
    }

    pub fn duration(&self) -> Result<Rational64, MalformedInput> {
        note_duration(self.denominator as i64, self.dots)
    }
}

/// `1/d + Σ_{k=1..dots} 1/(d·2^k)`, i.e. `(2^(dots+1) - 1) / (d·2^dots)`.
pub fn note_duration(denominator: i64, dots: u32) -> Result<Rational64, MalformedInput> {
    let invalid = MalformedInput::InvalidDuration { denominator, dots };
    if denominator <= 0 {
        return Err(invalid);
    }

    let scale = 1i64.checked_shl(dots).filter(|s| *s > 0).ok_or(invalid.clone())?;
    let numerator = scale
        .checked_mul(2)
        .map(|n| n - 1)
        .filter(|n| *n > 0)
        .ok_or(invalid.clone())?;
    let denom = denominator.checked_mul(scale).ok_or(invalid)?;

    Ok(Rational64::new(numerator, denom))
}

/// Rational to float, for rendering.
pub fn ratio_to_f64(value: Rational64) -> f64 {
    *value.numer() as f64 / *value.denom() as f64
}
