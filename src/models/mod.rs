//! Models module for the score graph
//!
//! This module contains the graph entities built from an MEI file and the
//! pitch/rhythm math their derived attributes rely on.
//!
//! ```text
//! Score ──VOICE──▶ Voice ──PLAYS/timeSeries──▶ first Event
//!   │                └──RHYTHMIC──┐
//!   └──RHYTHMIC──▶ TopRhythmic ◀──┘
//!                    └──RHYTHMIC──▶ Measure ──NEXTMeasure──▶ Measure
//!                                     └──HAS──▶ Event ──NEXT──▶ Event
//!                                                 └──IS──▶ Fact
//! ```

pub mod pitch;
pub mod rhythm;
pub mod node;
pub mod fact;
pub mod event;
pub mod measure;
pub mod voice;
pub mod score;
pub mod numbering;

// Re-export commonly used types
pub use event::{Event, Kind};
pub use fact::{lowest_fact, Fact, NoteHead, Sound};
pub use measure::Measure;
pub use node::{GraphNode, Properties, PropertyValue};
pub use numbering::Numbering;
pub use pitch::{frequency, semitone_interval, Accidental, Pitch, PitchClass};
pub use rhythm::{note_duration, NoteValue};
pub use score::{Score, TopRhythmic};
pub use voice::{EventLocation, Voice};
