//! Musypher
//!
//! Converts MEI music scores into Cypher `CREATE` dumps that load the score
//! into a graph database as voices, measures, events and facts.
//!
//! The library is usable natively (see [`convert_mei_to_cypher`] and the
//! [`batch`] module) and from JavaScript through the WASM API.

pub mod models;
pub mod converters;
pub mod renderers;
pub mod utils;
pub mod batch;

#[cfg(target_arch = "wasm32")]
pub mod api;

// Re-export commonly used types
pub use converters::mei::{
    convert_mei_to_cypher, ConversionError, ConversionResult, ConversionSettings, ConversionWarning,
    WarningKind,
};
pub use models::{Numbering, Score};
