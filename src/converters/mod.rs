//! Format converters
//!
//! This module contains the MEI reader and graph builder.

pub mod mei;

// Re-export for convenience
pub use mei::{convert_mei_to_cypher, ConversionError, ConversionResult, ConversionSettings};
