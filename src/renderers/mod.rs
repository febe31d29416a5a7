//! Renderers module
//!
//! This module contains the export logic turning a score graph into an
//! output format.

pub mod cypher;

// Re-export commonly used types
pub use cypher::{render_dump, serialize_score, Relationship, Statement};
