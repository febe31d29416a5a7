//! Utility modules
//!
//! Identifier normalization for graph nodes and file naming for dumps.

pub mod ids;
pub mod paths;

// Re-export commonly used functions
pub use ids::{graph_id, sanitize_source_token, Source};
pub use paths::safe_basename;
