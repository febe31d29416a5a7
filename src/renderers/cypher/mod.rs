//! Cypher dump renderer
//!
//! Turns a built score graph into the `CREATE` statements that recreate it in a
//! graph database.

pub mod statements;
pub mod serializer;

pub use serializer::{render_dump, serialize_score};
pub use statements::{format_value, Relationship, Statement};
