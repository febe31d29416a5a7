//! MEI to Cypher converter module
//!
//! Converts an MEI score into a dump of Cypher `CREATE` statements describing
//! the score as a graph of voices, measures, events and facts.
//!
//! # Overview
//!
//! The converter follows a three-stage pipeline:
//! 1. **Read**: Pull element boundaries from the markup with quick-xml
//! 2. **Build**: Grow the entity graph in one forward pass
//! 3. **Serialize**: Walk the graph depth-first and render one statement per line
//!
//! # Basic Usage
//!
//! ```ignore
//! use musypher::converters::mei::convert_mei_to_cypher;
//!
//! let mei = r#"<mei>
//!   <staffGrp xml:id="sg1"><staffDef xml:id="S" n="1"/></staffGrp>
//!   <measure xml:id="m1"><staff n="1">
//!     <note xml:id="n1" pname="a" oct="4" dur="4"/>
//!   </staff></measure>
//! </mei>"#;
//!
//! let result = convert_mei_to_cypher("song.mei", mei, None)?;
//! println!("{}", result.cypher);
//! ```

pub mod errors;
pub mod types;
pub mod reader;
pub mod builder;

use log::info;

// Re-export main API
pub use builder::{build_graph, BuiltGraph};
pub use errors::{ConversionError, MalformedInput, StructuralError, ValidationError};
pub use types::{ConversionResult, ConversionSettings, ConversionWarning, WarningKind};

use crate::models::Numbering;
use crate::renderers::cypher::{render_dump, serialize_score};
use crate::utils::ids::sanitize_source_token;

/// Convert an MEI document to a Cypher dump.
///
/// # Arguments
///
/// * `source_name` - Name of the input (usually its path); namespaces graph ids
/// * `mei` - MEI document as string
/// * `settings` - Optional conversion settings (uses defaults if None)
///
/// # Returns
///
/// * `Ok(ConversionResult)` - The dump and the problems recovered from
/// * `Err(ConversionError)` - Fatal error; nothing is produced for this input
pub fn convert_mei_to_cypher(
    source_name: &str,
    mei: &str,
    settings: Option<ConversionSettings>,
) -> Result<ConversionResult, ConversionError> {
    let settings = settings.unwrap_or_default();
    let source_name = settings.source_name.as_deref().unwrap_or(source_name);

    // Numbering restarts with every file
    let mut numbering = Numbering::new();
    let BuiltGraph { score, mut warnings } =
        build_graph(source_name, mei, &mut numbering, settings.verbose)?;

    let statements = serialize_score(&score, &mut warnings)?;
    let cypher = render_dump(&statements);
    info!(
        "{}: {} statements, {} warning(s)",
        source_name,
        statements.len(),
        warnings.len()
    );

    Ok(ConversionResult {
        cypher,
        dump_id: sanitize_source_token(source_name),
        statement_count: statements.len(),
        warnings,
    })
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
