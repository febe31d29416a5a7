//! Settings and results of an MEI conversion

use serde::{Deserialize, Serialize};

/// Conversion settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Log recovered problems through the `log` facade
    #[serde(default)]
    pub verbose: bool,

    /// Name used for the `source` property and id suffix instead of the
    /// caller-supplied one
    #[serde(default)]
    pub source_name: Option<String>,
}

impl ConversionSettings {
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }
}

/// A successful conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// The dump: one `CREATE` statement per line
    pub cypher: String,

    /// Sanitized source token; identifies this file's dump to loaders
    pub dump_id: String,

    pub statement_count: usize,

    /// Problems that were recovered from
    pub warnings: Vec<ConversionWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    UnknownRole,
    MissingComposer,
    MissingCollection,
    MalformedDots,
    UnlabelledVoice,
    /// A NEXT link ratio could not be computed
    DegenerateDuration,
}

/// A recovered problem, reported whether or not a logger is installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    /// Markup id or tag the warning is about
    pub element: Option<String>,
    pub message: String,
}

impl ConversionWarning {
    pub fn new(kind: WarningKind, element: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            element: element.map(str::to_string),
            message: message.into(),
        }
    }
}
