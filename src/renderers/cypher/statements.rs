//! Cypher `CREATE` statements
//!
//! Node statements look like `CREATE (id:Label {k: v, ...})` and relationship
//! statements like `CREATE ((a)-[:LABEL {k: v}]->(b))`. Property values are
//! written bare when they read as numbers and single-quoted otherwise; a missing
//! value is the quoted token `'null'`.

use std::fmt;

use crate::models::{GraphNode, Properties, PropertyValue};

/// Relationship labels used in the dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    Voice,
    Rhythmic,
    Plays,
    TimeSeries,
    NextMeasure,
    Has,
    Next,
    Is,
}

impl Relationship {
    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::Voice => "VOICE",
            Relationship::Rhythmic => "RHYTHMIC",
            Relationship::Plays => "PLAYS",
            Relationship::TimeSeries => "timeSeries",
            Relationship::NextMeasure => "NEXTMeasure",
            Relationship::Has => "HAS",
            Relationship::Next => "NEXT",
            Relationship::Is => "IS",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Node {
        id: String,
        label: &'static str,
        properties: Properties,
    },
    Link {
        from: String,
        relationship: Relationship,
        to: String,
        properties: Properties,
    },
}

impl Statement {
    pub fn node<N: GraphNode>(node: &N) -> Self {
        Statement::Node {
            id: node.graph_id().to_string(),
            label: N::LABEL,
            properties: node.properties(),
        }
    }

    pub fn link(from: &str, relationship: Relationship, to: &str) -> Self {
        Statement::Link {
            from: from.to_string(),
            relationship,
            to: to.to_string(),
            properties: Vec::new(),
        }
    }

    /// Replaces the properties of a link; nodes are left unchanged.
    pub fn with_properties(mut self, new_properties: Properties) -> Self {
        if let Statement::Link { properties, .. } = &mut self {
            *properties = new_properties;
        }
        self
    }

    /// Graph id this statement creates, if it is a node statement
    pub fn created_id(&self) -> Option<&str> {
        match self {
            Statement::Node { id, .. } => Some(id),
            Statement::Link { .. } => None,
        }
    }

    /// Graph ids a link statement refers to
    pub fn referenced_ids(&self) -> Option<(&str, &str)> {
        match self {
            Statement::Node { .. } => None,
            Statement::Link { from, to, .. } => Some((from, to)),
        }
    }

    pub fn relationship(&self) -> Option<Relationship> {
        match self {
            Statement::Node { .. } => None,
            Statement::Link { relationship, .. } => Some(*relationship),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Node {
                id,
                label,
                properties,
            } => {
                write!(f, "CREATE ({}:{}", id, label)?;
                if !properties.is_empty() {
                    f.write_str(" ")?;
                    write_properties(f, properties)?;
                }
                f.write_str(")")
            }
            Statement::Link {
                from,
                relationship,
                to,
                properties,
            } => {
                write!(f, "CREATE (({})-[:{}", from, relationship)?;
                if !properties.is_empty() {
                    f.write_str(" ")?;
                    write_properties(f, properties)?;
                }
                write!(f, "]->({}))", to)
            }
        }
    }
}

fn write_properties(f: &mut fmt::Formatter<'_>, properties: &Properties) -> fmt::Result {
    f.write_str("{")?;
    for (i, (key, value)) in properties.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}: {}", key, format_value(value))?;
    }
    f.write_str("}")
}

/// Render one property value as a Cypher literal.
pub fn format_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Int(n) => n.to_string(),
        PropertyValue::Float(x) => format_float(*x),
        PropertyValue::Text(text) => numeral(text).unwrap_or_else(|| quote(text)),
        PropertyValue::Null => quote("null"),
    }
}

/// Floats always carry a fractional part; non-finite values have no literal.
fn format_float(x: f64) -> String {
    if !x.is_finite() {
        return quote("null");
    }
    if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        x.to_string()
    }
}

/// Text that reads as a number renders as that number's literal.
fn numeral(text: &str) -> Option<String> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(n.to_string());
    }
    text.parse::<f64>().ok().filter(|x| x.is_finite()).map(format_float)
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}
