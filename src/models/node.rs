//! Node payloads shared by every entity
//!
//! Entities describe themselves as a label, a graph id and an ordered property
//! list; the Cypher renderer turns that into `CREATE` statements.

use num_rational::Rational64;

use super::rhythm::ratio_to_f64;

/// One property value on a node or relationship
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    /// Rendered bare if the text parses as a number
    Text(String),
    Null,
}

impl PropertyValue {
    pub fn text(value: impl Into<String>) -> Self {
        PropertyValue::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(PropertyValue::text).unwrap_or(PropertyValue::Null)
    }

    pub fn optional_float(value: Option<f64>) -> Self {
        value.map(PropertyValue::Float).unwrap_or(PropertyValue::Null)
    }

    pub fn ratio(value: Rational64) -> Self {
        PropertyValue::Float(ratio_to_f64(value))
    }

    pub fn optional_ratio(value: Option<Rational64>) -> Self {
        value.map(PropertyValue::ratio).unwrap_or(PropertyValue::Null)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<usize> for PropertyValue {
    fn from(value: usize) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

pub type Properties = Vec<(&'static str, PropertyValue)>;

/// An entity that becomes one node in the dump
pub trait GraphNode {
    const LABEL: &'static str;

    fn graph_id(&self) -> &str;

    fn properties(&self) -> Properties;
}
