//! Classification of JSON input at the projector boundary.

use serde_json::{Map, Value};

/// A JSON value sorted into the three shapes the projector distinguishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// A scalar: string, number, boolean or `null`.
    Leaf(&'a Value),
    /// A JSON object.
    Record(&'a Map<String, Value>),
    /// A JSON array.
    Sequence(&'a [Value]),
}

impl<'a> Node<'a> {
    /// Classifies a value once; everything downstream matches on the variant.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Node::Record(map),
            Value::Array(items) => Node::Sequence(items.as_slice()),
            other => Node::Leaf(other),
        }
    }

    /// True for objects and arrays, which need flattening.
    pub fn is_nested(&self) -> bool {
        !matches!(self, Node::Leaf(_))
    }
}

/// Wraps a lone record into a one-element sequence; arrays pass through in order.
pub fn to_record_sequence(data: &Value) -> Vec<&Value> {
    match data {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}
