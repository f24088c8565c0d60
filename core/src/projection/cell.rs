//! Cell values and list entries produced by the projector.

use serde_json::{Number, Value};
use std::fmt;

/// One table cell or list value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Absent or `null`.
    #[default]
    Empty,
    /// A JSON boolean.
    Bool(bool),
    /// A JSON number, kept exact.
    Number(Number),
    /// Text, including joined nested values.
    Text(String),
}

impl Cell {
    /// Converts a JSON value into a cell.
    ///
    /// Arrays and objects reaching this point have no schema to flatten against and
    /// are kept as compact JSON text.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => Cell::Number(n.clone()),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
        }
    }

    /// True for [`Cell::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The cell as a float, when it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(Number::from(value as u64))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// One table row: a cell per schema property, in schema order.
pub type Row = Vec<Cell>;

/// One list-mode line: a label and its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    /// Property title, or empty for padding.
    pub label: String,
    /// The value shown next to the label.
    pub value: Cell,
}

impl Entry {
    /// Creates a labelled entry.
    pub fn new(label: impl Into<String>, value: impl Into<Cell>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// The `("", "")` spacer separating records and groups.
    pub fn blank() -> Self {
        Self::default()
    }

    /// True for spacer entries.
    pub fn is_blank(&self) -> bool {
        self.label.is_empty() && self.value.is_empty()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}
