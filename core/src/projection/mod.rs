#![deny(missing_docs)]

//! # Row Projection
//!
//! Turns arbitrary JSON data into rows (table mode) or label/value entries
//! (list mode), driven by a resolved [`SchemaDefinition`].
//!
//! - Column order is schema declaration order, never data key order.
//! - The `number` property is a 1-based ordinal and is never read from data.
//! - Nested objects and arrays are flattened recursively against their nested schema.

pub mod cell;
pub mod columns;
pub mod layout;
pub mod node;
mod walk;

pub use cell::{Cell, Entry, Row};
pub use columns::{columns_for, has_headers, Column};
pub use layout::{FlatLayout, Layout, ListLayout, TableLayout};
pub use node::{to_record_sequence, Node};

use crate::error::{AppError, AppResult};
use crate::oas::models::SchemaDefinition;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Presentation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// One row per record, one column per property.
    #[default]
    Table,
    /// One label/value row per property.
    List,
}

impl FromStr for LayoutMode {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(LayoutMode::Table),
            "list" => Ok(LayoutMode::List),
            _ => Err(AppError::UnsupportedValue {
                name: "type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Table => f.write_str("table"),
            LayoutMode::List => f.write_str("list"),
        }
    }
}

/// Projected data, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Table mode output.
    Table(Vec<Row>),
    /// List mode output.
    List(Vec<Entry>),
}

impl Projection {
    /// The mode that produced this projection.
    pub fn mode(&self) -> LayoutMode {
        match self {
            Projection::Table(_) => LayoutMode::Table,
            Projection::List(_) => LayoutMode::List,
        }
    }

    /// Number of rows or entries.
    pub fn len(&self) -> usize {
        match self {
            Projection::Table(rows) => rows.len(),
            Projection::List(entries) => entries.len(),
        }
    }

    /// True when nothing was projected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Projects `data` (one record or an array of records) under `mode`.
pub fn project(data: &Value, schema: &SchemaDefinition, mode: LayoutMode) -> Projection {
    let records = to_record_sequence(data);
    let projection = match mode {
        LayoutMode::Table => Projection::Table(project_table(&records, schema)),
        LayoutMode::List => Projection::List(project_list(&records, schema)),
    };
    tracing::debug!(
        records = records.len(),
        mode = %mode,
        produced = projection.len(),
        "projected payload"
    );
    projection
}

/// One row per record, one cell per property in schema order.
pub fn project_table(records: &[&Value], schema: &SchemaDefinition) -> Vec<Row> {
    walk::walk_records(records, schema, TableLayout::default())
}

/// Label/value entries for all records, with a blank entry after each record.
pub fn project_list(records: &[&Value], schema: &SchemaDefinition) -> Vec<Entry> {
    walk::walk_records(records, schema, ListLayout::default())
}

/// Flattens a nested value against `schema` into label/value pairs.
///
/// List mode surrounds every nested group with blank/header padding; table mode
/// produces the bare pairs that end up joined inside a single cell.
pub fn flatten(value: &Value, schema: &SchemaDefinition, mode: LayoutMode) -> Vec<Entry> {
    match mode {
        LayoutMode::Table => {
            let mut layout = FlatLayout::default();
            walk::walk_nested(value, "", schema, &mut layout);
            layout.finish()
        }
        LayoutMode::List => {
            let mut layout = ListLayout::default();
            walk::walk_nested(value, "", schema, &mut layout);
            layout.finish()
        }
    }
}
