//! Schema-ordered traversal of records, shared by every layout.

use crate::oas::models::{SchemaDefinition, ORDINAL_KEY};
use crate::projection::cell::Cell;
use crate::projection::layout::Layout;
use crate::projection::node::Node;
use serde_json::Value;

/// Walks top-level records, finalizing the layout after each one.
pub fn walk_records<L: Layout>(
    records: &[&Value],
    schema: &SchemaDefinition,
    mut layout: L,
) -> L::Output {
    for (position, record) in records.iter().enumerate() {
        walk_properties(record, position, schema, &mut layout);
        layout.finalize_record();
    }
    layout.finish()
}

/// Emits every property of `schema` for one record, in declaration order.
///
/// `position` is the record's 0-based index in its sequence; the ordinal
/// property reports it 1-based and never reads the record.
fn walk_properties<L: Layout>(
    record: &Value,
    position: usize,
    schema: &SchemaDefinition,
    layout: &mut L,
) {
    for (key, property) in schema.ordered_properties() {
        if key == ORDINAL_KEY {
            layout.emit_leaf(&property.title, Cell::from(position + 1));
            continue;
        }

        let Some(value) = record.get(key) else {
            layout.emit_leaf(&property.title, Cell::Empty);
            continue;
        };

        match property.nested.as_ref() {
            Some(nested) if Node::classify(value).is_nested() => {
                layout.emit_group_start(&property.title);
                walk_nested(value, &property.title, nested, layout);
                layout.emit_group_end();
            }
            // Scalars, and nested values without a schema (rendered as JSON text).
            _ => layout.emit_leaf(&property.title, Cell::from_value(value)),
        }
    }
}

/// Flattens a nested object or array against its schema.
///
/// A lone object is a one-element sequence. Scalar elements are reported under
/// the owning property's `label`.
pub(crate) fn walk_nested<L: Layout>(
    value: &Value,
    label: &str,
    schema: &SchemaDefinition,
    layout: &mut L,
) {
    match Node::classify(value) {
        Node::Sequence(items) => {
            for (position, item) in items.iter().enumerate() {
                walk_element(item, position, label, schema, layout);
            }
        }
        _ => walk_element(value, 0, label, schema, layout),
    }
}

fn walk_element<L: Layout>(
    item: &Value,
    position: usize,
    label: &str,
    schema: &SchemaDefinition,
    layout: &mut L,
) {
    match Node::classify(item) {
        Node::Record(_) => walk_properties(item, position, schema, layout),
        // Arrays of arrays flatten into the same group.
        Node::Sequence(_) => walk_nested(item, label, schema, layout),
        Node::Leaf(value) => layout.emit_leaf(label, Cell::from_value(value)),
    }
}
