//! # Layouts
//!
//! The projector walks records in schema order and reports what it finds to a
//! [`Layout`]. Each presentation mode is one implementation; the walk itself never
//! branches on the mode.

use crate::projection::cell::{Cell, Entry, Row};
use std::mem;

/// Receives the walk over a record sequence.
pub trait Layout {
    /// What the layout produces once every record has been walked.
    type Output;

    /// A labelled scalar: a top-level property, an ordinal, or a flattened inner value.
    fn emit_leaf(&mut self, label: &str, value: Cell);

    /// A nested object or array begins under `label`.
    fn emit_group_start(&mut self, label: &str);

    /// The innermost open group ends.
    fn emit_group_end(&mut self);

    /// All properties of the current top-level record were emitted.
    fn finalize_record(&mut self);

    /// Consumes the layout.
    fn finish(self) -> Self::Output;
}

/// One row per record; nested values collapse into a single `label: value` text cell.
#[derive(Debug, Default)]
pub struct TableLayout {
    rows: Vec<Row>,
    current: Row,
    depth: usize,
    lines: Vec<String>,
}

impl Layout for TableLayout {
    type Output = Vec<Row>;

    fn emit_leaf(&mut self, label: &str, value: Cell) {
        if self.depth == 0 {
            self.current.push(value);
        } else {
            self.lines.push(format!("{}: {}", label, value));
        }
    }

    fn emit_group_start(&mut self, _label: &str) {
        self.depth += 1;
    }

    fn emit_group_end(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            let cell = if self.lines.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(self.lines.join("\n"))
            };
            self.lines.clear();
            self.current.push(cell);
        }
    }

    fn finalize_record(&mut self) {
        self.rows.push(mem::take(&mut self.current));
    }

    fn finish(self) -> Vec<Row> {
        self.rows
    }
}

/// Label/value entries with blank padding around groups and after each record.
#[derive(Debug, Default)]
pub struct ListLayout {
    entries: Vec<Entry>,
}

impl Layout for ListLayout {
    type Output = Vec<Entry>;

    fn emit_leaf(&mut self, label: &str, value: Cell) {
        self.entries.push(Entry::new(label, value));
    }

    fn emit_group_start(&mut self, label: &str) {
        self.entries.push(Entry::blank());
        self.entries.push(Entry::new(label, Cell::Empty));
        self.entries.push(Entry::blank());
    }

    fn emit_group_end(&mut self) {
        self.entries.push(Entry::blank());
    }

    fn finalize_record(&mut self) {
        self.entries.push(Entry::blank());
    }

    fn finish(self) -> Vec<Entry> {
        self.entries
    }
}

/// Unpadded label/value pairs; the inline form used inside table cells.
#[derive(Debug, Default)]
pub struct FlatLayout {
    entries: Vec<Entry>,
}

impl Layout for FlatLayout {
    type Output = Vec<Entry>;

    fn emit_leaf(&mut self, label: &str, value: Cell) {
        self.entries.push(Entry::new(label, value));
    }

    fn emit_group_start(&mut self, _label: &str) {}

    fn emit_group_end(&mut self) {}

    fn finalize_record(&mut self) {}

    fn finish(self) -> Vec<Entry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout_collapses_groups() {
        let mut layout = TableLayout::default();
        layout.emit_leaf("ID", Cell::from(1usize));
        layout.emit_group_start("Tags");
        layout.emit_leaf("title", Cell::from("x"));
        layout.emit_group_start("Meta");
        layout.emit_leaf("k", Cell::from("v"));
        layout.emit_group_end();
        layout.emit_group_end();
        layout.finalize_record();

        let rows = layout.finish();
        assert_eq!(
            rows,
            vec![vec![Cell::from(1usize), Cell::from("title: x\nk: v")]]
        );
    }

    #[test]
    fn test_table_layout_empty_group() {
        let mut layout = TableLayout::default();
        layout.emit_group_start("Tags");
        layout.emit_group_end();
        layout.finalize_record();
        assert_eq!(layout.finish(), vec![vec![Cell::Empty]]);
    }

    #[test]
    fn test_list_layout_padding() {
        let mut layout = ListLayout::default();
        layout.emit_group_start("Tags");
        layout.emit_leaf("title", Cell::from("x"));
        layout.emit_group_end();
        layout.finalize_record();

        assert_eq!(
            layout.finish(),
            vec![
                Entry::blank(),
                Entry::new("Tags", Cell::Empty),
                Entry::blank(),
                Entry::new("title", "x"),
                Entry::blank(),
                Entry::blank(),
            ]
        );
    }

    #[test]
    fn test_flat_layout_ignores_structure() {
        let mut layout = FlatLayout::default();
        layout.emit_group_start("Tags");
        layout.emit_leaf("title", Cell::from("x"));
        layout.emit_group_end();
        layout.finalize_record();
        assert_eq!(layout.finish(), vec![Entry::new("title", "x")]);
    }
}
