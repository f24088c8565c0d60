//! Column descriptors handed to the renderers.

use crate::oas::models::SchemaDefinition;
use crate::projection::LayoutMode;

/// One output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Property key, or `title` / `value` in list mode.
    pub key: String,
    /// Header text; empty headers suppress the header row.
    pub header: String,
}

impl Column {
    /// Creates a column descriptor.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
        }
    }
}

/// Columns for `schema` under `mode`.
///
/// Table mode yields one column per property in schema order; list mode always
/// yields the two unlabelled `title` / `value` columns.
pub fn columns_for(schema: &SchemaDefinition, mode: LayoutMode) -> Vec<Column> {
    match mode {
        LayoutMode::Table => schema
            .ordered_properties()
            .map(|(key, property)| Column::new(key, property.title.as_str()))
            .collect(),
        LayoutMode::List => vec![Column::new("title", ""), Column::new("value", "")],
    }
}

/// True when at least one column carries a header.
pub fn has_headers(columns: &[Column]) -> bool {
    columns.iter().any(|c| !c.header.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::PropertySchema;

    fn schema() -> SchemaDefinition {
        [
            ("number".to_string(), PropertySchema::scalar("No.")),
            ("name".to_string(), PropertySchema::scalar("Name")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_table_columns_follow_schema() {
        let columns = columns_for(&schema(), LayoutMode::Table);
        assert_eq!(
            columns,
            vec![Column::new("number", "No."), Column::new("name", "Name")]
        );
        assert!(has_headers(&columns));
    }

    #[test]
    fn test_list_columns_are_fixed() {
        let columns = columns_for(&schema(), LayoutMode::List);
        assert_eq!(
            columns,
            vec![Column::new("title", ""), Column::new("value", "")]
        );
        assert!(!has_headers(&columns));
    }
}
