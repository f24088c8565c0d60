use docex_core::{
    columns_for, project, resolve_response, AppError, Cell, Entry, ExportOptions, ExportOutcome,
    ExportParams, Exporter, LayoutMode, OutputFormat, Projection,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/openapi.yaml")
}

fn orders() -> Value {
    json!([
        {
            "number": 42,
            "id": "A-1",
            "customer": {"name": "Ann", "email": "ann@example.com"},
            "lines": [
                {"sku": "bolt", "qty": 10},
                {"sku": "nut", "qty": 12}
            ],
            "paid": true
        },
        {
            "id": "A-2",
            "customer": {"name": "Bob"},
            "lines": [],
            "paid": null
        }
    ])
}

#[test]
fn test_table_projection_of_fixture() {
    let exporter = Exporter::new(ExportOptions::new(fixture())).unwrap();
    let document = exporter.cache().get().unwrap();
    let resolved = resolve_response(document, "/orders", "get").unwrap();
    assert_eq!(resolved.name, "Order");
    assert!(resolved.is_array);

    let headers: Vec<_> = columns_for(resolved.schema, LayoutMode::Table)
        .into_iter()
        .map(|c| c.header)
        .collect();
    assert_eq!(
        headers,
        vec!["No.", "Order ID", "Customer details", "Lines", "Paid"]
    );

    let Projection::Table(rows) = project(&orders(), resolved.schema, LayoutMode::Table) else {
        panic!("expected a table");
    };
    assert_eq!(
        rows,
        vec![
            vec![
                Cell::from(1usize),
                Cell::from("A-1"),
                Cell::from("Name: Ann\nE-mail: ann@example.com"),
                Cell::from("#: 1\nSKU: bolt\nQty: 10\n#: 2\nSKU: nut\nQty: 12"),
                Cell::Bool(true),
            ],
            vec![
                Cell::from(2usize),
                Cell::from("A-2"),
                Cell::from("Name: Bob\nE-mail: "),
                Cell::Empty,
                Cell::Empty,
            ],
        ]
    );
}

#[test]
fn test_list_projection_of_single_record() {
    let exporter = Exporter::new(ExportOptions::new(fixture())).unwrap();
    let document = exporter.cache().get().unwrap();
    let resolved = resolve_response(document, "/orders/latest", "GET").unwrap();
    assert!(!resolved.is_array);

    let record = json!({"id": "A-9", "customer": {"name": "Cy", "email": "cy@x"}, "paid": false});
    let Projection::List(entries) = project(&record, resolved.schema, LayoutMode::List) else {
        panic!("expected a list");
    };
    assert_eq!(
        entries,
        vec![
            Entry::new("No.", 1usize),
            Entry::new("Order ID", "A-9"),
            Entry::blank(),
            Entry::new("Customer details", Cell::Empty),
            Entry::blank(),
            Entry::new("Name", "Cy"),
            Entry::new("E-mail", "cy@x"),
            Entry::blank(),
            Entry::new("Lines", Cell::Empty),
            Entry::new("Paid", Cell::Bool(false)),
            Entry::blank(),
        ]
    );
}

#[test]
fn test_operation_without_success_schema() {
    let exporter = Exporter::new(ExportOptions::new(fixture())).unwrap();
    let params = ExportParams::new(OutputFormat::Pdf, LayoutMode::Table);
    let err = exporter
        .export("/orders/latest", "delete", params, json!({}))
        .unwrap_err();
    assert!(matches!(err, AppError::SchemaReferenceMissing { .. }));

    let err = exporter
        .export("/orders", "post", params, json!({}))
        .unwrap_err();
    assert!(matches!(err, AppError::MethodNotSupported { .. }));
}

#[test]
fn test_every_format_and_mode_renders() {
    let exporter = Exporter::new(ExportOptions::new(fixture())).unwrap();
    for format in [OutputFormat::Xlsx, OutputFormat::Pdf] {
        for mode in [LayoutMode::Table, LayoutMode::List] {
            let outcome = exporter
                .export("/orders", "get", ExportParams::new(format, mode), orders())
                .unwrap();
            let ExportOutcome::Buffer { bytes, .. } = outcome else {
                panic!("expected an in-memory document");
            };
            let magic: &[u8] = match format {
                OutputFormat::Xlsx => b"PK",
                _ => b"%PDF-",
            };
            assert!(bytes.starts_with(magic), "{} / {}", format, mode);
        }
    }
}

#[test]
fn test_concurrent_cold_start() {
    let exporter = Arc::new(Exporter::new(ExportOptions::new(fixture())).unwrap());
    assert!(!exporter.cache().is_loaded());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let exporter = Arc::clone(&exporter);
            std::thread::spawn(move || {
                let params = ExportParams::new(OutputFormat::Xlsx, LayoutMode::Table);
                exporter
                    .export("/orders", "get", params, orders())
                    .map(|outcome| matches!(outcome, ExportOutcome::Buffer { .. }))
                    .map_err(|e| e.to_string())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(true));
    }
    assert!(exporter.cache().is_loaded());
    assert_eq!(exporter.cache().get().unwrap().schemas.len(), 3);
}
