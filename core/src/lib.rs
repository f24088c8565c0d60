#![deny(missing_docs)]

//! # Docex Core
//!
//! Re-renders JSON API responses as spreadsheet or PDF documents, driven by the
//! OpenAPI schema declared for the endpoint's `200` response.
//!
//! request → handler JSON → [`resolve_response_schema`] → [`project`] → [`DocumentRenderer`] → bytes

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) loading, caching and response schema resolution.
pub mod oas;

/// Schema-driven projection of JSON into rows and entries.
pub mod projection;

/// Spreadsheet and PDF encoders.
pub mod render;

/// Exporter configuration.
pub mod options;

/// The export pipeline.
pub mod export;

pub use error::{AppError, AppResult};
pub use export::{ExportOutcome, ExportParams, Exporter};
pub use oas::{
    load_openapi_document, parse_openapi_document, resolve_response, resolve_response_schema,
    DocumentCache, OpenApiDocument, PropertySchema, SchemaDefinition,
};
pub use options::ExportOptions;
pub use projection::{
    columns_for, flatten, project, project_list, project_table, to_record_sequence, Cell,
    Column, Entry, LayoutMode, Projection, Row,
};
pub use render::{DocumentRenderer, OutputFormat, PrintRenderer, SpreadsheetRenderer};
