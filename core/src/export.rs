#![deny(missing_docs)]

//! # Export Pipeline
//!
//! Ties the document cache, resolver, projector and renderers together:
//! `(endpoint, method, params, payload)` in, [`ExportOutcome`] out.

use crate::error::{AppError, AppResult};
use crate::oas::cache::DocumentCache;
use crate::oas::models::OpenApiDocument;
use crate::oas::resolver::resolve_response_schema;
use crate::options::ExportOptions;
use crate::projection::{columns_for, project, LayoutMode};
use crate::render::{DocumentRenderer, OutputFormat};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Per-request selectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ExportParams {
    /// Requested output format (`ext`).
    #[serde(default, rename = "ext")]
    pub format: OutputFormat,
    /// Requested layout (`type`).
    #[serde(default, rename = "type")]
    pub mode: LayoutMode,
}

impl ExportParams {
    /// Creates a parameter set.
    pub fn new(format: OutputFormat, mode: LayoutMode) -> Self {
        Self { format, mode }
    }

    /// Parses raw `ext` / `type` selectors; absent ones take their defaults.
    pub fn parse(ext: Option<&str>, mode: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            format: ext.map(str::parse).transpose()?.unwrap_or_default(),
            mode: mode.map(str::parse).transpose()?.unwrap_or_default(),
        })
    }
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// `json` was requested; the payload is returned untouched.
    Json(Value),
    /// The document was written to disk.
    Saved {
        /// Location of the written file.
        path: PathBuf,
        /// Its format.
        format: OutputFormat,
    },
    /// The document is returned in memory.
    Buffer {
        /// Encoded document.
        bytes: Vec<u8>,
        /// Its format.
        format: OutputFormat,
    },
}

/// Renders handler payloads according to the OpenAPI response schema of their endpoint.
#[derive(Debug)]
pub struct Exporter {
    options: ExportOptions,
    cache: DocumentCache,
}

impl Exporter {
    /// Validates `options` and prepares a lazily loaded document cache.
    pub fn new(options: ExportOptions) -> AppResult<Self> {
        let path = options.validate()?;
        Ok(Self {
            cache: DocumentCache::new(path),
            options,
        })
    }

    /// Builds an exporter around an already parsed document.
    pub fn with_document(options: ExportOptions, document: OpenApiDocument) -> Self {
        let path = options.openapi_path.clone().unwrap_or_default();
        Self {
            cache: DocumentCache::with_document(path, document),
            options,
        }
    }

    /// The configured options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// The document cache.
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Renders `payload` for `method path` and delivers it as configured.
    pub fn export(
        &self,
        path: &str,
        method: &str,
        params: ExportParams,
        payload: Value,
    ) -> AppResult<ExportOutcome> {
        let Some(renderer) = params.format.renderer() else {
            return Ok(ExportOutcome::Json(payload));
        };

        let bytes = self.render_with(renderer.as_ref(), path, method, params.mode, &payload)?;
        tracing::info!(
            path,
            method,
            format = %params.format,
            mode = %params.mode,
            bytes = bytes.len(),
            "rendered export"
        );

        match (&self.options.save_path, self.options.buffer_as_response) {
            (Some(dir), false) => {
                let path = save_document(dir, params.format, &bytes)?;
                Ok(ExportOutcome::Saved {
                    path,
                    format: params.format,
                })
            }
            _ => Ok(ExportOutcome::Buffer {
                bytes,
                format: params.format,
            }),
        }
    }

    /// Renders `payload` into `format`, ignoring delivery options.
    pub fn render(
        &self,
        path: &str,
        method: &str,
        format: OutputFormat,
        mode: LayoutMode,
        payload: &Value,
    ) -> AppResult<Vec<u8>> {
        let renderer = format
            .renderer()
            .ok_or_else(|| AppError::UnsupportedValue {
                name: "ext",
                value: format.to_string(),
            })?;
        self.render_with(renderer.as_ref(), path, method, mode, payload)
    }

    fn render_with(
        &self,
        renderer: &dyn DocumentRenderer,
        path: &str,
        method: &str,
        mode: LayoutMode,
        payload: &Value,
    ) -> AppResult<Vec<u8>> {
        let document = self.cache.get()?;
        let schema = resolve_response_schema(document, path, method)?;
        let projection = project(payload, schema, mode);
        let columns = columns_for(schema, mode);
        renderer.render(&columns, &projection)
    }
}

fn save_document(dir: &Path, format: OutputFormat, bytes: &[u8]) -> AppResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", Uuid::new_v4(), format.extension()));
    fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "saved export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::parse_openapi_document;
    use serde_json::json;

    const DOC: &str = r#"
openapi: 3.1.0
info: {title: T, version: 1.0}
paths:
  /widgets:
    get:
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: array
                items: {$ref: '#/components/schemas/Widget'}
components:
  schemas:
    Widget:
      type: object
      properties:
        number: {title: No.}
        name: {type: string, title: Name}
"#;

    fn exporter(options: ExportOptions) -> Exporter {
        Exporter::with_document(options, parse_openapi_document(DOC).unwrap())
    }

    fn payload() -> Value {
        json!([{"name": "a"}, {"name": "b"}])
    }

    #[test]
    fn test_json_passthrough() {
        let outcome = exporter(ExportOptions::default())
            .export("/nowhere", "get", ExportParams::default(), payload())
            .unwrap();
        assert_eq!(outcome, ExportOutcome::Json(payload()));
    }

    #[test]
    fn test_buffer_without_save_path() {
        let params = ExportParams::new(OutputFormat::Pdf, LayoutMode::Table);
        let outcome = exporter(ExportOptions::default())
            .export("/widgets", "GET", params, payload())
            .unwrap();
        match outcome {
            ExportOutcome::Buffer { bytes, format } => {
                assert_eq!(format, OutputFormat::Pdf);
                assert!(bytes.starts_with(b"%PDF-"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_saved_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions::default().save_path(dir.path().join("exports"));
        let params = ExportParams::new(OutputFormat::Xlsx, LayoutMode::List);
        let outcome = exporter(options)
            .export("/widgets", "get", params, payload())
            .unwrap();
        match outcome {
            ExportOutcome::Saved { path, format } => {
                assert_eq!(format, OutputFormat::Xlsx);
                assert_eq!(path.extension().unwrap(), "xlsx");
                assert!(fs::read(&path).unwrap().starts_with(b"PK"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_buffer_flag_wins_over_save_path() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions::default()
            .save_path(dir.path())
            .buffer_as_response(true);
        let params = ExportParams::new(OutputFormat::Xlsx, LayoutMode::Table);
        let outcome = exporter(options)
            .export("/widgets", "get", params, payload())
            .unwrap();
        assert!(matches!(outcome, ExportOutcome::Buffer { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_resolution_errors_surface() {
        let params = ExportParams::new(OutputFormat::Xlsx, LayoutMode::Table);
        let err = exporter(ExportOptions::default())
            .export("/gadgets", "get", params, payload())
            .unwrap_err();
        assert!(matches!(err, AppError::EndpointNotDeclared(_)));
    }

    #[test]
    fn test_render_rejects_json() {
        let err = exporter(ExportOptions::default())
            .render("/widgets", "get", OutputFormat::Json, LayoutMode::Table, &payload())
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedValue { name: "ext", .. }));
    }

    #[test]
    fn test_params_deserialize() {
        let params: ExportParams = serde_json::from_value(json!({"ext": "pdf", "type": "list"}))
            .unwrap();
        assert_eq!(params, ExportParams::new(OutputFormat::Pdf, LayoutMode::List));
        let defaults: ExportParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(defaults, ExportParams::default());
    }

    #[test]
    fn test_params_parse() {
        assert_eq!(
            ExportParams::parse(Some("XLSX"), None).unwrap(),
            ExportParams::new(OutputFormat::Xlsx, LayoutMode::Table)
        );
        assert_eq!(ExportParams::parse(None, None).unwrap(), ExportParams::default());
        let err = ExportParams::parse(Some("pdf"), Some("grid")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedValue { name: "type", .. }));
    }

    #[test]
    fn test_new_requires_existing_document() {
        let err = Exporter::new(ExportOptions::new("/missing/openapi.yaml")).unwrap_err();
        assert!(matches!(err, AppError::SourceDocumentNotFound(_)));
    }
}
