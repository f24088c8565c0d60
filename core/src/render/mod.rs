#![deny(missing_docs)]

//! # Document Rendering
//!
//! Encoders that turn a [`Projection`] plus its column descriptors into a binary
//! document. Renderers are presentation only: column order and row content are
//! taken verbatim from their inputs.

pub mod print;
pub mod spreadsheet;

pub use print::PrintRenderer;
pub use spreadsheet::SpreadsheetRenderer;

use crate::error::{AppError, AppResult};
use crate::projection::{Column, Projection};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A document encoder.
pub trait DocumentRenderer: Send + Sync {
    /// Encodes `projection` under `columns` into a binary buffer.
    fn render(&self, columns: &[Column], projection: &Projection) -> AppResult<Vec<u8>>;
}

/// Requested output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Leave the JSON payload untouched.
    #[default]
    Json,
    /// Office Open XML spreadsheet.
    Xlsx,
    /// PDF document.
    Pdf,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// MIME type of the encoded document.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            OutputFormat::Pdf => "application/pdf",
        }
    }

    /// The renderer for this format; `None` for [`OutputFormat::Json`].
    pub fn renderer(&self) -> Option<Box<dyn DocumentRenderer>> {
        match self {
            OutputFormat::Json => None,
            OutputFormat::Xlsx => Some(Box::new(SpreadsheetRenderer::default())),
            OutputFormat::Pdf => Some(Box::new(PrintRenderer::default())),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xlsx" => Ok(OutputFormat::Xlsx),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(AppError::UnsupportedValue {
                name: "ext",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
