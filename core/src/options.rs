#![deny(missing_docs)]

//! # Export Options
//!
//! Static configuration for an [`crate::Exporter`]: where the OpenAPI document
//! lives and how rendered documents are delivered.

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable holding the OpenAPI document path.
pub const ENV_OPENAPI_PATH: &str = "DOCEX_OPENAPI_PATH";
/// Environment variable holding the output directory.
pub const ENV_SAVE_PATH: &str = "DOCEX_SAVE_PATH";
/// Environment variable switching buffer responses on (`1`/`true`).
pub const ENV_BUFFER_AS_RESPONSE: &str = "DOCEX_BUFFER_AS_RESPONSE";

/// Exporter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExportOptions {
    /// Path to the OpenAPI document. Required.
    pub openapi_path: Option<PathBuf>,

    /// Directory rendered documents are written to.
    #[serde(default)]
    pub save_path: Option<PathBuf>,

    /// Return rendered documents in memory even when `save_path` is set.
    #[serde(default)]
    pub buffer_as_response: bool,
}

impl ExportOptions {
    /// Options pointing at the given OpenAPI document.
    pub fn new(openapi_path: impl Into<PathBuf>) -> Self {
        Self {
            openapi_path: Some(openapi_path.into()),
            ..Self::default()
        }
    }

    /// Sets the output directory.
    pub fn save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    /// Sets whether documents are returned in memory.
    pub fn buffer_as_response(mut self, enabled: bool) -> Self {
        self.buffer_as_response = enabled;
        self
    }

    /// Reads options from `DOCEX_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads options through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            openapi_path: non_empty(ENV_OPENAPI_PATH).map(PathBuf::from),
            save_path: non_empty(ENV_SAVE_PATH).map(PathBuf::from),
            buffer_as_response: non_empty(ENV_BUFFER_AS_RESPONSE)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    /// Checks the required option and that the document exists.
    ///
    /// Returns the validated document path.
    pub fn validate(&self) -> AppResult<PathBuf> {
        let path = self
            .openapi_path
            .clone()
            .ok_or_else(|| AppError::MissingRequiredOption("openapi_path".into()))?;
        if !path.is_file() {
            return Err(AppError::SourceDocumentNotFound(path));
        }
        Ok(path)
    }
}
