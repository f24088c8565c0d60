#![deny(missing_docs)]

//! # Document Cache
//!
//! A lazily populated, explicitly owned handle on the parsed OpenAPI document.
//!
//! The first caller parses the document; concurrent callers block on the same
//! initialisation and observe the finished value. A failed parse leaves the
//! cache empty so a later call can retry.

use crate::error::AppResult;
use crate::oas::document::load_openapi_document;
use crate::oas::models::OpenApiDocument;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Lazily loads and then holds the OpenAPI document found at `path`.
#[derive(Debug)]
pub struct DocumentCache {
    path: PathBuf,
    cell: OnceCell<OpenApiDocument>,
}

impl DocumentCache {
    /// Creates an empty cache for the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Creates a cache that already holds `document`.
    pub fn with_document(path: impl Into<PathBuf>, document: OpenApiDocument) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::with_value(document),
        }
    }

    /// Location of the source document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once a document has been parsed successfully.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the cached document, parsing it on first use.
    pub fn get(&self) -> AppResult<&OpenApiDocument> {
        self.cell.get_or_try_init(|| {
            tracing::info!(path = %self.path.display(), "loading openapi document");
            load_openapi_document(&self.path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::fs;
    use std::sync::Arc;

    const DOC: &str = r#"
openapi: 3.1.0
info: {title: T, version: 1.0}
paths: {}
components:
  schemas:
    Widget:
      type: object
      properties:
        id: {title: ID}
"#;

    #[test]
    fn test_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.yaml");
        fs::write(&path, DOC).unwrap();

        let cache = DocumentCache::new(&path);
        assert!(!cache.is_loaded());
        let first = cache.get().unwrap() as *const OpenApiDocument;

        // Changing the file after the first load has no effect.
        fs::write(&path, "not: [valid").unwrap();
        let second = cache.get().unwrap() as *const OpenApiDocument;
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_parse_leaves_cache_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.yaml");
        fs::write(&path, "openapi: 3.1.0\npaths: [1, 2]\n").unwrap();

        let cache = DocumentCache::new(&path);
        assert!(matches!(
            cache.get().unwrap_err(),
            AppError::InvalidSourceDocument(_)
        ));
        assert!(!cache.is_loaded());

        fs::write(&path, DOC).unwrap();
        assert!(cache.get().unwrap().schemas.contains_key("Widget"));
    }

    #[test]
    fn test_concurrent_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.yaml");
        fs::write(&path, DOC).unwrap();

        let cache = Arc::new(DocumentCache::new(&path));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let doc = cache.get().map_err(|e| e.to_string())?;
                    Ok::<_, String>((
                        doc as *const OpenApiDocument as usize,
                        doc.schemas["Widget"].properties["id"].title.clone(),
                    ))
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0].1, "ID");
    }
}
