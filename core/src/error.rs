//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Only `std::io::Error` converts implicitly; every other variant is built explicitly
/// at the point of detection.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The requested path has no entry under `paths`.
    #[from(ignore)]
    #[display("The '{_0}' endpoint is not declared in openapi")]
    EndpointNotDeclared(String),

    /// The path exists but declares no operation for the method.
    #[from(ignore)]
    #[display("Method '{method}' is not declared for endpoint '{path}'")]
    MethodNotSupported {
        /// Endpoint path as requested.
        path: String,
        /// Lower-cased HTTP method.
        method: String,
    },

    /// The `200` JSON response has no `$ref` to follow.
    #[from(ignore)]
    #[display("No schema reference declared for the 200 response of '{method} {path}'")]
    SchemaReferenceMissing {
        /// Endpoint path as requested.
        path: String,
        /// Lower-cased HTTP method.
        method: String,
    },

    /// The reference names a schema absent from `components/schemas`.
    #[from(ignore)]
    #[display("Schema '{_0}' is not defined in components/schemas")]
    SchemaDefinitionNotFound(String),

    /// The OpenAPI document failed to parse or validate.
    #[from(ignore)]
    #[display("Invalid openapi document: {_0}")]
    InvalidSourceDocument(String),

    /// The OpenAPI document does not exist at the configured location.
    #[from(ignore)]
    #[display("Unable to load openapi file {}", _0.display())]
    SourceDocumentNotFound(PathBuf),

    /// A mandatory option was not supplied.
    #[from(ignore)]
    #[display("The '{_0}' option is required")]
    MissingRequiredOption(String),

    /// A format or mode selector carried an unrecognised value.
    #[from(ignore)]
    #[display("Unsupported {name} '{value}'")]
    UnsupportedValue {
        /// Name of the selector (e.g. `ext`).
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A document encoder failed.
    #[from(ignore)]
    #[display("Render Error: {_0}")]
    Render(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[from(ignore)]
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
