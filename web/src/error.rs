//! # Error Responses
//!
//! Maps [`AppError`] onto HTTP responses for the export middleware.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use docex_core::AppError;

/// An export that failed after the middleware took over the request.
///
/// Bad `ext`/`type` selectors are the caller's fault (`400`); anything else,
/// including an endpoint missing from the OpenAPI document, is a server
/// misconfiguration (`500`). The body is always `{"error": "<message>"}`.
#[derive(Debug, Display)]
#[display("{_0}")]
pub struct ExportFailure(pub AppError);

impl From<AppError> for ExportFailure {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl std::error::Error for ExportFailure {}

impl ResponseError for ExportFailure {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::UnsupportedValue { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.0.to_string(),
        }))
    }
}
