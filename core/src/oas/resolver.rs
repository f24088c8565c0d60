#![deny(missing_docs)]

//! # Response Schema Resolution
//!
//! Maps an `(endpoint, method)` pair onto the component schema its `200` JSON
//! response declares.

use crate::error::{AppError, AppResult};
use crate::oas::models::{OpenApiDocument, SchemaDefinition};
use crate::oas::ref_utils::last_segment_name;

/// A schema located through an endpoint's success response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSchema<'a> {
    /// Component name the response points at.
    pub name: &'a str,
    /// The schema itself.
    pub schema: &'a SchemaDefinition,
    /// True when the response body is declared as `type: array`.
    pub is_array: bool,
}

/// Resolves the property map of the `200` JSON response of `method path`.
///
/// # Errors
///
/// * [`AppError::EndpointNotDeclared`] when `path` is not a key of `paths`.
/// * [`AppError::MethodNotSupported`] when the path declares no such method.
/// * [`AppError::SchemaReferenceMissing`] when the response carries no `$ref`.
/// * [`AppError::SchemaDefinitionNotFound`] when the reference names an unknown schema.
pub fn resolve_response_schema<'a>(
    document: &'a OpenApiDocument,
    path: &str,
    method: &str,
) -> AppResult<&'a SchemaDefinition> {
    resolve_response(document, path, method).map(|resolved| resolved.schema)
}

/// Like [`resolve_response_schema`] but also reports the schema name and array-ness.
pub fn resolve_response<'a>(
    document: &'a OpenApiDocument,
    path: &str,
    method: &str,
) -> AppResult<ResolvedSchema<'a>> {
    let method = method.to_ascii_lowercase();

    let item = document
        .paths
        .get(path)
        .ok_or_else(|| AppError::EndpointNotDeclared(path.to_string()))?;

    let operation = item
        .operation(&method)
        .ok_or_else(|| AppError::MethodNotSupported {
            path: path.to_string(),
            method: method.clone(),
        })?;

    let missing_ref = || AppError::SchemaReferenceMissing {
        path: path.to_string(),
        method: method.clone(),
    };

    let response = operation.success_schema.as_ref().ok_or_else(missing_ref)?;
    let reference = response.reference().ok_or_else(missing_ref)?;
    let name = last_segment_name(reference).ok_or_else(missing_ref)?;

    let (name, schema) = document
        .schemas
        .get_key_value(&name)
        .ok_or(AppError::SchemaDefinitionNotFound(name))?;

    tracing::debug!(
        path,
        method = %method,
        schema = %name,
        properties = schema.len(),
        "resolved response schema"
    );

    Ok(ResolvedSchema {
        name: name.as_str(),
        schema,
        is_array: response.is_array(),
    })
}
