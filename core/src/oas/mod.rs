#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **document**: Loading and dereferencing of OpenAPI documents.
//! - **models**: The read-only document view the projector works on.
//! - **resolver**: Endpoint + method to response schema lookup.
//! - **cache**: Lazily populated document handle.

pub mod cache;
pub mod document;
pub mod models;
pub(crate) mod normalization;
pub mod ref_utils;
pub mod resolver;
pub(crate) mod shims;

pub use cache::DocumentCache;
pub use document::{load_openapi_document, parse_openapi_document};
pub use models::{
    OpenApiDocument, Operation, PathItem, PropertyKind, PropertySchema, ResponseSchema,
    SchemaDefinition, ORDINAL_KEY,
};
pub use resolver::{resolve_response, resolve_response_schema, ResolvedSchema};
