#![deny(missing_docs)]

//! # Document Models
//!
//! The dereferenced, read-only view of an OpenAPI document that the resolver and
//! projector operate on. Built once by [`crate::oas::document`] and never mutated.

use indexmap::IndexMap;

/// Property key that is synthesised as a 1-based position instead of being read.
pub const ORDINAL_KEY: &str = "number";

/// A parsed OpenAPI document reduced to what export needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenApiDocument {
    /// Path items keyed by the literal path string (e.g. `/users`).
    pub paths: IndexMap<String, PathItem>,
    /// Named schemas from `components/schemas`.
    pub schemas: IndexMap<String, SchemaDefinition>,
}

/// The operations declared for a single path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    /// Operations keyed by lower-cased HTTP method.
    pub operations: IndexMap<String, Operation>,
}

impl PathItem {
    /// Looks up an operation; the method is matched case-insensitively.
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        self.operations.get(&method.to_ascii_lowercase())
    }
}

/// The slice of an Operation Object that describes its successful JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    /// `operationId`, when declared.
    pub operation_id: Option<String>,
    /// Schema of the `200` / `application/json` response, when declared.
    pub success_schema: Option<ResponseSchema>,
}

/// How the `200` JSON response body points at its component schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSchema {
    /// `schema: { $ref: ... }` or an inline schema carrying a `$ref`.
    Reference(Option<String>),
    /// `schema: { type: array, items: { $ref: ... } }`.
    ArrayOf(Option<String>),
}

impl ResponseSchema {
    /// The raw `$ref` pointer the response leads to.
    pub fn reference(&self) -> Option<&str> {
        match self {
            ResponseSchema::Reference(r) | ResponseSchema::ArrayOf(r) => r.as_deref(),
        }
    }

    /// True when the body is declared as an array of records.
    pub fn is_array(&self) -> bool {
        matches!(self, ResponseSchema::ArrayOf(_))
    }
}

/// One object schema: its properties in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDefinition {
    /// Optional schema title.
    pub title: Option<String>,
    /// Properties keyed by name. Iteration order is declaration order.
    pub properties: IndexMap<String, PropertySchema>,
}

impl SchemaDefinition {
    /// Properties in declaration order.
    pub fn ordered_properties(&self) -> impl Iterator<Item = (&str, &PropertySchema)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared properties, including the ordinal.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when the schema declares no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Metadata for one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    /// Human readable label used as column header or row label.
    pub title: String,
    /// The declared `type`.
    pub kind: PropertyKind,
    /// Shape of an object property, or of the items of an array property.
    pub nested: Option<SchemaDefinition>,
}

impl PropertySchema {
    /// Builds a scalar-typed property with the given title.
    pub fn scalar(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: PropertyKind::Untyped,
            nested: None,
        }
    }

    /// Builds an `object` property with a nested schema.
    pub fn object(title: impl Into<String>, nested: SchemaDefinition) -> Self {
        Self {
            title: title.into(),
            kind: PropertyKind::Object,
            nested: Some(nested),
        }
    }

    /// Builds an `array` property whose items follow `nested`.
    pub fn array(title: impl Into<String>, nested: SchemaDefinition) -> Self {
        Self {
            title: title.into(),
            kind: PropertyKind::Array,
            nested: Some(nested),
        }
    }
}

/// The `type` discriminator of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    /// `type: array`
    Array,
    /// `type: object`
    Object,
    /// Any other declared type (`string`, `integer`, ...).
    Scalar(String),
    /// No `type` keyword.
    Untyped,
}

impl From<Option<&str>> for PropertyKind {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some("array") => PropertyKind::Array,
            Some("object") => PropertyKind::Object,
            Some(other) => PropertyKind::Scalar(other.to_string()),
            None => PropertyKind::Untyped,
        }
    }
}

impl FromIterator<(String, PropertySchema)> for SchemaDefinition {
    fn from_iter<T: IntoIterator<Item = (String, PropertySchema)>>(iter: T) -> Self {
        Self {
            title: None,
            properties: iter.into_iter().collect(),
        }
    }
}
