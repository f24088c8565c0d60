#![deny(missing_docs)]

//! # Document Shims
//!
//! Structures acting as an Intermediate Deserialization Layer.
//! They map directly to the OpenAPI objects export reads and ignore everything else.
//!
//! Note: shims do not derive `Debug` because `utoipa::RefOr` does not implement `Debug`.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use utoipa::openapi::RefOr;

/// Schema for the root document.
#[derive(Deserialize)]
pub struct ShimOpenApi {
    /// OpenAPI version (e.g. "3.1.0").
    pub openapi: Option<String>,

    /// Swagger version (e.g. "2.0"), only kept to reject it with a clear message.
    pub swagger: Option<String>,

    /// Path items keyed by path.
    #[serde(default)]
    pub paths: IndexMap<String, ShimPathItem>,

    /// Reusable components.
    #[serde(default)]
    pub components: ShimComponents,
}

/// The `components` section.
#[derive(Deserialize, Default)]
pub struct ShimComponents {
    /// `components/schemas`.
    #[serde(default)]
    pub schemas: IndexMap<String, RefOr<ShimSchema>>,

    /// `components/responses`.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ShimResponse>>,
}

/// A Path Item Object, restricted to its operations.
#[derive(Deserialize, Default)]
pub struct ShimPathItem {
    /// GET operation.
    pub get: Option<ShimOperation>,
    /// PUT operation.
    pub put: Option<ShimOperation>,
    /// POST operation.
    pub post: Option<ShimOperation>,
    /// DELETE operation.
    pub delete: Option<ShimOperation>,
    /// OPTIONS operation.
    pub options: Option<ShimOperation>,
    /// HEAD operation.
    pub head: Option<ShimOperation>,
    /// PATCH operation.
    pub patch: Option<ShimOperation>,
    /// TRACE operation.
    pub trace: Option<ShimOperation>,
}

impl ShimPathItem {
    /// Declared operations paired with their lower-cased method name.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &ShimOperation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
            ("trace", &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

/// An Operation Object, restricted to its identity and responses.
#[derive(Deserialize, Default)]
pub struct ShimOperation {
    /// `operationId`.
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ShimResponse>>,
}

/// A Response Object.
#[derive(Deserialize, Default)]
pub struct ShimResponse {
    /// Response bodies keyed by media type.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
}

/// A Media Type Object.
#[derive(Deserialize, Default)]
pub struct ShimMediaType {
    /// The body schema.
    pub schema: Option<RefOr<ShimSchema>>,
}

/// A Schema Object in the `object`/`properties` dialect.
#[derive(Deserialize, Default)]
pub struct ShimSchema {
    /// Display title.
    pub title: Option<String>,

    /// `type` keyword: a string, or a list of strings in OAS 3.1.
    #[serde(rename = "type")]
    pub schema_type: Option<Value>,

    /// Object properties in declaration order.
    #[serde(default)]
    pub properties: IndexMap<String, ShimProperty>,

    /// Array item schema.
    pub items: Option<Box<RefOr<ShimSchema>>>,
}

/// One entry of `properties`: a reference or inline schema plus its `title`.
///
/// OAS 3.1 allows `title` next to `$ref`; it overrides the referenced schema's own title.
/// For inline schemas the title lands here as well.
#[derive(Deserialize)]
pub struct ShimProperty {
    /// Title declared on the property itself.
    #[serde(default)]
    pub title: Option<String>,

    /// The reference or the inline schema.
    #[serde(flatten)]
    pub schema: RefOr<ShimSchema>,
}

impl ShimSchema {
    /// The declared type, ignoring `"null"` in OAS 3.1 type lists.
    pub fn type_name(&self) -> Option<&str> {
        match self.schema_type.as_ref()? {
            Value::String(s) => Some(s.as_str()),
            Value::Array(list) => list
                .iter()
                .filter_map(Value::as_str)
                .find(|t| *t != "null"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_skips_null_in_list() {
        let schema: ShimSchema =
            serde_json::from_value(serde_json::json!({ "type": ["null", "array"] })).unwrap();
        assert_eq!(schema.type_name(), Some("array"));
    }

    #[test]
    fn test_ref_property_deserializes_as_ref() {
        let schema: ShimSchema = serde_json::from_value(serde_json::json!({
            "type": "object",
            "properties": {
                "owner": { "$ref": "#/components/schemas/User" },
                "name": { "type": "string", "title": "Name" }
            }
        }))
        .unwrap();

        match &schema.properties["owner"].schema {
            RefOr::Ref(r) => assert_eq!(r.ref_location, "#/components/schemas/User"),
            RefOr::T(_) => panic!("expected a reference"),
        }
        let name = &schema.properties["name"];
        assert_eq!(name.title.as_deref(), Some("Name"));
        assert!(matches!(name.schema, RefOr::T(_)));
    }

    #[test]
    fn test_ref_property_keeps_sibling_title() {
        let schema: ShimSchema = serde_json::from_value(serde_json::json!({
            "properties": {
                "home": { "$ref": "#/components/schemas/Address", "title": "Home address" }
            }
        }))
        .unwrap();

        let home = &schema.properties["home"];
        assert_eq!(home.title.as_deref(), Some("Home address"));
        assert!(matches!(&home.schema, RefOr::Ref(r) if r.ref_location.ends_with("/Address")));
    }

    #[test]
    fn test_path_item_lists_declared_operations() {
        let item: ShimPathItem = serde_json::from_value(serde_json::json!({
            "get": { "responses": {} },
            "patch": { "operationId": "patchUser" }
        }))
        .unwrap();
        let methods: Vec<_> = item.operations().map(|(m, _)| m).collect();
        assert_eq!(methods, vec!["get", "patch"]);
    }
}
