#![deny(missing_docs)]

//! # OpenAPI Normalization
//!
//! Helpers that normalize OpenAPI documents into a more uniform shape before
//! deserializing into shims. These functions only rewrite fields that are known
//! compatibility gaps.

use serde_json::{json, Map, Value};

/// Drops specification extensions (`x-...`) from the Paths Object.
///
/// Extensions may hold arbitrary values and would otherwise be read as path items.
pub(crate) fn strip_path_extensions(value: &mut Value) {
    if let Some(paths) = value.get_mut("paths").and_then(|p| p.as_object_mut()) {
        paths.retain(|key, _| !key.starts_with("x-"));
    }
}

/// Normalizes boolean schemas (`true` / `false`) into object schemas.
///
/// OpenAPI 3.1+ permits boolean schemas anywhere a Schema Object is accepted.
///
/// - `true` becomes `{}` (accepts any instance)
/// - `false` becomes an unsatisfiable object schema
pub(crate) fn normalize_boolean_schemas(value: &mut Value) {
    if let Some(schemas) = value
        .get_mut("components")
        .and_then(|c| c.get_mut("schemas"))
        .and_then(|s| s.as_object_mut())
    {
        for schema in schemas.values_mut() {
            normalize_schema_node(schema);
        }
    }
}

fn normalize_schema_node(node: &mut Value) {
    match node {
        Value::Bool(true) => *node = Value::Object(Map::new()),
        Value::Bool(false) => *node = json!({ "not": {} }),
        Value::Object(map) => {
            if let Some(props) = map.get_mut("properties").and_then(|p| p.as_object_mut()) {
                for prop in props.values_mut() {
                    normalize_schema_node(prop);
                }
            }
            if let Some(items) = map.get_mut("items") {
                normalize_schema_node(items);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_path_extensions() {
        let mut doc = json!({
            "paths": {
                "/users": { "get": {} },
                "x-internal": true
            }
        });
        strip_path_extensions(&mut doc);
        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths.contains_key("/users"));
    }

    #[test]
    fn test_boolean_property_schemas() {
        let mut doc = json!({
            "components": {
                "schemas": {
                    "Any": true,
                    "User": {
                        "properties": {
                            "meta": true,
                            "tags": { "type": "array", "items": false }
                        }
                    }
                }
            }
        });
        normalize_boolean_schemas(&mut doc);
        assert_eq!(doc["components"]["schemas"]["Any"], json!({}));
        assert_eq!(
            doc["components"]["schemas"]["User"]["properties"]["meta"],
            json!({})
        );
        assert_eq!(
            doc["components"]["schemas"]["User"]["properties"]["tags"]["items"],
            json!({ "not": {} })
        );
    }
}
