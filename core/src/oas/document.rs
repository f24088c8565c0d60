#![deny(missing_docs)]

//! # OpenAPI Document Loading
//!
//! Parses an OpenAPI 3.x document (YAML or JSON) into the read-only
//! [`OpenApiDocument`] model:
//!
//! 1. Read the raw text into a generic value (integer response keys become strings).
//! 2. Normalize compatibility gaps (path extensions, boolean schemas).
//! 3. Deserialize the shim layer and validate the root.
//! 4. Dereference local `#/components/schemas/...` references inside schemas.
//!    Recursive references stop at the first repeat and stay unexpanded.

use crate::error::{AppError, AppResult};
use crate::oas::models::{
    OpenApiDocument, Operation, PathItem, PropertyKind, PropertySchema, ResponseSchema,
    SchemaDefinition,
};
use crate::oas::normalization::{normalize_boolean_schemas, strip_path_extensions};
use crate::oas::ref_utils::extract_component_name;
use crate::oas::shims::{ShimComponents, ShimMediaType, ShimOpenApi, ShimResponse, ShimSchema};
use indexmap::IndexMap;
use std::path::Path;
use utoipa::openapi::RefOr;

/// Reads and parses the OpenAPI document at `path`.
///
/// A missing file maps to [`AppError::SourceDocumentNotFound`]; anything that fails to
/// parse maps to [`AppError::InvalidSourceDocument`].
pub fn load_openapi_document(path: &Path) -> AppResult<OpenApiDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::SourceDocumentNotFound(path.to_path_buf()),
        _ => AppError::Io(e),
    })?;
    tracing::debug!(path = %path.display(), "parsing openapi document");
    parse_openapi_document(&content)
}

/// Parses a raw OpenAPI document. JSON is accepted as a subset of YAML.
pub fn parse_openapi_document(content: &str) -> AppResult<OpenApiDocument> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| AppError::InvalidSourceDocument(format!("Failed to parse YAML: {}", e)))?;
    let mut json_val = serde_json::to_value(yaml).map_err(|e| {
        AppError::InvalidSourceDocument(format!("Failed to convert document: {}", e))
    })?;

    if !json_val.is_object() {
        return Err(AppError::InvalidSourceDocument(
            "Document root must be an object".into(),
        ));
    }

    strip_path_extensions(&mut json_val);
    normalize_boolean_schemas(&mut json_val);

    let shim: ShimOpenApi = serde_json::from_value(json_val).map_err(|e| {
        AppError::InvalidSourceDocument(format!("Failed to parse OpenAPI structure: {}", e))
    })?;
    validate_openapi_root(&shim)?;

    build_document(&shim)
}

fn validate_openapi_root(shim: &ShimOpenApi) -> AppResult<()> {
    match (shim.openapi.as_deref(), shim.swagger.as_deref()) {
        (Some(version), _) if version.starts_with("3.") => Ok(()),
        (Some(version), _) => Err(AppError::InvalidSourceDocument(format!(
            "Unsupported OpenAPI version '{}'",
            version
        ))),
        (None, Some(version)) => Err(AppError::InvalidSourceDocument(format!(
            "Swagger {} documents are not supported, convert to OpenAPI 3.x",
            version
        ))),
        (None, None) => Err(AppError::InvalidSourceDocument(
            "Missing required 'openapi' version field".into(),
        )),
    }
}

fn build_document(shim: &ShimOpenApi) -> AppResult<OpenApiDocument> {
    let components = &shim.components;

    let mut schemas = IndexMap::new();
    for name in components.schemas.keys() {
        let mut stack = vec![name.clone()];
        let built = component_schema(components, name)
            .and_then(|schema| build_definition(schema, components, &mut stack));
        match built {
            Ok(definition) => {
                schemas.insert(name.clone(), definition);
            }
            // Endpoints pointing at it report SchemaDefinitionNotFound.
            Err(err) => tracing::warn!(schema = %name, error = %err, "skipping schema"),
        }
    }

    let mut paths = IndexMap::new();
    for (path, item) in &shim.paths {
        let mut operations = IndexMap::new();
        for (method, op) in item.operations() {
            let success_schema = op
                .responses
                .get("200")
                .and_then(|resp| follow_response(resp, components))
                .and_then(|resp| select_json_content(&resp.content))
                .and_then(|media| media.schema.as_ref())
                .map(response_schema);

            operations.insert(
                method.to_string(),
                Operation {
                    operation_id: op.operation_id.clone(),
                    success_schema,
                },
            );
        }
        paths.insert(path.clone(), PathItem { operations });
    }

    tracing::debug!(
        paths = paths.len(),
        schemas = schemas.len(),
        "openapi document loaded"
    );

    Ok(OpenApiDocument { paths, schemas })
}

/// Looks up a named component schema, following aliases (`Foo: { $ref: Bar }`).
fn component_schema<'a>(components: &'a ShimComponents, name: &str) -> AppResult<&'a ShimSchema> {
    let mut chain = vec![name.to_string()];
    loop {
        let current = chain.last().map(String::as_str).unwrap_or(name);
        let slot = components.schemas.get(current).ok_or_else(|| {
            AppError::InvalidSourceDocument(format!("Unresolved schema reference '{}'", current))
        })?;
        match slot {
            RefOr::T(schema) => return Ok(schema),
            RefOr::Ref(r) => {
                let target = local_schema_name(&r.ref_location)?;
                if chain.contains(&target) {
                    return Err(AppError::InvalidSourceDocument(format!(
                        "Cyclic schema alias: {} -> {}",
                        chain.join(" -> "),
                        target
                    )));
                }
                chain.push(target);
            }
        }
    }
}

fn build_definition(
    schema: &ShimSchema,
    components: &ShimComponents,
    stack: &mut Vec<String>,
) -> AppResult<SchemaDefinition> {
    let mut properties = IndexMap::new();
    for (key, slot) in &schema.properties {
        let title = slot.title.as_deref();
        let property = with_slot(
            &slot.schema,
            components,
            stack,
            |target| unexpanded_property(key, title, target),
            |prop, components, stack| build_property(key, title, prop, components, stack),
        )?;
        properties.insert(key.clone(), property);
    }

    Ok(SchemaDefinition {
        title: schema.title.clone(),
        properties,
    })
}

fn build_property(
    key: &str,
    title: Option<&str>,
    schema: &ShimSchema,
    components: &ShimComponents,
    stack: &mut Vec<String>,
) -> AppResult<PropertySchema> {
    let kind = PropertyKind::from(schema.type_name());

    let nested = match (&kind, schema.items.as_deref()) {
        (PropertyKind::Array, Some(items)) | (PropertyKind::Untyped, Some(items)) => with_slot(
            items,
            components,
            stack,
            |_| None,
            |item, components, stack| nested_definition(item, components, stack),
        )?,
        _ => nested_definition(schema, components, stack)?,
    };

    Ok(PropertySchema {
        title: property_title(key, title, schema),
        kind,
        nested,
    })
}

/// A property whose reference points back into the schema being built.
///
/// It keeps its title and kind but carries no nested schema, so its values
/// render as JSON text.
fn unexpanded_property(key: &str, title: Option<&str>, schema: &ShimSchema) -> PropertySchema {
    PropertySchema {
        title: property_title(key, title, schema),
        kind: PropertyKind::from(schema.type_name()),
        nested: None,
    }
}

/// Sibling title, then the schema's own title, then the key.
fn property_title(key: &str, title: Option<&str>, schema: &ShimSchema) -> String {
    match title.or(schema.title.as_deref()) {
        Some(title) => title.to_string(),
        None => {
            tracing::debug!(property = key, "property has no title, using its key");
            key.to_string()
        }
    }
}

fn nested_definition(
    schema: &ShimSchema,
    components: &ShimComponents,
    stack: &mut Vec<String>,
) -> AppResult<Option<SchemaDefinition>> {
    if schema.properties.is_empty() {
        return Ok(None);
    }
    build_definition(schema, components, stack).map(Some)
}

/// Runs `f` on the schema behind `slot`.
///
/// `stack` holds the component names currently being expanded. A reference back
/// into one of them is not followed: `on_cycle` gets the target schema instead.
fn with_slot<T>(
    slot: &RefOr<ShimSchema>,
    components: &ShimComponents,
    stack: &mut Vec<String>,
    on_cycle: impl FnOnce(&ShimSchema) -> T,
    f: impl FnOnce(&ShimSchema, &ShimComponents, &mut Vec<String>) -> AppResult<T>,
) -> AppResult<T> {
    match slot {
        RefOr::T(schema) => f(schema, components, stack),
        RefOr::Ref(r) => {
            let name = local_schema_name(&r.ref_location)?;
            let schema = component_schema(components, &name)?;
            if stack.contains(&name) {
                tracing::warn!(
                    schema = %name,
                    via = %stack.join(" -> "),
                    "recursive schema reference left unexpanded"
                );
                return Ok(on_cycle(schema));
            }
            stack.push(name);
            let result = f(schema, components, stack);
            stack.pop();
            result
        }
    }
}

fn local_schema_name(ref_location: &str) -> AppResult<String> {
    extract_component_name(ref_location, "schemas").ok_or_else(|| {
        AppError::InvalidSourceDocument(format!(
            "Only local schema references are supported, found '{}'",
            ref_location
        ))
    })
}

fn follow_response<'a>(
    slot: &'a RefOr<ShimResponse>,
    components: &'a ShimComponents,
) -> Option<&'a ShimResponse> {
    match slot {
        RefOr::T(resp) => Some(resp),
        RefOr::Ref(r) => {
            let name = extract_component_name(&r.ref_location, "responses")?;
            match components.responses.get(&name)? {
                RefOr::T(resp) => Some(resp),
                RefOr::Ref(_) => None,
            }
        }
    }
}

/// Selects the JSON response content.
///
/// Preference order:
/// 1. `application/json`
/// 2. Any `+json` media type (e.g. `application/vnd.api+json`)
fn select_json_content(content: &IndexMap<String, ShimMediaType>) -> Option<&ShimMediaType> {
    if let Some(media) = content.get("application/json") {
        return Some(media);
    }

    content
        .iter()
        .find(|(k, _)| k.ends_with("+json"))
        .map(|(_, media)| media)
}

fn response_schema(slot: &RefOr<ShimSchema>) -> ResponseSchema {
    match slot {
        RefOr::Ref(r) => ResponseSchema::Reference(Some(r.ref_location.clone())),
        RefOr::T(schema) if schema.type_name() == Some("array") => {
            let items_ref = schema.items.as_deref().and_then(|items| match items {
                RefOr::Ref(r) => Some(r.ref_location.clone()),
                RefOr::T(_) => None,
            });
            ResponseSchema::ArrayOf(items_ref)
        }
        RefOr::T(_) => ResponseSchema::Reference(None),
    }
}
