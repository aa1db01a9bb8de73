//! OpenAPI document parser
//!
//! Walks the raw JSON value of an OpenAPI 3.0 document and builds the
//! [`ApiDocument`] model the generation core consumes:
//! - Validation of the `openapi` version and the `info` object
//! - Component schemas, with local `$ref` resolution and cycle cutting
//! - Path items, operations and their merged parameters
//! - Request bodies and responses (including `$ref`'d ones)

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::types::{
    ApiDocument, ApiInfo, HttpMethod, MediaTypeNode, OperationNode, ParameterLocation,
    ParameterNode, PathItem, RequestBodyNode, ResponseNode, SchemaNode,
};
use crate::generation::GenerationError;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
const MAX_REF_DEPTH: usize = 16;
/// Nested schema `$ref`s expanded with a body; deeper ones become named stubs
const MAX_SCHEMA_EXPANSION: usize = 2;

/// OpenAPI document parser
pub struct OpenApiParser {
    /// The raw JSON value of the OpenAPI document
    json: JsonValue,
}

impl OpenApiParser {
    /// Create a new parser from JSON content
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    /// Validate the document and parse it into the domain model
    pub fn parse(&self) -> Result<ApiDocument, GenerationError> {
        let openapi_version = self.validate_version()?;
        let info = self.parse_info()?;

        // Structural check against the 3.0 object model
        serde_json::from_value::<openapiv3::OpenAPI>(self.json.clone()).map_err(|e| {
            GenerationError::ValidationError(format!("Invalid OpenAPI document: {e}"))
        })?;

        let schemas = self.parse_components();
        let paths = self.parse_paths();
        debug!(
            schemas = schemas.len(),
            paths = paths.len(),
            "Parsed OpenAPI document"
        );

        Ok(ApiDocument {
            openapi_version,
            info,
            schemas,
            paths,
        })
    }

    fn validate_version(&self) -> Result<String, GenerationError> {
        let version = self
            .json
            .get("openapi")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| {
                GenerationError::ValidationError("Missing 'openapi' version field".to_string())
            })?;

        if !version.starts_with("3.0") {
            return Err(GenerationError::ValidationError(format!(
                "Unsupported OpenAPI version '{version}' (expected 3.0.x)"
            )));
        }
        Ok(version.to_string())
    }

    fn parse_info(&self) -> Result<ApiInfo, GenerationError> {
        let raw = self
            .json
            .get("info")
            .ok_or_else(|| GenerationError::ValidationError("Missing 'info' object".to_string()))?;

        let info: openapiv3::Info = serde_json::from_value(raw.clone())
            .map_err(|e| GenerationError::ValidationError(format!("Invalid 'info' object: {e}")))?;

        Ok(ApiInfo {
            title: info.title,
            version: info.version,
            description: info.description,
        })
    }

    /// Parse `components.schemas`, preserving declaration order
    fn parse_components(&self) -> IndexMap<String, SchemaNode> {
        let Some(schemas) = self
            .json
            .pointer("/components/schemas")
            .and_then(JsonValue::as_object)
        else {
            return IndexMap::new();
        };

        schemas
            .iter()
            .map(|(name, value)| {
                let mut visiting = vec![format!("{SCHEMA_REF_PREFIX}{}", escape_pointer(name))];
                (name.clone(), self.parse_schema(value, &mut visiting))
            })
            .collect()
    }

    fn parse_paths(&self) -> IndexMap<String, PathItem> {
        let Some(paths) = self.json.get("paths").and_then(JsonValue::as_object) else {
            return IndexMap::new();
        };

        paths
            .iter()
            .map(|(path, raw_item)| {
                let raw_item = self.dereference(raw_item);
                let operations = HttpMethod::all()
                    .iter()
                    .filter_map(|method| {
                        let method_item = raw_item.get(method.to_string())?;
                        self.build_operation(path, *method, raw_item, method_item)
                            .map(|operation| (*method, operation))
                    })
                    .collect();
                (path.clone(), PathItem { operations })
            })
            .collect()
    }

    /// Build an operation; operations without an `operationId` are skipped
    fn build_operation(
        &self,
        path: &str,
        method: HttpMethod,
        path_item: &JsonValue,
        method_item: &JsonValue,
    ) -> Option<OperationNode> {
        let Some(operation_id) = method_item.get("operationId").and_then(JsonValue::as_str) else {
            debug!(%path, %method, "Skipping operation without operationId");
            return None;
        };

        // Operation-level parameters override path-level ones with the same name and location
        let mut parameters = self.extract_parameters(path_item);
        for param in self.extract_parameters(method_item) {
            match parameters
                .iter_mut()
                .find(|p| p.name == param.name && p.location == param.location)
            {
                Some(existing) => *existing = param,
                None => parameters.push(param),
            }
        }

        let request_body = method_item
            .get("requestBody")
            .map(|body| self.parse_request_body(body));

        Some(OperationNode {
            operation_id: operation_id.to_string(),
            summary: string_field(method_item, "summary"),
            description: string_field(method_item, "description"),
            tags: method_item
                .get("tags")
                .and_then(JsonValue::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(JsonValue::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            parameters,
            request_body,
            responses: self.extract_responses(method_item),
        })
    }

    fn extract_parameters(&self, item: &JsonValue) -> Vec<ParameterNode> {
        item.get("parameters")
            .and_then(JsonValue::as_array)
            .map(|params| {
                params
                    .iter()
                    .filter_map(|param| match self.parse_parameter(self.dereference(param)) {
                        Ok(param) => Some(param),
                        Err(e) => {
                            debug!(error = %e, "Skipping unreadable parameter");
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parse_parameter(&self, param: &JsonValue) -> Result<ParameterNode, GenerationError> {
        let name = param
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| GenerationError::ValidationError("Parameter missing name".to_string()))?
            .to_string();

        let location = match param.get("in").and_then(JsonValue::as_str) {
            Some("path") => ParameterLocation::Path,
            Some("query") => ParameterLocation::Query,
            Some("header") => ParameterLocation::Header,
            Some("cookie") => ParameterLocation::Cookie,
            other => {
                return Err(GenerationError::ValidationError(format!(
                    "Invalid location {other:?} for parameter '{name}'"
                )));
            }
        };

        Ok(ParameterNode {
            required: param
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(location == ParameterLocation::Path),
            schema: param
                .get("schema")
                .map(|schema| self.parse_schema(schema, &mut Vec::new())),
            description: string_field(param, "description"),
            name,
            location,
        })
    }

    fn parse_request_body(&self, body: &JsonValue) -> RequestBodyNode {
        let body = self.dereference(body);
        RequestBodyNode {
            required: body
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
            content: self.parse_content(body.get("content")),
        }
    }

    fn extract_responses(&self, method_item: &JsonValue) -> IndexMap<String, ResponseNode> {
        let Some(responses) = method_item.get("responses").and_then(JsonValue::as_object) else {
            return IndexMap::new();
        };

        responses
            .iter()
            .map(|(status, response)| {
                let response = self.dereference(response);
                (
                    status.clone(),
                    ResponseNode {
                        description: string_field(response, "description"),
                        content: self.parse_content(response.get("content")),
                    },
                )
            })
            .collect()
    }

    fn parse_content(&self, content: Option<&JsonValue>) -> IndexMap<String, MediaTypeNode> {
        content
            .and_then(JsonValue::as_object)
            .map(|media_types| {
                media_types
                    .iter()
                    .map(|(media_type, entry)| {
                        let schema = entry
                            .get("schema")
                            .map(|schema| self.parse_schema(schema, &mut Vec::new()));
                        (media_type.clone(), MediaTypeNode { schema })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parse a schema value, resolving `$ref`s.
    ///
    /// `visiting` holds the reference strings currently being expanded; a
    /// reference already on the stack closes a cycle and yields a named
    /// node without a body. Past [`MAX_SCHEMA_EXPANSION`] nested references
    /// only the target's scalar keywords are kept, so shared references
    /// cost the same as a tree.
    fn parse_schema(&self, value: &JsonValue, visiting: &mut Vec<String>) -> SchemaNode {
        if let Some(ref_str) = value.get("$ref").and_then(JsonValue::as_str) {
            return self.parse_schema_ref(ref_str, visiting);
        }

        let Some(obj) = value.as_object() else {
            return SchemaNode::default();
        };

        if let Some(members) = obj.get("allOf").and_then(JsonValue::as_array) {
            let mut merged = self.merge_all_of(members, visiting);
            if let Some(description) = string_field(value, "description") {
                merged.description = Some(description);
            }
            merged.nullable |= obj.get("nullable").and_then(JsonValue::as_bool).unwrap_or(false);
            return merged;
        }

        let mut node = SchemaNode::default();
        match obj.get("type") {
            Some(JsonValue::String(schema_type)) => node.schema_type = Some(schema_type.clone()),
            Some(JsonValue::Array(types)) => {
                for schema_type in types.iter().filter_map(JsonValue::as_str) {
                    if schema_type == "null" {
                        node.nullable = true;
                    } else if node.schema_type.is_none() {
                        node.schema_type = Some(schema_type.to_string());
                    }
                }
            }
            _ => {}
        }
        if node.schema_type.is_none() && obj.contains_key("properties") {
            node.schema_type = Some("object".to_string());
        }

        node.format = string_field(value, "format");
        node.description = string_field(value, "description");
        node.pattern = string_field(value, "pattern");
        node.nullable |= obj.get("nullable").and_then(JsonValue::as_bool).unwrap_or(false);
        node.min_length = obj.get("minLength").and_then(JsonValue::as_u64);
        node.max_length = obj.get("maxLength").and_then(JsonValue::as_u64);
        node.minimum = obj.get("minimum").and_then(JsonValue::as_f64);
        node.maximum = obj.get("maximum").and_then(JsonValue::as_f64);
        node.enum_values = obj
            .get("enum")
            .and_then(JsonValue::as_array)
            .cloned()
            .unwrap_or_default();
        node.items = obj
            .get("items")
            .map(|items| Box::new(self.parse_schema(items, visiting)));
        node.required = obj
            .get("required")
            .and_then(JsonValue::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(JsonValue::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        if let Some(properties) = obj.get("properties").and_then(JsonValue::as_object) {
            for (name, property) in properties {
                let parsed = property
                    .is_object()
                    .then(|| self.parse_schema(property, visiting));
                node.properties.insert(name.clone(), parsed);
            }
        }

        node.additional_properties = match obj.get("additionalProperties") {
            Some(JsonValue::Bool(true)) => Some(Box::new(SchemaNode::default())),
            Some(schema) if schema.is_object() => {
                Some(Box::new(self.parse_schema(schema, visiting)))
            }
            _ => None,
        };

        node
    }

    fn parse_schema_ref(&self, ref_str: &str, visiting: &mut Vec<String>) -> SchemaNode {
        let component_name = ref_str.strip_prefix(SCHEMA_REF_PREFIX).map(unescape_pointer);

        if visiting.iter().any(|seen| seen == ref_str) {
            return SchemaNode {
                reference: component_name,
                ..SchemaNode::default()
            };
        }

        let target = match self.resolve_ref(ref_str) {
            Ok(target) => target,
            Err(e) => {
                warn!(error = %e, "Treating unresolvable schema reference as untyped");
                return SchemaNode::default();
            }
        };

        if visiting.len() >= MAX_SCHEMA_EXPANSION {
            return self.reference_stub(target, component_name);
        }

        visiting.push(ref_str.to_string());
        let mut node = self.parse_schema(target, visiting);
        visiting.pop();

        if component_name.is_some() {
            node.reference = component_name;
        }
        node
    }

    /// Named node with the target's scalar keywords and no nested schemas
    fn reference_stub(&self, target: &JsonValue, reference: Option<String>) -> SchemaNode {
        let target = self.dereference(target);
        let schema_type = string_field(target, "type").or_else(|| {
            (target.get("properties").is_some() || target.get("allOf").is_some())
                .then(|| "object".to_string())
        });
        SchemaNode {
            reference,
            schema_type,
            format: string_field(target, "format"),
            description: string_field(target, "description"),
            nullable: target
                .get("nullable")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
            enum_values: target
                .get("enum")
                .and_then(JsonValue::as_array)
                .cloned()
                .unwrap_or_default(),
            ..SchemaNode::default()
        }
    }

    /// Single-member `allOf` is unwrapped; otherwise object members are merged
    fn merge_all_of(&self, members: &[JsonValue], visiting: &mut Vec<String>) -> SchemaNode {
        if let [single] = members {
            return self.parse_schema(single, visiting);
        }

        let mut merged = SchemaNode::of_type("object");
        for member in members {
            let part = self.parse_schema(member, visiting);
            if merged.description.is_none() {
                merged.description = part.description;
            }
            merged.required.extend(part.required);
            merged.properties.extend(part.properties);
        }
        merged
    }

    /// Follow `$ref` chains for non-schema objects (parameters, bodies, responses)
    fn dereference<'a>(&'a self, value: &'a JsonValue) -> &'a JsonValue {
        let mut current = value;
        for _ in 0..MAX_REF_DEPTH {
            match current
                .get("$ref")
                .and_then(JsonValue::as_str)
                .and_then(|ref_str| self.resolve_ref(ref_str).ok())
            {
                Some(target) => current = target,
                None => break,
            }
        }
        current
    }

    /// Resolve a local `$ref` reference
    fn resolve_ref(&self, ref_str: &str) -> Result<&JsonValue, GenerationError> {
        if let Some(pointer) = ref_str.strip_prefix('#') {
            self.json.pointer(pointer).ok_or_else(|| {
                GenerationError::ValidationError(format!("Unable to resolve reference: {ref_str}"))
            })
        } else {
            Err(GenerationError::ValidationError(format!(
                "External references not supported: {ref_str}"
            )))
        }
    }
}

fn string_field(value: &JsonValue, key: &str) -> Option<String> {
    value.get(key).and_then(JsonValue::as_str).map(String::from)
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
