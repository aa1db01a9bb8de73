//! Parsed OpenAPI document model
//!
//! The parser turns the raw JSON/YAML document into these types with every
//! local `$ref` resolved. The generation core only ever reads them.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::fmt;

/// API metadata from the `info` object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

/// A schema node with references already resolved
///
/// `reference` carries the component name when the node was reached through
/// `#/components/schemas/<name>`. A node that closes a reference cycle keeps
/// its name but no body; a deeply nested reference keeps its name and scalar
/// keywords only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    pub reference: Option<String>,
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub items: Option<Box<SchemaNode>>,
    /// `None` marks a property whose value could not be read as a schema.
    pub properties: IndexMap<String, Option<SchemaNode>>,
    pub required: BTreeSet<String>,
    pub enum_values: Vec<JsonValue>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub pattern: Option<String>,
    pub nullable: bool,
    pub additional_properties: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Create a node of the given primitive type
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_items(mut self, items: SchemaNode) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn with_property(mut self, name: &str, schema: SchemaNode) -> Self {
        self.properties.insert(name.to_string(), Some(schema));
        self
    }

    pub fn with_required(mut self, names: &[&str]) -> Self {
        self.required.extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn with_reference(mut self, name: &str) -> Self {
        self.reference = Some(name.to_string());
        self
    }

    pub fn is_type(&self, schema_type: &str) -> bool {
        self.schema_type.as_deref() == Some(schema_type)
    }

    pub fn is_array(&self) -> bool {
        self.is_type("array")
    }

    /// String enum values, in declaration order
    pub fn string_enum_values(&self) -> Vec<String> {
        self.enum_values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

/// HTTP methods an OpenAPI path item can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Get all HTTP methods in document scan order
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Head,
            HttpMethod::Options,
        ]
    }

    /// Uppercase method label, as used on the wire
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "get"),
            HttpMethod::Post => write!(f, "post"),
            HttpMethod::Put => write!(f, "put"),
            HttpMethod::Delete => write!(f, "delete"),
            HttpMethod::Patch => write!(f, "patch"),
            HttpMethod::Head => write!(f, "head"),
            HttpMethod::Options => write!(f, "options"),
        }
    }
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// Operation parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<SchemaNode>,
    pub description: Option<String>,
}

/// One media type entry of a `content` map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaTypeNode {
    pub schema: Option<SchemaNode>,
}

/// Picks `application/json` when declared, else the first media type.
fn preferred_media(content: &IndexMap<String, MediaTypeNode>) -> Option<&MediaTypeNode> {
    content
        .get("application/json")
        .or_else(|| content.values().next())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBodyNode {
    pub required: bool,
    pub content: IndexMap<String, MediaTypeNode>,
}

impl RequestBodyNode {
    pub fn preferred_schema(&self) -> Option<&SchemaNode> {
        preferred_media(&self.content).and_then(|media| media.schema.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseNode {
    pub description: Option<String>,
    pub content: IndexMap<String, MediaTypeNode>,
}

impl ResponseNode {
    pub fn preferred_schema(&self) -> Option<&SchemaNode> {
        preferred_media(&self.content).and_then(|media| media.schema.as_ref())
    }
}

/// A single operation under a path item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationNode {
    pub operation_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Path-level and operation-level parameters, merged
    pub parameters: Vec<ParameterNode>,
    pub request_body: Option<RequestBodyNode>,
    /// Keyed by status code string, in document order
    pub responses: IndexMap<String, ResponseNode>,
}

/// The operations declared under one path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    pub operations: IndexMap<HttpMethod, OperationNode>,
}

/// Borrowed view of one operation together with its location
#[derive(Debug, Clone, Copy)]
pub struct OperationRef<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub path_item: &'a PathItem,
    pub operation: &'a OperationNode,
}

/// A loaded and validated OpenAPI document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiDocument {
    pub openapi_version: String,
    pub info: ApiInfo,
    pub schemas: IndexMap<String, SchemaNode>,
    pub paths: IndexMap<String, PathItem>,
}

impl ApiDocument {
    pub fn info(&self) -> &ApiInfo {
        &self.info
    }

    pub fn schemas(&self) -> &IndexMap<String, SchemaNode> {
        &self.schemas
    }

    /// Look up a component schema by name
    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    pub fn paths(&self) -> &IndexMap<String, PathItem> {
        &self.paths
    }

    /// Iterate every operation in path order, then method order
    pub fn operations(&self) -> impl Iterator<Item = OperationRef<'_>> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations.iter().map(move |(method, operation)| OperationRef {
                path: path.as_str(),
                method: *method,
                path_item: item,
                operation,
            })
        })
    }

    /// Look up an operation by its `operationId`
    pub fn operation(&self, operation_id: &str) -> Option<OperationRef<'_>> {
        self.operations()
            .find(|op| op.operation.operation_id == operation_id)
    }

    /// All operations carrying the given tag
    pub fn operations_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = OperationRef<'a>> {
        self.operations()
            .filter(move |op| op.operation.tags.iter().any(|t| t == tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(id: &str, tags: &[&str]) -> OperationNode {
        OperationNode {
            operation_id: id.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..OperationNode::default()
        }
    }

    fn document() -> ApiDocument {
        let mut pets = PathItem::default();
        pets.operations
            .insert(HttpMethod::Get, operation("listPets", &["pets"]));
        pets.operations
            .insert(HttpMethod::Post, operation("createPet", &["pets"]));
        let mut users = PathItem::default();
        users
            .operations
            .insert(HttpMethod::Get, operation("listUsers", &["users"]));

        let mut doc = ApiDocument::default();
        doc.paths.insert("/pets".to_string(), pets);
        doc.paths.insert("/users".to_string(), users);
        doc.schemas
            .insert("Pet".to_string(), SchemaNode::of_type("object"));
        doc
    }

    #[test]
    fn test_operations_follow_document_order() {
        let doc = document();
        let ids: Vec<_> = doc
            .operations()
            .map(|op| op.operation.operation_id.as_str())
            .collect();
        assert_eq!(ids, vec!["listPets", "createPet", "listUsers"]);
    }

    #[test]
    fn test_lookup_accessors() {
        let doc = document();
        let op = doc.operation("createPet").expect("operation exists");
        assert_eq!(op.path, "/pets");
        assert_eq!(op.method, HttpMethod::Post);
        assert!(doc.operation("deletePet").is_none());
        assert_eq!(doc.operations_by_tag("pets").count(), 2);
        assert!(doc.schema("Pet").is_some());
        assert!(doc.schema("Order").is_none());
    }

    #[test]
    fn test_preferred_media_type() {
        let mut body = RequestBodyNode::default();
        body.content.insert(
            "application/xml".to_string(),
            MediaTypeNode {
                schema: Some(SchemaNode::of_type("string")),
            },
        );
        assert!(body.preferred_schema().unwrap().is_type("string"));

        body.content.insert(
            "application/json".to_string(),
            MediaTypeNode {
                schema: Some(SchemaNode::of_type("object")),
            },
        );
        assert!(body.preferred_schema().unwrap().is_type("object"));
    }

    #[test]
    fn test_string_enum_values_skip_non_strings() {
        let mut schema = SchemaNode::of_type("string");
        schema.enum_values = vec![
            JsonValue::from("available"),
            JsonValue::Null,
            JsonValue::from("sold"),
        ];
        assert_eq!(schema.string_enum_values(), vec!["available", "sold"]);
    }
}
