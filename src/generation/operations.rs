//! Operation resolution
//!
//! Resolves each OpenAPI operation into the data an HTTP handler needs:
//! method and path, typed path/query parameters, the synthesized request
//! type, the response type and success status, and a CRUD classification.
//! Classification happens in the same pass that locates the operation, while
//! the method label is at hand.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::generation::GenerationError;
use crate::generation::sanitizers::sanitize_comment;
use crate::generation::type_mapper::{TypeExpression, map_parameter_type, map_type};
use crate::generation::utils::{
    to_field_identifier, to_package_name, to_pascal_case, unique_identifier,
};
use crate::infrastructure::openapi::{
    ApiDocument, HttpMethod, OperationNode, OperationRef, ParameterLocation, ParameterNode,
    ResponseNode, SchemaNode,
};

/// Properties a creation request never carries
const SERVER_ASSIGNED_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudRole {
    Create,
    Get,
    List,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDescriptor {
    pub param_name: String,
    /// Field of the per-operation request struct holding the parsed value
    pub field_name: String,
    #[serde(rename = "type")]
    pub type_expr: TypeExpression,
    pub required: bool,
    /// Value substituted into sample request paths in generated tests
    pub sample_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: TypeExpression,
    pub json_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBodyDescriptor {
    pub type_name: String,
    pub fields: Vec<RequestField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    pub operation_id: String,
    /// Exported Go method name, `PascalCase(operationId)`
    pub handler_name: String,
    /// Lowercased operation id, used for file names
    pub file_stem: String,
    pub http_method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub path_params: Vec<ParamDescriptor>,
    pub query_params: Vec<ParamDescriptor>,
    pub request_body: Option<RequestBodyDescriptor>,
    pub response_type: Option<TypeExpression>,
    pub success_status: u16,
    pub resource_tag: String,
    pub resource_name: String,
    pub service_interface: String,
    pub crud_role: Option<CrudRole>,
    pub requires_time_import: bool,
    pub request_requires_time: bool,
    pub response_requires_time: bool,
    pub request_uses_package: bool,
    pub response_uses_package: bool,
    pub needs_strconv: bool,
    pub needs_chi: bool,
    /// Request path with parameters replaced by sample values
    pub sample_path: String,
}

/// Operations bucketed by their primary tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGroup {
    pub name: String,
    /// Go package / directory name
    pub domain: String,
    pub base_path: String,
    pub operations: Vec<OperationDescriptor>,
    pub response_requires_time: bool,
    pub response_uses_package: bool,
}

/// Which operation id fills each CRUD role for a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrudOperations {
    pub create: Option<String>,
    pub get: Option<String>,
    pub list: Option<String>,
    pub update: Option<String>,
    pub delete: Option<String>,
}

impl CrudOperations {
    fn slot(&mut self, role: CrudRole) -> &mut Option<String> {
        match role {
            CrudRole::Create => &mut self.create,
            CrudRole::Get => &mut self.get,
            CrudRole::List => &mut self.list,
            CrudRole::Update => &mut self.update,
            CrudRole::Delete => &mut self.delete,
        }
    }

    pub fn has(&self, role: CrudRole) -> bool {
        match role {
            CrudRole::Create => self.create.is_some(),
            CrudRole::Get => self.get.is_some(),
            CrudRole::List => self.list.is_some(),
            CrudRole::Update => self.update.is_some(),
            CrudRole::Delete => self.delete.is_some(),
        }
    }
}

/// Resolves operations against one document
pub struct OperationResolver<'a> {
    document: &'a ApiDocument,
    package_name: &'a str,
}

struct LocatedOperation<'a> {
    op: OperationRef<'a>,
    crud_role: Option<CrudRole>,
}

impl<'a> OperationResolver<'a> {
    /// `package_name` qualifies references to domain types
    pub fn new(document: &'a ApiDocument, package_name: &'a str) -> Self {
        Self {
            document,
            package_name,
        }
    }

    /// Resolve a single operation by id
    pub fn resolve(&self, operation_id: &str) -> Result<OperationDescriptor, GenerationError> {
        let located = self.locate(operation_id)?;
        self.describe(&located)
    }

    /// Resolve every operation in document order.
    ///
    /// Failures are collected rather than returned early so one bad
    /// operation does not hide the others.
    pub fn resolve_all(&self) -> (Vec<OperationDescriptor>, Vec<GenerationError>) {
        let mut descriptors = Vec::new();
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for op in self.document.operations() {
            let operation_id = op.operation.operation_id.as_str();
            if !seen.insert(operation_id) {
                errors.push(GenerationError::OperationResolutionError {
                    operation_id: operation_id.to_string(),
                    reason: format!("duplicate operationId at {} {}", op.method.as_upper(), op.path),
                });
                continue;
            }

            let located = LocatedOperation {
                crud_role: classify(op.method, op.operation),
                op,
            };
            match self.describe(&located) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(e) => errors.push(e),
            }
        }

        (descriptors, errors)
    }

    /// CRUD roles of the operations tagged exactly with `tag`; the first
    /// operation found for a role wins
    pub fn crud_operations(&self, tag: &str) -> CrudOperations {
        let mut crud = CrudOperations::default();
        for op in self.document.operations_by_tag(tag) {
            if let Some(role) = classify(op.method, op.operation) {
                crud.slot(role)
                    .get_or_insert_with(|| op.operation.operation_id.clone());
            }
        }
        crud
    }

    /// Find the operation and classify it in the same scan
    fn locate(&self, operation_id: &str) -> Result<LocatedOperation<'a>, GenerationError> {
        self.document
            .operations()
            .find(|op| op.operation.operation_id == operation_id)
            .map(|op| LocatedOperation {
                crud_role: classify(op.method, op.operation),
                op,
            })
            .ok_or_else(|| GenerationError::OperationNotFound(operation_id.to_string()))
    }

    fn describe(&self, located: &LocatedOperation<'_>) -> Result<OperationDescriptor, GenerationError> {
        let op = located.op;
        let operation = op.operation;
        let operation_id = operation.operation_id.as_str();

        let handler_name = to_pascal_case(operation_id);
        if handler_name.is_empty() || handler_name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(GenerationError::OperationResolutionError {
                operation_id: operation_id.to_string(),
                reason: "operationId does not yield a valid Go identifier".to_string(),
            });
        }

        let request_body = self.describe_request_body(&handler_name, op.method, operation);
        let mut taken: HashSet<String> = request_body
            .iter()
            .flat_map(|body| body.fields.iter().map(|f| f.name.clone()))
            .collect();

        let path_params = describe_params(&operation.parameters, ParameterLocation::Path, &mut taken);
        for param in &path_params {
            if !op.path.contains(&format!("{{{}}}", param.param_name)) {
                return Err(GenerationError::OperationResolutionError {
                    operation_id: operation_id.to_string(),
                    reason: format!(
                        "path parameter '{}' does not appear in path {}",
                        param.param_name, op.path
                    ),
                });
            }
        }
        let query_params =
            describe_params(&operation.parameters, ParameterLocation::Query, &mut taken);

        let response = first_success_response(operation);
        let response_type = response
            .and_then(|(_, response)| response.preferred_schema())
            .map(|schema| self.response_type(schema));
        let success_status = response
            .and_then(|(status, _)| status.parse::<u16>().ok())
            .unwrap_or_else(|| default_status(op.method));

        let resource_tag = operation.tags.first().cloned().unwrap_or_else(|| {
            operation_id
                .split('_')
                .next()
                .unwrap_or(operation_id)
                .to_string()
        });
        let resource_name = to_pascal_case(&resource_tag);

        let request_requires_time = request_body
            .as_ref()
            .is_some_and(|body| body.fields.iter().any(|f| f.type_expr.requires_time_import()));
        let response_requires_time = response_type
            .as_ref()
            .is_some_and(TypeExpression::requires_time_import);
        let request_uses_package = request_body
            .as_ref()
            .is_some_and(|body| body.fields.iter().any(|f| f.type_expr.references_package()));
        let response_uses_package = response_type
            .as_ref()
            .is_some_and(TypeExpression::references_package);
        let needs_chi = !path_params.is_empty();
        let needs_strconv = path_params
            .iter()
            .chain(&query_params)
            .any(|p| p.type_expr != TypeExpression::String);
        let mut sample_path = path_params.iter().fold(op.path.to_string(), |path, param| {
            path.replace(&format!("{{{}}}", param.param_name), &param.sample_value)
        });
        if !query_params.is_empty() {
            let query: Vec<String> = query_params
                .iter()
                .map(|p| format!("{}={}", p.param_name, p.sample_value))
                .collect();
            sample_path = format!("{sample_path}?{}", query.join("&"));
        }

        Ok(OperationDescriptor {
            operation_id: operation_id.to_string(),
            file_stem: operation_id
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
                .collect(),
            handler_name,
            http_method: op.method,
            path: op.path.to_string(),
            summary: operation
                .summary
                .as_deref()
                .map(sanitize_comment)
                .filter(|s| !s.is_empty()),
            path_params,
            query_params,
            request_body,
            response_type,
            success_status,
            service_interface: format!("{resource_name}Service"),
            resource_name,
            resource_tag,
            crud_role: located.crud_role,
            requires_time_import: request_requires_time || response_requires_time,
            request_requires_time,
            response_requires_time,
            request_uses_package,
            response_uses_package,
            needs_strconv,
            needs_chi,
            sample_path,
        })
    }

    fn describe_request_body(
        &self,
        handler_name: &str,
        method: HttpMethod,
        operation: &OperationNode,
    ) -> Option<RequestBodyDescriptor> {
        let schema = operation.request_body.as_ref()?.preferred_schema()?;

        let mut fields: Vec<RequestField> = schema
            .properties
            .iter()
            .filter(|(name, _)| {
                method != HttpMethod::Post || !SERVER_ASSIGNED_FIELDS.contains(&name.as_str())
            })
            .filter_map(|(name, property)| {
                let property = property.as_ref()?;
                Some(RequestField {
                    name: to_field_identifier(name),
                    type_expr: map_type(property, false).qualified(self.package_name),
                    json_tag: name.clone(),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));

        Some(RequestBodyDescriptor {
            type_name: format!("{handler_name}Request"),
            fields,
        })
    }

    /// The reference's declared name wins over the structural mapping;
    /// named types are qualified with the domain package
    fn response_type(&self, schema: &SchemaNode) -> TypeExpression {
        if let Some(name) = &schema.reference {
            return TypeExpression::named(name).qualified(self.package_name);
        }
        if let Some(items) = schema.items.as_deref().filter(|_| schema.is_array()) {
            if let Some(name) = &items.reference {
                return TypeExpression::sequence_of(TypeExpression::named(name))
                    .qualified(self.package_name);
            }
        }
        map_type(schema, false).qualified(self.package_name)
    }
}

/// Group descriptors by resource package, ordered by package name
pub fn group_by_resource(descriptors: &[OperationDescriptor]) -> Vec<ResourceGroup> {
    let mut groups: BTreeMap<String, ResourceGroup> = BTreeMap::new();
    for descriptor in descriptors {
        let domain = to_package_name(&descriptor.resource_tag);
        let group = groups.entry(domain.clone()).or_insert_with(|| ResourceGroup {
            name: descriptor.resource_name.clone(),
            base_path: format!("/{}", descriptor.resource_tag.to_lowercase()),
            domain,
            operations: Vec::new(),
            response_requires_time: false,
            response_uses_package: false,
        });
        group.response_requires_time |= descriptor.response_requires_time;
        group.response_uses_package |= descriptor.response_uses_package;
        group.operations.push(descriptor.clone());
    }
    groups.into_values().collect()
}

/// First declared 2xx response. `2XX` ranges count as a success response
/// without an explicit status code.
fn first_success_response(operation: &OperationNode) -> Option<(&str, &ResponseNode)> {
    operation
        .responses
        .iter()
        .find(|(status, _)| status.starts_with('2'))
        .map(|(status, response)| (status.as_str(), response))
}

fn default_status(method: HttpMethod) -> u16 {
    match method {
        HttpMethod::Post => 201,
        HttpMethod::Delete => 204,
        _ => 200,
    }
}

/// GET splits into list/get on whether the success response is an array
fn classify(method: HttpMethod, operation: &OperationNode) -> Option<CrudRole> {
    match method {
        HttpMethod::Get => {
            let returns_array = first_success_response(operation)
                .and_then(|(_, response)| response.preferred_schema())
                .is_some_and(|schema| schema.is_array());
            Some(if returns_array {
                CrudRole::List
            } else {
                CrudRole::Get
            })
        }
        HttpMethod::Post => Some(CrudRole::Create),
        HttpMethod::Put | HttpMethod::Patch => Some(CrudRole::Update),
        HttpMethod::Delete => Some(CrudRole::Delete),
        HttpMethod::Head | HttpMethod::Options => None,
    }
}

fn describe_params(
    parameters: &[ParameterNode],
    location: ParameterLocation,
    taken: &mut HashSet<String>,
) -> Vec<ParamDescriptor> {
    parameters
        .iter()
        .filter(|param| param.location == location)
        .map(|param| {
            let type_expr = map_parameter_type(param.schema.as_ref());
            let sample_value = match type_expr {
                TypeExpression::Int => "1",
                TypeExpression::Float64 => "1.5",
                TypeExpression::Bool => "true",
                _ => "test",
            }
            .to_string();
            ParamDescriptor {
                param_name: param.name.clone(),
                field_name: unique_field_name(&param.name, taken),
                type_expr,
                required: param.required,
                sample_value,
            }
        })
        .collect()
}

/// Parameter fields share the request struct with body fields; later
/// names yield on collision
fn unique_field_name(name: &str, taken: &mut HashSet<String>) -> String {
    let base = match to_field_identifier(name) {
        ident if ident.is_empty() => "Param".to_string(),
        ident => ident,
    };
    unique_identifier(&base, "Param", taken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::openapi::OpenApiParser;
    use serde_json::json;

    fn document() -> ApiDocument {
        OpenApiParser::new(json!({
            "openapi": "3.0.0",
            "info": { "title": "Pets", "version": "1.0.0" },
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "tags": ["Pet"],
                        "parameters": [
                            { "name": "limit", "in": "query", "schema": { "type": "integer", "format": "int32" } },
                            { "name": "type", "in": "query", "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "pets",
                                "content": { "application/json": { "schema": {
                                    "type": "array", "items": { "$ref": "#/components/schemas/Pet" }
                                } } }
                            }
                        }
                    },
                    "post": {
                        "operationId": "createPet",
                        "tags": ["Pet"],
                        "requestBody": { "content": { "application/json": {
                            "schema": { "$ref": "#/components/schemas/Pet" }
                        } } },
                        "responses": { "default": { "description": "error" } }
                    }
                },
                "/pets/{petId}": {
                    "get": {
                        "operationId": "getPet",
                        "tags": ["Pet"],
                        "parameters": [
                            { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } }
                        ],
                        "responses": {
                            "200": { "description": "pet", "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/Pet" }
                            } } }
                        }
                    },
                    "put": {
                        "operationId": "updatePet",
                        "tags": ["Pet"],
                        "parameters": [
                            { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer" } }
                        ],
                        "requestBody": { "content": { "application/json": {
                            "schema": { "$ref": "#/components/schemas/Pet" }
                        } } },
                        "responses": { "2XX": { "description": "updated" } }
                    },
                    "delete": {
                        "operationId": "deletePet",
                        "tags": ["Pet"],
                        "parameters": [
                            { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer" } }
                        ],
                        "responses": { "404": { "description": "missing" } }
                    }
                },
                "/users": {
                    "post": {
                        "operationId": "createUser",
                        "requestBody": { "content": { "application/json": { "schema": {
                            "type": "object",
                            "properties": {
                                "id": { "type": "string" },
                                "name": { "type": "string" },
                                "created_at": { "type": "string", "format": "date-time" }
                            }
                        } } } },
                        "responses": { "201": { "description": "created", "content": {
                            "application/json": { "schema": { "type": "object", "properties": {
                                "seen": { "type": "string", "format": "date-time" }
                            } } }
                        } } }
                    }
                },
                "/broken": {
                    "get": {
                        "operationId": "brokenPath",
                        "parameters": [ { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } } ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            },
            "components": { "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "name": { "type": "string" },
                        "born": { "type": "string", "format": "date-time" },
                        "owner": { "$ref": "#/components/schemas/Owner" }
                    }
                },
                "Owner": { "type": "object", "properties": { "name": { "type": "string" } } }
            } }
        }))
        .parse()
        .expect("valid document")
    }

    #[test]
    fn test_list_operation() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");
        let list = resolver.resolve("listPets").unwrap();

        assert_eq!(list.http_method, HttpMethod::Get);
        assert_eq!(list.path, "/pets");
        assert_eq!(list.handler_name, "ListPets");
        assert_eq!(list.file_stem, "listpets");
        assert_eq!(list.response_type.as_ref().unwrap().to_string(), "[]domain.Pet");
        assert_eq!(list.success_status, 200);
        assert_eq!(list.crud_role, Some(CrudRole::List));
        assert_eq!(list.resource_name, "Pet");
        assert_eq!(list.service_interface, "PetService");
        assert!(list.request_body.is_none());
        assert!(list.path_params.is_empty());

        let names: Vec<_> = list.query_params.iter().map(|p| p.field_name.as_str()).collect();
        assert_eq!(names, vec!["Limit", "Type"]);
        assert_eq!(list.sample_path, "/pets?limit=1&type=test");
        assert!(!list.needs_chi);
        assert_eq!(list.query_params[0].type_expr, TypeExpression::Int);
        assert!(list.needs_strconv);
        assert!(list.response_uses_package);
        assert!(!list.requires_time_import);
    }

    #[test]
    fn test_get_vs_list_classification() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");
        let get = resolver.resolve("getPet").unwrap();
        assert_eq!(get.crud_role, Some(CrudRole::Get));
        assert_eq!(get.response_type.unwrap().to_string(), "domain.Pet");
        assert_eq!(get.path_params[0].param_name, "petId");
        assert_eq!(get.path_params[0].field_name, "PetId");
        assert_eq!(get.sample_path, "/pets/1");
        assert!(get.needs_chi);
    }

    #[test]
    fn test_post_request_excludes_server_fields() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");

        let create_user = resolver.resolve("createUser").unwrap();
        let body = create_user.request_body.as_ref().unwrap();
        assert_eq!(body.type_name, "CreateUserRequest");
        let names: Vec<_> = body.fields.iter().map(|f| f.json_tag.as_str()).collect();
        assert_eq!(names, vec!["name"]);
        assert_eq!(create_user.success_status, 201);
        assert_eq!(create_user.crud_role, Some(CrudRole::Create));
        // untagged operations group under the operation id
        assert_eq!(create_user.resource_tag, "createUser");
        // inline response objects degrade to maps
        assert_eq!(
            create_user.response_type.as_ref().unwrap().to_string(),
            "map[string]interface{}"
        );

        let create_pet = resolver.resolve("createPet").unwrap();
        let names: Vec<_> = create_pet
            .request_body
            .as_ref()
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Born", "Name", "Owner"]);
        assert!(create_pet.request_requires_time);
        assert!(create_pet.requires_time_import);
        assert!(create_pet.request_uses_package);
        assert_eq!(create_pet.success_status, 201);
        assert!(create_pet.response_type.is_none());
    }

    #[test]
    fn test_non_post_keeps_server_fields_sorted_by_identifier() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");
        let update = resolver.resolve("updatePet").unwrap();
        let names: Vec<_> = update
            .request_body
            .as_ref()
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Born", "ID", "Name", "Owner"]);
        let owner = update.request_body.as_ref().unwrap().fields.iter().find(|f| f.name == "Owner").unwrap();
        assert_eq!(owner.type_expr.to_string(), "domain.Owner");
        // 2XX has no concrete code, so the method default applies
        assert_eq!(update.success_status, 200);
        assert_eq!(update.crud_role, Some(CrudRole::Update));
    }

    #[test]
    fn test_status_defaults() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");
        let delete = resolver.resolve("deletePet").unwrap();
        assert_eq!(delete.success_status, 204);
        assert!(delete.response_type.is_none());
        assert_eq!(delete.crud_role, Some(CrudRole::Delete));
    }

    #[test]
    fn test_resolution_failures() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");
        assert!(matches!(
            resolver.resolve("nope"),
            Err(GenerationError::OperationNotFound(_))
        ));
        assert!(matches!(
            resolver.resolve("brokenPath"),
            Err(GenerationError::OperationResolutionError { .. })
        ));
    }

    #[test]
    fn test_resolve_all_is_partial() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");
        let (descriptors, errors) = resolver.resolve_all();
        assert_eq!(descriptors.len(), 6);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("brokenPath"));
    }

    #[test]
    fn test_crud_operations_for_tag() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");
        let crud = resolver.crud_operations("Pet");
        assert_eq!(crud.list.as_deref(), Some("listPets"));
        assert_eq!(crud.get.as_deref(), Some("getPet"));
        assert_eq!(crud.create.as_deref(), Some("createPet"));
        assert_eq!(crud.update.as_deref(), Some("updatePet"));
        assert_eq!(crud.delete.as_deref(), Some("deletePet"));
        assert!(resolver.crud_operations("pet").create.is_none());
    }

    #[test]
    fn test_group_by_resource() {
        let doc = document();
        let resolver = OperationResolver::new(&doc, "domain");
        let (descriptors, _) = resolver.resolve_all();
        let groups = group_by_resource(&descriptors);

        let domains: Vec<_> = groups.iter().map(|g| g.domain.as_str()).collect();
        assert_eq!(domains, vec!["createuser", "pet"]);
        let pet = &groups[1];
        assert_eq!(pet.name, "Pet");
        assert_eq!(pet.base_path, "/pet");
        assert_eq!(pet.operations.len(), 5);
        assert!(pet.response_uses_package);
        assert!(groups[0].operations[0].response_type.is_some());
    }

    #[test]
    fn test_parameter_fields_avoid_body_fields() {
        let mut taken: HashSet<String> = ["Name".to_string()].into_iter().collect();
        assert_eq!(unique_field_name("name", &mut taken), "NameParam");
        assert_eq!(unique_field_name("name", &mut taken), "NameParam2");
        assert_eq!(unique_field_name("limit", &mut taken), "Limit");
        assert_eq!(unique_field_name("", &mut taken), "Param");
    }

    #[test]
    fn test_duplicate_operation_ids_are_reported() {
        let doc = OpenApiParser::new(json!({
            "openapi": "3.0.0",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/a": { "get": { "operationId": "same", "responses": {} } },
                "/b": { "get": { "operationId": "same", "responses": {} } }
            }
        }))
        .parse()
        .unwrap();
        let (descriptors, errors) = OperationResolver::new(&doc, "domain").resolve_all();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].path, "/a");
        assert_eq!(errors.len(), 1);
    }
}
