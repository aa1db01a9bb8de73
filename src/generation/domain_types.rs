//! Domain type construction
//!
//! Turns the document's component schemas into Go type definitions with
//! serialization tags and validation constraints. Output order never depends
//! on input iteration order: types are sorted by schema name and fields by
//! source property name.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::generation::GenerationError;
use crate::generation::sanitizers::{sanitize_comment, sanitize_tag_value};
use crate::generation::type_mapper::{TypeExpression, map_type};
use crate::generation::utils::{to_field_identifier, to_type_name, unique_identifier};
use crate::infrastructure::openapi::SchemaNode;

/// How the builder treats schema shapes that only map to `interface{}` or
/// properties that cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MappingPolicy {
    /// Degrade silently
    #[default]
    Permissive,
    /// Report `UnrepresentableSchema`
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Enum,
    Min,
    Max,
}

impl ValidationKind {
    /// Keyword used in the `validate` struct tag
    pub fn tag_keyword(&self) -> &'static str {
        match self {
            ValidationKind::Required => "required",
            ValidationKind::MinLength | ValidationKind::Min => "min",
            ValidationKind::MaxLength | ValidationKind::Max => "max",
            ValidationKind::Pattern => "regexp",
            ValidationKind::Format => "format",
            ValidationKind::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationRule {
    pub kind: ValidationKind,
    pub param: Option<String>,
}

impl ValidationRule {
    fn new(kind: ValidationKind, param: Option<String>) -> Self {
        Self { kind, param }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}={}", self.kind.tag_keyword(), param),
            None => f.write_str(self.kind.tag_keyword()),
        }
    }
}

/// One struct field, built once per schema property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub source_name: String,
    pub target_name: String,
    #[serde(rename = "type")]
    pub type_expr: TypeExpression,
    pub required: bool,
    pub serialization_tag: String,
    pub validation_rules: Vec<ValidationRule>,
    pub description: Option<String>,
    /// Rendered tag, e.g. `bson:"name" json:"name" validate:"required"`
    pub struct_tag: String,
}

impl FieldDescriptor {
    /// Describe a property of a struct-shaped schema
    pub fn from_property(name: &str, schema: &SchemaNode, required: bool) -> Self {
        let type_expr = map_type(schema, true);
        let validation_rules = validation_rules(schema, &type_expr, required);
        let struct_tag = render_struct_tag(name, &validation_rules);

        Self {
            source_name: name.to_string(),
            target_name: to_field_identifier(name),
            type_expr,
            required,
            serialization_tag: name.to_string(),
            validation_rules,
            description: schema
                .description
                .as_deref()
                .map(sanitize_comment)
                .filter(|d| !d.is_empty()),
            struct_tag,
        }
    }

    /// `validate` tag value: the rules joined with commas
    pub fn validation_tag(&self) -> String {
        self.validation_rules
            .iter()
            .map(ValidationRule::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn has_rule(&self, kind: ValidationKind) -> bool {
        self.validation_rules.iter().any(|rule| rule.kind == kind)
    }
}

/// A named Go type: a struct with fields, or a defined type over `alias`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDefinition {
    pub name: String,
    pub schema_name: String,
    pub doc_comment: String,
    pub fields: Vec<FieldDescriptor>,
    pub alias: Option<TypeExpression>,
}

impl TypeDefinition {
    pub fn requires_time_import(&self) -> bool {
        self.fields.iter().any(|f| f.type_expr.requires_time_import())
            || self.alias.as_ref().is_some_and(TypeExpression::requires_time_import)
    }

    pub fn requires_bytes_import(&self) -> bool {
        self.fields.iter().any(|f| f.type_expr.requires_bytes_import())
            || self.alias.as_ref().is_some_and(TypeExpression::requires_bytes_import)
    }

    pub fn field(&self, source_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.source_name == source_name)
    }
}

/// The full set of domain types plus the imports the rendered file needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainTypeSet {
    pub types: Vec<TypeDefinition>,
    pub requires_time_import: bool,
    pub requires_bytes_import: bool,
}

/// Build type definitions for all schemas.
///
/// Under [`MappingPolicy::Permissive`] this never fails: malformed
/// properties are skipped and untyped shapes become `interface{}`.
pub fn build_types(
    schemas: &IndexMap<String, SchemaNode>,
    policy: MappingPolicy,
) -> Result<DomainTypeSet, GenerationError> {
    let mut names: Vec<&String> = schemas.keys().collect();
    names.sort();

    let types = names
        .into_iter()
        .map(|name| build_type(name, &schemas[name.as_str()], policy))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DomainTypeSet {
        requires_time_import: types.iter().any(TypeDefinition::requires_time_import),
        requires_bytes_import: types.iter().any(TypeDefinition::requires_bytes_import),
        types,
    })
}

/// Build the definition for a single named schema
pub fn build_type(
    name: &str,
    schema: &SchemaNode,
    policy: MappingPolicy,
) -> Result<TypeDefinition, GenerationError> {
    let type_name = to_type_name(name);
    let doc_comment = match schema.description.as_deref().map(sanitize_comment) {
        Some(description) if !description.is_empty() => format!("{type_name} {description}"),
        _ => format!("{type_name} represents a {type_name} object"),
    };

    if !is_struct_schema(schema) {
        let target = map_type(schema, false);
        if policy == MappingPolicy::Strict && target.contains_any() {
            return Err(GenerationError::UnrepresentableSchema(name.to_string()));
        }
        return Ok(TypeDefinition {
            name: type_name,
            schema_name: name.to_string(),
            doc_comment,
            fields: Vec::new(),
            alias: Some(target),
        });
    }

    if policy == MappingPolicy::Strict {
        for (property, value) in &schema.properties {
            let unrepresentable = match value {
                None => true,
                Some(value) => map_type(value, true).contains_any(),
            };
            if unrepresentable {
                return Err(GenerationError::UnrepresentableSchema(format!(
                    "{name}.{property}"
                )));
            }
        }
    }

    Ok(TypeDefinition {
        name: type_name,
        schema_name: name.to_string(),
        doc_comment,
        fields: describe_fields(schema),
        alias: None,
    })
}

/// Schemas rendered as Go structs; everything else becomes a defined type
pub fn is_struct_schema(schema: &SchemaNode) -> bool {
    schema.reference.is_none()
        && schema.is_type("object")
        && schema.additional_properties.is_none()
}

/// Field descriptors for every readable property, sorted by source name.
///
/// Properties that map onto the same Go identifier (`first_name`,
/// `firstName`) keep it for the first source name; later ones get a
/// `Field` suffix.
pub fn describe_fields(schema: &SchemaNode) -> Vec<FieldDescriptor> {
    let mut fields: Vec<FieldDescriptor> = schema
        .properties
        .iter()
        .filter_map(|(name, property)| match property {
            Some(property) => Some(FieldDescriptor::from_property(
                name,
                property,
                schema.required.contains(name),
            )),
            None => {
                debug!(property = %name, "Skipping malformed property");
                None
            }
        })
        .collect();
    fields.sort_by(|a, b| a.source_name.cmp(&b.source_name));

    let mut taken = HashSet::new();
    for field in &mut fields {
        if field.target_name.is_empty() {
            field.target_name = "Field".to_string();
        }
        let unique = unique_identifier(&field.target_name, "Field", &mut taken);
        if unique != field.target_name {
            debug!(property = %field.source_name, field = %unique, "Renamed colliding field");
            field.target_name = unique;
        }
    }
    fields
}

fn validation_rules(
    schema: &SchemaNode,
    type_expr: &TypeExpression,
    required: bool,
) -> Vec<ValidationRule> {
    let mut rules = Vec::new();
    if required {
        rules.push(ValidationRule::new(ValidationKind::Required, None));
    }

    if type_expr.is_string() {
        if let Some(min) = schema.min_length.filter(|min| *min > 0) {
            rules.push(ValidationRule::new(ValidationKind::MinLength, Some(min.to_string())));
        }
        if let Some(max) = schema.max_length {
            rules.push(ValidationRule::new(ValidationKind::MaxLength, Some(max.to_string())));
        }
        if let Some(pattern) = schema.pattern.as_deref().filter(|p| !p.is_empty()) {
            rules.push(ValidationRule::new(ValidationKind::Pattern, Some(pattern.to_string())));
        }
        if let Some(format) = schema.format.as_deref().filter(|f| !f.is_empty()) {
            rules.push(ValidationRule::new(ValidationKind::Format, Some(format.to_string())));
        }
        if !schema.enum_values.is_empty() {
            let values = schema
                .enum_values
                .iter()
                .map(|value| match value.as_str() {
                    Some(s) => s.to_string(),
                    None => value.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            rules.push(ValidationRule::new(ValidationKind::Enum, Some(values)));
        }
    }

    if type_expr.is_numeric() {
        if let Some(min) = schema.minimum {
            rules.push(ValidationRule::new(ValidationKind::Min, Some(min.to_string())));
        }
        if let Some(max) = schema.maximum {
            rules.push(ValidationRule::new(ValidationKind::Max, Some(max.to_string())));
        }
    }

    rules
}

/// Tag keys are emitted in sorted order; wire and storage tags both carry
/// the raw property name
fn render_struct_tag(name: &str, rules: &[ValidationRule]) -> String {
    let raw = sanitize_tag_value(name);
    let mut tags = vec![format!("bson:\"{raw}\""), format!("json:\"{raw}\"")];
    if !rules.is_empty() {
        let joined = rules
            .iter()
            .map(ValidationRule::to_string)
            .collect::<Vec<_>>()
            .join(",");
        tags.push(format!("validate:\"{}\"", sanitize_tag_value(&joined)));
    }
    tags.sort();
    tags.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet_schema() -> SchemaNode {
        let mut status = SchemaNode::of_type("string");
        status.enum_values = vec!["available".into(), "pending".into(), "sold".into()];
        SchemaNode::of_type("object")
            .with_property("name", SchemaNode::of_type("string"))
            .with_property("id", SchemaNode::of_type("string"))
            .with_property("status", status)
            .with_required(&["name", "status"])
    }

    #[test]
    fn test_pet_fields_sorted_with_tags() {
        let def = build_type("Pet", &pet_schema(), MappingPolicy::Permissive).unwrap();
        let names: Vec<_> = def.fields.iter().map(|f| f.target_name.as_str()).collect();
        assert_eq!(names, vec!["ID", "Name", "Status"]);

        let id = def.field("id").unwrap();
        assert!(!id.required);
        assert_eq!(id.struct_tag, "bson:\"id\" json:\"id\"");

        let status = def.field("status").unwrap();
        assert_eq!(status.validation_tag(), "required,enum=available pending sold");
        assert_eq!(
            status.struct_tag,
            "bson:\"status\" json:\"status\" validate:\"required,enum=available pending sold\""
        );
        assert_eq!(def.doc_comment, "Pet represents a Pet object");
        assert!(def.alias.is_none());
    }

    #[test]
    fn test_required_propagation() {
        let def = build_type("Pet", &pet_schema(), MappingPolicy::Permissive).unwrap();
        for field in &def.fields {
            let listed = ["name", "status"].contains(&field.source_name.as_str());
            assert_eq!(field.has_rule(ValidationKind::Required), listed);
            assert_eq!(field.required, listed);
        }
    }

    #[test]
    fn test_tags_keep_raw_names() {
        let schema = SchemaNode::of_type("object")
            .with_property("created_at", SchemaNode::of_type("string").with_format("date-time"))
            .with_property("ownerEmail", SchemaNode::of_type("string"));
        let def = build_type("Record", &schema, MappingPolicy::Permissive).unwrap();

        for field in &def.fields {
            assert_eq!(field.serialization_tag, field.source_name);
            assert!(field.struct_tag.contains(&format!("json:\"{}\"", field.source_name)));
            assert!(field.struct_tag.contains(&format!("bson:\"{}\"", field.source_name)));
        }
        assert_eq!(def.field("created_at").unwrap().target_name, "CreatedAt");
        assert!(def.requires_time_import());
    }

    #[test]
    fn test_string_and_numeric_rules() {
        let mut name = SchemaNode::of_type("string").with_format("email");
        name.min_length = Some(2);
        name.max_length = Some(64);
        name.pattern = Some("^[a-z]+$".to_string());
        let mut zero_min = SchemaNode::of_type("string");
        zero_min.min_length = Some(0);
        let mut age = SchemaNode::of_type("integer");
        age.minimum = Some(0.0);
        age.maximum = Some(150.0);
        let mut ratio = SchemaNode::of_type("number");
        ratio.minimum = Some(0.5);
        let mut not_string = SchemaNode::of_type("integer");
        not_string.pattern = Some("\\d+".to_string());

        let schema = SchemaNode::of_type("object")
            .with_property("email", name)
            .with_property("nick", zero_min)
            .with_property("age", age)
            .with_property("ratio", ratio)
            .with_property("count", not_string);
        let def = build_type("Person", &schema, MappingPolicy::Permissive).unwrap();

        assert_eq!(
            def.field("email").unwrap().validation_tag(),
            "min=2,max=64,regexp=^[a-z]+$,format=email"
        );
        assert!(def.field("nick").unwrap().validation_rules.is_empty());
        assert_eq!(def.field("age").unwrap().validation_tag(), "min=0,max=150");
        assert_eq!(def.field("ratio").unwrap().validation_tag(), "min=0.5");
        assert!(def.field("count").unwrap().validation_rules.is_empty());
    }

    #[test]
    fn test_build_types_sorted_and_deterministic() {
        let mut schemas = IndexMap::new();
        schemas.insert("Zebra".to_string(), SchemaNode::of_type("object"));
        schemas.insert("Pet".to_string(), pet_schema());
        schemas.insert(
            "Event".to_string(),
            SchemaNode::of_type("object")
                .with_property("at", SchemaNode::of_type("string").with_format("date-time")),
        );

        let first = build_types(&schemas, MappingPolicy::Permissive).unwrap();
        let names: Vec<_> = first.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Event", "Pet", "Zebra"]);
        assert!(first.requires_time_import);
        assert!(!first.requires_bytes_import);

        let mut reordered = IndexMap::new();
        for key in ["Event", "Zebra", "Pet"] {
            reordered.insert(key.to_string(), schemas[key].clone());
        }
        let second = build_types(&reordered, MappingPolicy::Permissive).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_object_schemas_become_defined_types() {
        let list = SchemaNode::of_type("array")
            .with_items(SchemaNode::of_type("object").with_reference("Pet"));
        let def = build_type("PetList", &list, MappingPolicy::Permissive).unwrap();
        assert!(def.fields.is_empty());
        assert_eq!(def.alias.unwrap().to_string(), "[]Pet");

        let mut labels = SchemaNode::of_type("object");
        labels.additional_properties = Some(Box::new(SchemaNode::of_type("string")));
        let def = build_type("Labels", &labels, MappingPolicy::Permissive).unwrap();
        assert_eq!(def.alias.unwrap().to_string(), "map[string]string");
    }

    #[test]
    fn test_malformed_property_skipped() {
        let mut schema = pet_schema();
        schema.properties.insert("broken".to_string(), None);
        let def = build_type("Pet", &schema, MappingPolicy::Permissive).unwrap();
        assert!(def.field("broken").is_none());
        assert_eq!(def.fields.len(), 3);
    }

    #[test]
    fn test_colliding_identifiers_are_suffixed() {
        let schema = SchemaNode::of_type("object")
            .with_property("first_name", SchemaNode::of_type("string"))
            .with_property("firstName", SchemaNode::of_type("string"))
            .with_property("first-name", SchemaNode::of_type("integer"));
        let def = build_type("Person", &schema, MappingPolicy::Permissive).unwrap();

        let names: Vec<_> = def
            .fields
            .iter()
            .map(|f| (f.source_name.as_str(), f.target_name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("first-name", "FirstName"),
                ("firstName", "FirstNameField"),
                ("first_name", "FirstNameField2"),
            ]
        );
        // wire names stay untouched
        assert_eq!(def.field("first_name").unwrap().serialization_tag, "first_name");
    }

    #[test]
    fn test_strict_policy_rejects_degraded_shapes() {
        let mut schema = pet_schema();
        schema.properties.insert("broken".to_string(), None);
        let err = build_type("Pet", &schema, MappingPolicy::Strict).unwrap_err();
        assert!(matches!(err, GenerationError::UnrepresentableSchema(ref s) if s == "Pet.broken"));

        let untyped = SchemaNode::of_type("object").with_property("extra", SchemaNode::default());
        assert!(build_type("Holder", &untyped, MappingPolicy::Strict).is_err());
        assert!(build_type("Holder", &untyped, MappingPolicy::Permissive).is_ok());
        assert!(build_type("Pet", &pet_schema(), MappingPolicy::Strict).is_ok());
    }

    #[test]
    fn test_description_becomes_comment() {
        let mut schema = pet_schema();
        schema.description = Some("A pet\nfor sale".to_string());
        let def = build_type("Pet", &schema, MappingPolicy::Permissive).unwrap();
        assert_eq!(def.doc_comment, "Pet A pet for sale");
    }
}
