//! Service layer template data
//!
//! One service per resource schema. The methods a service exposes follow
//! the CRUD roles of the operations tagged with the schema name.

use serde::Serialize;

use crate::generation::domain_types::{FieldDescriptor, describe_fields};
use crate::generation::operations::{CrudOperations, CrudRole};
use crate::generation::type_mapper::{TypeExpression, test_value_for};
use crate::generation::utils::{to_camel_case, to_package_name, to_type_name};
use crate::infrastructure::openapi::SchemaNode;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumField {
    pub field: String,
    pub values: Vec<String>,
    pub required: bool,
}

/// Numeric bounds rendered as Go literals of the field's type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeField {
    pub field: String,
    pub min: Option<String>,
    pub max: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestField {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceData {
    pub type_name: String,
    pub schema_name: String,
    pub var_name: String,
    pub package: String,
    pub has_create: bool,
    pub has_get: bool,
    pub has_list: bool,
    pub has_update: bool,
    pub has_delete: bool,
    pub created_at_field: Option<String>,
    pub updated_at_field: Option<String>,
    pub required_fields: Vec<String>,
    pub enum_fields: Vec<EnumField>,
    pub range_fields: Vec<RangeField>,
    pub test_values: Vec<TestField>,
    /// Every required field has a synthesizable test value
    pub can_build_valid_entity: bool,
    pub requires_time_import: bool,
    pub test_requires_time: bool,
}

impl ServiceData {
    /// Whether the service writes to the repository at all
    pub fn validates(&self) -> bool {
        self.has_create || self.has_update
    }
}

/// Build the service description for one resource schema
pub fn build_service(schema_name: &str, schema: &SchemaNode, crud: &CrudOperations) -> ServiceData {
    let fields = describe_fields(schema);

    let timestamp_field = |names: &[&str]| {
        fields
            .iter()
            .find(|f| {
                names.contains(&f.source_name.as_str()) && f.type_expr == TypeExpression::Timestamp
            })
            .map(|f| f.target_name.clone())
    };
    let created_at_field = timestamp_field(&["created_at", "createdAt"]);
    let updated_at_field = timestamp_field(&["updated_at", "updatedAt"]);

    let required_fields = fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.target_name.clone())
        .collect();

    let enum_fields = fields
        .iter()
        .filter(|f| f.type_expr == TypeExpression::String)
        .filter_map(|f| {
            let values = schema
                .properties
                .get(&f.source_name)?
                .as_ref()?
                .string_enum_values();
            (!values.is_empty()).then(|| EnumField {
                field: f.target_name.clone(),
                values,
                required: f.required,
            })
        })
        .collect();

    let range_fields = fields
        .iter()
        .filter_map(|f| {
            let property = schema.properties.get(&f.source_name)?.as_ref()?;
            range_field(f, property)
        })
        .collect();

    let mut test_values = Vec::new();
    let mut can_build_valid_entity = true;
    for field in fields.iter().filter(|f| f.required) {
        let value = schema
            .properties
            .get(&field.source_name)
            .and_then(Option::as_ref)
            .and_then(test_value_for);
        match value {
            Some(value) => test_values.push(TestField {
                field: field.target_name.clone(),
                value,
            }),
            None => can_build_valid_entity = false,
        }
    }

    let has_create = crud.has(CrudRole::Create);
    let has_update = crud.has(CrudRole::Update);
    let requires_time_import = (has_create && (created_at_field.is_some() || updated_at_field.is_some()))
        || (has_update && updated_at_field.is_some());
    let test_requires_time = has_create
        && can_build_valid_entity
        && test_values.iter().any(|t| t.value.contains("time."));

    ServiceData {
        type_name: to_type_name(schema_name),
        schema_name: schema_name.to_string(),
        var_name: to_camel_case(schema_name),
        package: to_package_name(schema_name),
        has_create,
        has_get: crud.has(CrudRole::Get),
        has_list: crud.has(CrudRole::List),
        has_update,
        has_delete: crud.has(CrudRole::Delete),
        created_at_field,
        updated_at_field,
        required_fields,
        enum_fields,
        range_fields,
        test_values,
        can_build_valid_entity,
        requires_time_import,
        test_requires_time,
    }
}

fn range_field(field: &FieldDescriptor, property: &SchemaNode) -> Option<RangeField> {
    if property.minimum.is_none() && property.maximum.is_none() {
        return None;
    }
    let (min, max) = match field.type_expr {
        TypeExpression::Int | TypeExpression::Int32 | TypeExpression::Int64 => (
            property.minimum.map(|v| format!("{}", v.ceil() as i64)),
            property.maximum.map(|v| format!("{}", v.floor() as i64)),
        ),
        TypeExpression::Float32 | TypeExpression::Float64 => (
            property.minimum.map(|v| format!("{v:?}")),
            property.maximum.map(|v| format!("{v:?}")),
        ),
        _ => return None,
    };
    Some(RangeField {
        field: field.target_name.clone(),
        min,
        max,
        required: field.required,
    })
}
