//! HTTP-to-service adapter data
//!
//! Each handler group gets a stable adapter implementing its handler
//! `Service` interface on top of the resource service. An operation is
//! forwarded when it is the one filling a CRUD role of that service and it
//! carries the identifier the service method needs; every other operation
//! answers NotImplemented until edited by hand.

use serde::Serialize;

use crate::generation::operations::{CrudOperations, CrudRole, OperationDescriptor, ResourceGroup};
use crate::generation::type_mapper::TypeExpression;
use crate::generation::utils::{to_package_name, to_type_name};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdapterOperation {
    pub operation_id: String,
    pub handler_name: String,
    pub response_type: Option<TypeExpression>,
    /// Service method role this operation forwards to
    pub call: Option<CrudRole>,
    /// Request field holding the resource identifier
    pub id_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceAdapterData {
    pub name: String,
    pub domain: String,
    pub type_name: String,
    pub service_package: String,
    pub service_alias: String,
    pub operations: Vec<AdapterOperation>,
    pub uses_convert: bool,
    pub uses_fmt: bool,
    pub uses_domain: bool,
    pub response_requires_time: bool,
}

/// Import alias of a resource's service package, shared with the wiring
pub fn service_alias(package: &str) -> String {
    format!("{package}Service")
}

/// Resource whose service backs the given handler group
pub fn service_for_group<'a>(group: &ResourceGroup, resources: &'a [String]) -> Option<&'a String> {
    resources
        .iter()
        .find(|name| to_package_name(name) == group.domain)
}

pub fn build_service_adapter(
    group: &ResourceGroup,
    resource: &str,
    crud: &CrudOperations,
) -> ServiceAdapterData {
    let operations: Vec<AdapterOperation> = group
        .operations
        .iter()
        .map(|op| adapt_operation(op, crud))
        .collect();

    let uses_convert = operations.iter().any(|op| match op.call {
        Some(CrudRole::Create | CrudRole::Update) => true,
        Some(CrudRole::Get | CrudRole::List) => op.response_type.is_some(),
        _ => false,
    });
    let uses_fmt = operations.iter().any(|op| op.id_field.is_some());
    let uses_domain = group.response_uses_package
        || operations.iter().any(|op| match op.call {
            None | Some(CrudRole::Create | CrudRole::Update) => true,
            Some(CrudRole::Get | CrudRole::List) => op.response_type.is_some(),
            Some(CrudRole::Delete) => false,
        });

    let service_package = to_package_name(resource);
    ServiceAdapterData {
        name: group.name.clone(),
        domain: group.domain.clone(),
        type_name: to_type_name(resource),
        service_alias: service_alias(&service_package),
        service_package,
        operations,
        uses_convert,
        uses_fmt,
        uses_domain,
        response_requires_time: group.response_requires_time,
    }
}

fn adapt_operation(op: &OperationDescriptor, crud: &CrudOperations) -> AdapterOperation {
    let id_field = op.path_params.first().map(|param| param.field_name.clone());
    let call = op.crud_role.filter(|role| {
        let fills_role = crud_slot(crud, *role) == Some(op.operation_id.as_str());
        let needs_id = matches!(role, CrudRole::Get | CrudRole::Update | CrudRole::Delete);
        fills_role && (!needs_id || id_field.is_some())
    });

    AdapterOperation {
        operation_id: op.operation_id.clone(),
        handler_name: op.handler_name.clone(),
        response_type: op.response_type.clone(),
        id_field: match call {
            Some(CrudRole::Get | CrudRole::Update | CrudRole::Delete) => id_field,
            _ => None,
        },
        call,
    }
}

fn crud_slot(crud: &CrudOperations, role: CrudRole) -> Option<&str> {
    match role {
        CrudRole::Create => crud.create.as_deref(),
        CrudRole::Get => crud.get.as_deref(),
        CrudRole::List => crud.list.as_deref(),
        CrudRole::Update => crud.update.as_deref(),
        CrudRole::Delete => crud.delete.as_deref(),
    }
}
