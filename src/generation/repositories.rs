//! Persistence adapter template data

use serde::Serialize;

use crate::generation::utils::{pluralize, to_package_name, to_type_name};
use crate::infrastructure::openapi::SchemaNode;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryData {
    pub type_name: String,
    pub package: String,
    /// MongoDB collection, `pluralize(lowercase(name))`
    pub collection: String,
    /// Document key used for lookups
    pub id_field: String,
}

pub fn build_repository(schema_name: &str, schema: &SchemaNode) -> RepositoryData {
    let id_field = if schema.properties.contains_key("id") {
        "id"
    } else {
        "_id"
    };

    RepositoryData {
        type_name: to_type_name(schema_name),
        package: to_package_name(schema_name),
        collection: pluralize(&schema_name.to_lowercase()),
        id_field: id_field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_naming() {
        let pet = SchemaNode::of_type("object").with_property("id", SchemaNode::of_type("string"));
        let repo = build_repository("Pet", &pet);
        assert_eq!(repo.collection, "pets");
        assert_eq!(repo.id_field, "id");
        assert_eq!(repo.package, "pet");
        assert_eq!(repo.type_name, "Pet");
    }

    #[test]
    fn test_repository_defaults_to_object_id() {
        let category = SchemaNode::of_type("object").with_property("name", SchemaNode::of_type("string"));
        let repo = build_repository("Category", &category);
        assert_eq!(repo.id_field, "_id");
        // irregular plurals are not handled
        assert_eq!(repo.collection, "categorys");
    }
}
