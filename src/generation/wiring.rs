//! Entrypoint wiring data
//!
//! Drives the two derived files of the `cmd/` package: routing and storage
//! connection. Both are rebuilt from the current feature set on every run
//! so they only reference packages this run knows about.

use serde::Serialize;

use crate::generation::FeatureSet;
use crate::generation::operations::ResourceGroup;
use crate::generation::service_adapters::{service_alias, service_for_group};
use crate::generation::utils::{to_package_name, to_type_name};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WiredService {
    pub type_name: String,
    pub package: String,
    pub alias: String,
    /// Alias of the repository package, when persistence is generated
    pub repository_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WiredHandler {
    pub domain: String,
    pub alias: String,
    /// `Services` field backing the handler through its service adapter
    pub service_field: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WiringData {
    pub uses_mongo: bool,
    pub services: Vec<WiredService>,
    pub handlers: Vec<WiredHandler>,
}

/// Build wiring for the given resources and handler groups.
///
/// With an empty feature set the result wires nothing but the health check.
pub fn build_wiring(
    features: &FeatureSet,
    resources: &[String],
    groups: &[ResourceGroup],
) -> WiringData {
    let services = if features.needs_services() {
        resources
            .iter()
            .map(|name| {
                let package = to_package_name(name);
                WiredService {
                    type_name: to_type_name(name),
                    alias: service_alias(&package),
                    repository_alias: features
                        .persistence
                        .then(|| format!("{package}Repository")),
                    package,
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let handlers = if features.http {
        groups
            .iter()
            .map(|group| WiredHandler {
                domain: group.domain.clone(),
                alias: format!("{}Handler", group.domain),
                service_field: service_for_group(group, resources).map(|name| to_type_name(name)),
            })
            .collect()
    } else {
        Vec::new()
    };

    WiringData {
        uses_mongo: features.persistence,
        services,
        handlers,
    }
}
