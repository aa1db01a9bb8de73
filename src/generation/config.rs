//! Generation configuration
//!
//! Built once from the CLI request and passed by reference to every
//! pipeline step. Nothing here is mutated during a run.

use serde::Serialize;
use std::path::PathBuf;

use crate::generation::GenerationError;
use crate::generation::domain_types::MappingPolicy;
use crate::generation::rules;

/// Which generation steps are enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    pub types: bool,
    pub services: bool,
    pub persistence: bool,
    pub http: bool,
    pub init: bool,
}

impl FeatureSet {
    pub fn is_empty(&self) -> bool {
        !(self.types || self.services || self.persistence || self.http || self.init)
    }

    /// Steps that touch the wiring files
    pub fn affects_wiring(&self) -> bool {
        self.services || self.persistence || self.http || self.init
    }

    /// The service layer is also needed by handlers
    pub fn needs_services(&self) -> bool {
        self.services || self.http
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub spec_file: PathBuf,
    pub output_dir: PathBuf,
    /// Alias the generated code uses for the domain package
    pub package_name: String,
    pub features: FeatureSet,
    pub overwrite: bool,
    pub schema_filter: Option<String>,
    pub mapping_policy: MappingPolicy,
    pub skip_deps: bool,
}

impl GenerationConfig {
    pub fn new(spec_file: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            spec_file: spec_file.into(),
            output_dir: output_dir.into(),
            package_name: "domain".to_string(),
            features: FeatureSet::default(),
            overwrite: false,
            schema_filter: None,
            mapping_policy: MappingPolicy::Permissive,
            skip_deps: false,
        }
    }

    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    pub fn with_package_name(mut self, package_name: &str) -> Self {
        self.package_name = package_name.to_string();
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_schema_filter(mut self, schema: Option<String>) -> Self {
        self.schema_filter = schema;
        self
    }

    pub fn with_mapping_policy(mut self, policy: MappingPolicy) -> Self {
        self.mapping_policy = policy;
        self
    }

    pub fn with_skip_deps(mut self, skip_deps: bool) -> Self {
        self.skip_deps = skip_deps;
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.spec_file.as_os_str().is_empty() {
            return Err(GenerationError::InvalidConfiguration(
                "spec file path cannot be empty".to_string(),
            ));
        }
        rules::validate_package_name(&self.package_name)?;
        if let Some(schema) = &self.schema_filter {
            rules::validate_schema_filter(schema)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_set_queries() {
        assert!(FeatureSet::default().is_empty());

        let http = FeatureSet {
            http: true,
            ..FeatureSet::default()
        };
        assert!(!http.is_empty());
        assert!(http.needs_services());
        assert!(http.affects_wiring());

        let types = FeatureSet {
            types: true,
            ..FeatureSet::default()
        };
        assert!(!types.affects_wiring());
        assert!(!types.needs_services());
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let config = GenerationConfig::new("api.yaml", "out");
        assert_eq!(config.package_name, "domain");
        assert!(!config.overwrite);
        assert!(config.validate().is_ok());

        assert!(config.clone().with_package_name("not-go").validate().is_err());
        assert!(GenerationConfig::new("", "out").validate().is_err());
        assert!(
            config
                .with_schema_filter(Some(String::new()))
                .validate()
                .is_err()
        );
    }
}
