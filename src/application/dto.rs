//! Data Transfer Objects for application layer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::ValidationError;
use crate::generation::domain_types::MappingPolicy;
use crate::generation::{FeatureSet, GenerationConfig, GenerationReport, rules};

/// Request to generate (or extend) a Go project
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateProjectRequest {
    pub spec_file: PathBuf,
    pub output_dir: PathBuf,
    pub package_name: String,
    pub features: GenerateFeatures,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub skip_deps: bool,
}

/// Feature flags as requested; an empty selection means types only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateFeatures {
    #[serde(default)]
    pub types: bool,
    #[serde(default)]
    pub services: bool,
    #[serde(default)]
    pub mongo: bool,
    #[serde(default)]
    pub http: bool,
    #[serde(default)]
    pub init: bool,
}

impl GenerateFeatures {
    pub fn to_feature_set(self) -> FeatureSet {
        let features = FeatureSet {
            types: self.types,
            services: self.services,
            persistence: self.mongo,
            http: self.http,
            init: self.init,
        };
        if features.is_empty() {
            FeatureSet {
                types: true,
                ..features
            }
        } else {
            features
        }
    }
}

impl GenerateProjectRequest {
    pub fn new(spec_file: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            spec_file: spec_file.into(),
            output_dir: output_dir.into(),
            package_name: "domain".to_string(),
            features: GenerateFeatures::default(),
            overwrite: false,
            schema: None,
            strict: false,
            skip_deps: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.spec_file.as_os_str().is_empty() {
            return Err(ValidationError::MissingField("spec file".to_string()));
        }

        rules::validate_package_name(&self.package_name)
            .map_err(|e| ValidationError::InvalidPackageName(e.to_string()))?;

        if let Some(schema) = &self.schema {
            rules::validate_schema_filter(schema)
                .map_err(|e| ValidationError::InvalidConfiguration(e.to_string()))?;
        }

        Ok(())
    }

    /// Validate and freeze into the configuration every step reads
    pub fn into_config(self) -> Result<GenerationConfig, ValidationError> {
        self.validate()?;

        let policy = if self.strict {
            MappingPolicy::Strict
        } else {
            MappingPolicy::Permissive
        };

        Ok(GenerationConfig::new(self.spec_file, self.output_dir)
            .with_package_name(&self.package_name)
            .with_features(self.features.to_feature_set())
            .with_overwrite(self.overwrite)
            .with_schema_filter(self.schema)
            .with_mapping_policy(policy)
            .with_skip_deps(self.skip_deps))
    }
}

/// Response from project generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerateProjectResponse {
    pub output_path: PathBuf,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub report: GenerationReport,
}

impl GenerateProjectResponse {
    pub fn from_report(output_path: PathBuf, report: GenerationReport) -> Self {
        Self {
            output_path,
            written: report.written().count(),
            skipped: report.skipped().count(),
            failed: report.failed().count(),
            warnings: report.warnings.clone(),
            report,
        }
    }
}
