//! Render context - the data handed to the template renderer

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::generation::{FeatureSet, GenerationError};

/// Values shared by every template of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInfo {
    /// Go module path from `go.mod`
    pub module_path: String,
    /// Last segment of the module path; names the `cmd/` directory
    pub app_name: String,
    pub package_name: String,
    pub api_title: String,
    pub api_version: String,
    pub features: FeatureSet,
}

impl ProjectInfo {
    /// Import path of a package inside the generated module
    pub fn import_path(&self, relative: &str) -> String {
        format!("{}/{}", self.module_path, relative)
    }
}

/// Named values a template can read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    variables: Map<String, JsonValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context pre-populated with the shared `project` variable
    pub fn for_project(project: &ProjectInfo) -> Result<Self, GenerationError> {
        let mut context = Self::new();
        context.insert("project", project)?;
        Ok(context)
    }

    /// Add a variable to the render context
    pub fn add_variable(&mut self, key: &str, value: JsonValue) {
        self.variables.insert(key.to_string(), value);
    }

    /// Serialize and add a variable
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), GenerationError> {
        self.add_variable(key, serde_json::to_value(value)?);
        Ok(())
    }

    /// Builder form of [`RenderContext::insert`]
    pub fn with<T: Serialize + ?Sized>(
        mut self,
        key: &str,
        value: &T,
    ) -> Result<Self, GenerationError> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn has_variable(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.variables.get(key)
    }

    /// The whole context as one JSON object
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.variables.clone())
    }
}
