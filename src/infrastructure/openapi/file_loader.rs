//! File-based OpenAPI document loader
//!
//! This loader handles only file I/O and format detection. The actual parsing
//! is done by the OpenApiParser.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::path::Path;
use tokio::fs;

use super::parser::OpenApiParser;
use super::types::ApiDocument;
use crate::generation::{GenerationError, OpenApiLoader};

/// Loads OpenAPI documents from local JSON or YAML files
pub struct FileOpenApiLoader;

impl FileOpenApiLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw document text, choosing the format from the file extension
    pub fn parse_content(source: &Path, content: &str) -> Result<JsonValue, GenerationError> {
        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => serde_json::from_str(content)
                .map_err(|e| GenerationError::LoadError(format!("Failed to parse JSON: {e}"))),
            Some("yaml") | Some("yml") => parse_yaml(content),
            // Try JSON first, then YAML
            _ => serde_json::from_str(content).or_else(|_| parse_yaml(content)),
        }
    }
}

#[async_trait]
impl OpenApiLoader for FileOpenApiLoader {
    async fn load(&self, source: &Path) -> Result<ApiDocument, GenerationError> {
        let content = fs::read_to_string(source).await.map_err(|e| {
            GenerationError::LoadError(format!("Failed to read {}: {e}", source.display()))
        })?;

        let spec_value = Self::parse_content(source, &content)?;
        OpenApiParser::new(spec_value).parse()
    }
}

impl Default for FileOpenApiLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_yaml(content: &str) -> Result<JsonValue, GenerationError> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| GenerationError::LoadError(format!("Failed to parse YAML: {e}")))?;
    Ok(yaml_to_json(value))
}

/// Convert YAML to JSON, stringifying non-string mapping keys such as
/// unquoted status codes (`200:`).
fn yaml_to_json(value: serde_yaml::Value) -> JsonValue {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => JsonValue::Null,
        Yaml::Bool(b) => JsonValue::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            }
        }
        Yaml::String(s) => JsonValue::String(s),
        Yaml::Sequence(items) => JsonValue::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(entries) => JsonValue::Object(
            entries
                .into_iter()
                .map(|(key, value)| (yaml_key(key), yaml_to_json(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
