//! Tera-based template renderer implementation

use std::collections::HashMap;
use std::error::Error as _;
use tera::{Context as TeraContext, Tera, Value};

use crate::generation::sanitizers::go_string_literal;
use crate::generation::utils::{to_camel_case, to_pascal_case, to_snake_case};
use crate::generation::{GenerationError, RenderContext, TemplateRenderer};
use crate::infrastructure::templates::embedded_templates;

/// Renders logical template ids with a shared Tera instance
pub struct TeraTemplateRenderer {
    tera: Tera,
}

impl TeraTemplateRenderer {
    /// Renderer over the templates embedded in the binary
    pub fn new() -> Result<Self, GenerationError> {
        Self::from_templates(embedded_templates())
    }

    /// Renderer over arbitrary `(id, source)` pairs
    pub fn from_templates<I, K, V>(templates: I) -> Result<Self, GenerationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_templates(templates).map_err(|e| {
            GenerationError::RenderError(format!("Failed to load templates: {}", describe(&e)))
        })?;

        tera.register_filter("pascal_case", pascal_case_filter);
        tera.register_filter("camel_case", camel_case_filter);
        tera.register_filter("snake_case", snake_case_filter);
        tera.register_filter("go_string", go_string_filter);

        Ok(Self { tera })
    }

    pub fn has_template(&self, template_id: &str) -> bool {
        self.tera.get_template_names().any(|name| name == template_id)
    }
}

impl TemplateRenderer for TeraTemplateRenderer {
    fn render(
        &self,
        template_id: &str,
        context: &RenderContext,
    ) -> Result<String, GenerationError> {
        let tera_context = TeraContext::from_value(context.to_json()).map_err(|e| {
            GenerationError::RenderError(format!(
                "Invalid context for '{template_id}': {}",
                describe(&e)
            ))
        })?;

        self.tera.render(template_id, &tera_context).map_err(|e| {
            GenerationError::RenderError(format!(
                "Template '{template_id}' failed: {}",
                describe(&e)
            ))
        })
    }
}

/// Tera reports the interesting part of an error in its source chain
fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn string_value(filter: &str, value: &Value) -> tera::Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| tera::Error::msg(format!("Filter `{filter}` expects a string, got {value}")))
}

fn pascal_case_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_pascal_case(&string_value("pascal_case", value)?)))
}

fn camel_case_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_camel_case(&string_value("camel_case", value)?)))
}

fn snake_case_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_snake_case(&string_value("snake_case", value)?)))
}

fn go_string_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(go_string_literal(&string_value("go_string", value)?)))
}
