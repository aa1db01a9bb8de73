//! Templates embedded at compile time

use rust_embed::RustEmbed;
use tracing::debug;

/// Container for all templates embedded at compile time
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Root directory of the Go templates inside the embedded tree
const GO_ROOT: &str = "go/";

const TEMPLATE_EXTENSION: &str = ".tera";

/// Every embedded Go template as `(template_id, source)`.
///
/// The id is the path below `go/` without the `.tera` extension, so
/// `go/domain/types.go.tera` is `domain/types.go`.
pub fn embedded_templates() -> Vec<(String, String)> {
    let mut templates: Vec<(String, String)> = EmbeddedTemplates::iter()
        .filter_map(|path| {
            let id = path
                .strip_prefix(GO_ROOT)?
                .strip_suffix(TEMPLATE_EXTENSION)?
                .to_string();
            let file = EmbeddedTemplates::get(&path)?;
            match String::from_utf8(file.data.into_owned()) {
                Ok(source) => Some((id, source)),
                Err(_) => {
                    debug!(template = %path, "Skipping non UTF-8 template");
                    None
                }
            }
        })
        .collect();
    templates.sort_by(|a, b| a.0.cmp(&b.0));
    templates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_template_ids_are_embedded() {
        let ids: Vec<String> = embedded_templates().into_iter().map(|(id, _)| id).collect();
        for expected in [
            "cmd/database.go",
            "cmd/main.go",
            "cmd/routes.go",
            "domain/errors.go",
            "domain/types.go",
            "http/handler.go",
            "http/handler_test.go",
            "http/mock_service.go",
            "http/registration.go",
            "http/service_adapter.go",
            "httputil/handler_wrapper.go",
            "httputil/http_utils.go",
            "project/env",
            "project/go.mod",
            "repository/repository.go",
            "repository/repository_test.go",
            "service/service.go",
            "service/service_test.go",
        ] {
            assert!(ids.iter().any(|id| id == expected), "missing template {expected}");
        }
    }
}
