//! Project layout
//!
//! Maps logical artifact names onto the generated project's directory
//! structure and owns the fixed table of which files are derived.

use std::path::{Path, PathBuf};

use crate::generation::FileMutability;

/// Logical filename suffixes that are regenerated on every run
const DERIVED_SUFFIXES: &[&str] = &["routes.go", "database.go"];

const FALLBACK_MODULE: &str = "generated-api";

/// Logical root prefixes and the physical directories they live in
const ROOTS: &[(&str, &str)] = &[
    ("domain", "internal/pkg/domain"),
    ("httputil", "internal/pkg/httputil"),
    ("services", "internal/services"),
    ("repository", "internal/adapters/repository"),
    ("http", "internal/adapters/http"),
];

/// Mutability of a logical file, by suffix
pub fn mutability_of(logical_name: &str) -> FileMutability {
    if DERIVED_SUFFIXES
        .iter()
        .any(|suffix| logical_name.ends_with(suffix))
    {
        FileMutability::Derived
    } else {
        FileMutability::Stable
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    app_name: String,
}

impl ProjectLayout {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Physical path, relative to the output directory
    pub fn resolve(&self, logical_name: &str) -> PathBuf {
        let (root, rest) = logical_name.split_once('/').unwrap_or(("", logical_name));
        match root {
            "cmd" => Path::new("cmd").join(&self.app_name).join(rest),
            "project" => PathBuf::from(rest),
            _ => match ROOTS.iter().find(|(logical, _)| *logical == root) {
                Some((_, physical)) => Path::new(physical).join(rest),
                None => PathBuf::from(logical_name),
            },
        }
    }

    /// Directories created on init
    pub fn skeleton(&self) -> Vec<PathBuf> {
        let mut dirs = vec![Path::new("cmd").join(&self.app_name)];
        dirs.extend(ROOTS.iter().map(|(_, physical)| PathBuf::from(physical)));
        dirs
    }
}

/// Module path declared in a `go.mod` file
pub fn parse_module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches('"');
        (!module.is_empty()).then(|| module.to_string())
    })
}

/// Module name derived from the output directory's base name
pub fn default_module_path(output_dir: &Path) -> String {
    let absolute = std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
    let base = absolute
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let canonical: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let canonical = canonical.trim_matches(|c| c == '-' || c == '.');

    if canonical.is_empty() {
        FALLBACK_MODULE.to_string()
    } else {
        canonical.to_string()
    }
}

/// Last path segment of a module path
pub fn app_name_from_module(module_path: &str) -> String {
    module_path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(FALLBACK_MODULE)
        .to_string()
}
