//! Business rules for the generation domain

use crate::generation::GenerationError;

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough", "for",
    "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var",
];

/// Validates that the domain package alias is a usable Go identifier
pub fn validate_package_name(name: &str) -> Result<(), GenerationError> {
    if name.is_empty() {
        return Err(GenerationError::InvalidConfiguration(
            "Package name cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GenerationError::InvalidConfiguration(format!(
            "Package name '{name}' must contain only letters, digits, and underscores"
        )));
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(GenerationError::InvalidConfiguration(format!(
            "Package name '{name}' cannot start with a digit"
        )));
    }

    if GO_KEYWORDS.contains(&name) {
        return Err(GenerationError::InvalidConfiguration(format!(
            "Package name '{name}' is a Go keyword"
        )));
    }

    Ok(())
}

/// Validates the single-schema filter before the document is consulted
pub fn validate_schema_filter(schema: &str) -> Result<(), GenerationError> {
    if schema.trim().is_empty() {
        return Err(GenerationError::InvalidConfiguration(
            "Schema filter cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_package_name() {
        assert!(validate_package_name("domain").is_ok());
        assert!(validate_package_name("models_v2").is_ok());

        assert!(validate_package_name("").is_err());
        assert!(validate_package_name("my-models").is_err());
        assert!(validate_package_name("2models").is_err());
        assert!(validate_package_name("type").is_err());
    }

    #[test]
    fn test_validate_schema_filter() {
        assert!(validate_schema_filter("Pet").is_ok());
        assert!(validate_schema_filter("  ").is_err());
    }
}
