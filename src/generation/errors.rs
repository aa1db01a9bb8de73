//! Error types for the generation domain

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("OpenAPI loading error: {0}")]
    LoadError(String),

    #[error("Schema '{0}' not found in the OpenAPI document")]
    SchemaNotFound(String),

    #[error("Operation '{0}' not found in the OpenAPI document")]
    OperationNotFound(String),

    #[error("Failed to resolve operation '{operation_id}': {reason}")]
    OperationResolutionError {
        operation_id: String,
        reason: String,
    },

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Failed to write {}: {source}", path.display())]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dependency fetch failed: {0}")]
    DependencyFetchWarning(String),

    #[error("Schema '{0}' cannot be represented without falling back to interface{{}}")]
    UnrepresentableSchema(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: &'static str,
        #[source]
        source: Box<GenerationError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GenerationError {
    /// Wrap a run-level failure with the name of the pipeline step
    pub fn in_step(self, step: &'static str) -> Self {
        GenerationError::StepFailed {
            step,
            source: Box::new(self),
        }
    }

    /// Errors that invalidate the whole run rather than a single artifact
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GenerationError::ValidationError(_)
                | GenerationError::LoadError(_)
                | GenerationError::SchemaNotFound(_)
                | GenerationError::InvalidConfiguration(_)
                | GenerationError::StepFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_wrapping_keeps_source() {
        let err = GenerationError::SchemaNotFound("Pet".to_string()).in_step("resolve resources");
        assert_eq!(
            err.to_string(),
            "Step 'resolve resources' failed: Schema 'Pet' not found in the OpenAPI document"
        );
        assert!(err.is_fatal());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_artifact_scoped_errors_are_not_fatal() {
        assert!(!GenerationError::RenderError("bad".into()).is_fatal());
        assert!(
            !GenerationError::OperationResolutionError {
                operation_id: "x".into(),
                reason: "y".into()
            }
            .is_fatal()
        );
    }
}
