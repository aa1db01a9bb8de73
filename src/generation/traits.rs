//! Port interfaces for the generation domain

use async_trait::async_trait;
use std::path::Path;

use crate::generation::{GenerationError, RenderContext};
use crate::infrastructure::openapi::ApiDocument;

/// Loads OpenAPI specifications
#[async_trait]
pub trait OpenApiLoader: Send + Sync {
    /// Load and validate an OpenAPI document
    async fn load(&self, source: &Path) -> Result<ApiDocument, GenerationError>;
}

/// Turns a logical template id plus data into text
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template_id: &str, context: &RenderContext)
    -> Result<String, GenerationError>;
}

/// Writes generated files to the output destination
#[async_trait]
pub trait OutputService: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    /// Read a file, `None` when it does not exist
    async fn read_file(&self, path: &Path) -> Result<Option<String>, GenerationError>;

    /// Write a file, creating parent directories as needed
    async fn write_file(&self, path: &Path, content: &str) -> Result<(), GenerationError>;

    /// Ensure a directory exists
    async fn ensure_directory(&self, path: &Path) -> Result<(), GenerationError>;
}

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes external commands (dependency fetching, formatting)
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute a shell command in the given working directory
    async fn execute(
        &self,
        command: &str,
        working_dir: &Path,
    ) -> Result<CommandResult, GenerationError>;
}
