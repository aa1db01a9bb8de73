//! Command executor for running shell commands
//!
//! Used after generation to fetch Go dependencies and format the output.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::generation::{CommandExecutor, CommandResult, GenerationError};

/// Default command executor using tokio::process
pub struct ShellCommandExecutor;

impl ShellCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ShellCommandExecutor {
    async fn execute(
        &self,
        command: &str,
        working_dir: &Path,
    ) -> Result<CommandResult, GenerationError> {
        let (shell, shell_arg) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        let output = Command::new(shell)
            .arg(shell_arg)
            .arg(command)
            .current_dir(working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                GenerationError::DependencyFetchWarning(format!(
                    "Failed to execute command '{command}': {e}"
                ))
            })?;

        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Executor that records commands instead of running them
#[cfg(test)]
#[derive(Default)]
pub struct RecordingCommandExecutor {
    pub commands: std::sync::Mutex<Vec<String>>,
    pub failing: Vec<String>,
}

#[cfg(test)]
impl RecordingCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` report a non-zero exit
    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    pub fn recorded(&self) -> Vec<String> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for RecordingCommandExecutor {
    async fn execute(
        &self,
        command: &str,
        _working_dir: &Path,
    ) -> Result<CommandResult, GenerationError> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.to_string());
        }
        let fails = self.failing.iter().any(|prefix| command.starts_with(prefix));
        Ok(CommandResult {
            exit_code: if fails { 1 } else { 0 },
            stdout: String::new(),
            stderr: if fails { "network unreachable".to_string() } else { String::new() },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_shell_command_executor_success() {
        let executor = ShellCommandExecutor::new();
        let dir = tempdir().unwrap();

        let result = executor.execute("echo hello", dir.path()).await.unwrap();

        assert!(result.is_success());
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_shell_command_executor_failure() {
        let executor = ShellCommandExecutor::new();
        let dir = tempdir().unwrap();

        let result = executor.execute("exit 3", dir.path()).await.unwrap();

        assert!(!result.is_success());
        assert_eq!(result.exit_code, 3);
    }

    #[tokio::test]
    async fn test_shell_command_executor_runs_in_working_dir() {
        let executor = ShellCommandExecutor::new();
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module x\n").unwrap();

        let result = executor.execute("cat go.mod", dir.path()).await.unwrap();
        assert_eq!(result.stdout, "module x\n");
    }

    #[tokio::test]
    async fn test_recording_command_executor() {
        let executor = RecordingCommandExecutor::new().failing_on("go get");
        let dir = tempdir().unwrap();

        let fetched = executor.execute("go get example.com/x", dir.path()).await.unwrap();
        assert!(!fetched.is_success());
        let tidy = executor.execute("go mod tidy", dir.path()).await.unwrap();
        assert!(tidy.is_success());

        assert_eq!(executor.recorded(), vec!["go get example.com/x", "go mod tidy"]);
    }
}
