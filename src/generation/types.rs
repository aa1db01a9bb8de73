//! Core types for the generation domain

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Whether repeated runs may replace a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMutability {
    /// Written once; later runs keep user edits unless overwrite is set
    Stable,
    /// Regenerated on every run
    Derived,
}

/// What to do with an artifact given the state of the target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    Write,
    SkipExisting,
}

impl WriteDecision {
    pub fn decide(mutability: FileMutability, exists: bool, overwrite: bool) -> Self {
        match mutability {
            FileMutability::Derived => WriteDecision::Write,
            FileMutability::Stable if !exists || overwrite => WriteDecision::Write,
            FileMutability::Stable => WriteDecision::SkipExisting,
        }
    }
}

/// A rendered file, addressed relative to the output directory
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Path in the logical layout, e.g. `cmd/routes.go`
    pub logical_name: String,
    pub path: PathBuf,
    pub content: String,
    pub mutability: FileMutability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ArtifactOutcome {
    Written,
    Skipped,
    Failed(String),
}

impl fmt::Display for ArtifactOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactOutcome::Written => write!(f, "written"),
            ArtifactOutcome::Skipped => write!(f, "skipped"),
            ArtifactOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub logical_name: String,
    pub path: PathBuf,
    pub outcome: ArtifactOutcome,
}

/// Per-artifact results of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub entries: Vec<ReportEntry>,
    pub warnings: Vec<String>,
}

impl GenerationReport {
    pub fn record(&mut self, logical_name: &str, path: PathBuf, outcome: ArtifactOutcome) {
        self.entries.push(ReportEntry {
            logical_name: logical_name.to_string(),
            path,
            outcome,
        });
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn written(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome == ArtifactOutcome::Written)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome == ArtifactOutcome::Skipped)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, ArtifactOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Latest outcome recorded for a logical name
    pub fn outcome_of(&self, logical_name: &str) -> Option<&ArtifactOutcome> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.logical_name == logical_name)
            .map(|e| &e.outcome)
    }
}
