//! Core types for the selective harvest.
//!
//! This module defines what flows out of each harvested identifier and how it
//! aggregates upward:
//! - Per-identifier results via [`FetchOutcome`]
//! - Per-set, per-task and per-run summaries via [`SetReport`], [`TaskReport`]
//!   and [`RunReport`]
//! - Directory-level errors via [`HarvestError`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Outcome Types
// ============================================================================

/// Result of harvesting a single identifier.
///
/// Exactly one outcome is produced per identifier. Only [`FetchOutcome::Success`]
/// leaves a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The record's metadata fragment, with the protocol envelope stripped
    Success(String),

    /// The repository answered with a structured `<error>` element
    ProtocolError { code: String, message: String },

    /// The response matched neither the record nor the error shape
    Malformed(MalformedReason),

    /// Retrieval (or the filesystem around it) failed before classification
    TransportFailure(String),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Human-readable failure reason, or `None` for a success.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::ProtocolError { code, message } => Some(format!("{}: {}", code, message)),
            FetchOutcome::Malformed(reason) => Some(reason.to_string()),
            FetchOutcome::TransportFailure(description) => Some(description.clone()),
        }
    }
}

/// Why a response could not be classified as a record or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Record markers present, but no metadata element could be extracted
    NoMetadata,

    /// An error marker is present, but no code/message could be extracted
    UnparsableError,

    /// Neither a record nor an error marker is present
    NoRecordOrError,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MalformedReason::NoMetadata => "No metadata found",
            MalformedReason::UnparsableError => "Could not parse error message",
            MalformedReason::NoRecordOrError => "No record found and no error message found",
        };
        f.write_str(text)
    }
}

// ============================================================================
// Reports
// ============================================================================

/// A failed identifier and the reason it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub identifier: String,
    pub reason: String,
}

/// Counters for one output set.
///
/// When `directory_error` is `None`, `succeeded + failed == attempted` and
/// `attempted` equals the number of identifiers in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetReport {
    pub name: String,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,

    /// Set directory could not be used; no identifiers were attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_error: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DocumentFailure>,
}

impl SetReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn directory_failed(name: impl Into<String>, error: &HarvestError) -> Self {
        Self {
            name: name.into(),
            directory_error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Folds one identifier's outcome into the counters.
    pub fn record(&mut self, identifier: &str, outcome: &FetchOutcome) {
        self.attempted += 1;
        match outcome.failure_reason() {
            None => self.succeeded += 1,
            Some(reason) => {
                self.failed += 1;
                self.failures.push(DocumentFailure {
                    identifier: identifier.to_string(),
                    reason,
                });
            }
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.directory_error.is_none() && self.failed == 0
    }
}

/// Result of harvesting one repository task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    pub name: String,

    /// Destination root could not be used; no sets were attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_error: Option<String>,

    pub sets: Vec<SetReport>,
}

impl TaskReport {
    pub fn all_succeeded(&self) -> bool {
        self.directory_error.is_none() && self.sets.iter().all(SetReport::all_succeeded)
    }

    pub fn documents_succeeded(&self) -> usize {
        self.sets.iter().map(|s| s.succeeded).sum()
    }

    pub fn documents_failed(&self) -> usize {
        self.sets.iter().map(|s| s.failed).sum()
    }
}

/// Result of a whole harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    /// `true` iff every set of every task fully succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.tasks.iter().all(TaskReport::all_succeeded)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that make a destination or set directory unusable.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Directory was missing and could not be created
    #[error("Cannot create directory \"{}\": {}", .path.display(), .source)]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path exists but is not a directory
    #[error("\"{}\" is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    /// Task has no destination directory configured
    #[error("No destination directory configured")]
    MissingDestination,

    /// A set or file name would escape its parent directory
    #[error("Path traversal attempt rejected: '{attempted}'")]
    PathTraversal { attempted: String },
}

// ============================================================================
// Tests
// ============================================================================
