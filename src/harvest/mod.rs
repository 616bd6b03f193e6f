//! Harvest module - per-set record retrieval and response classification.
//!
//! - **Classification**: [`classify`] maps a raw `GetRecord` response to a [`FetchOutcome`]
//! - **Paths**: identifier-to-file-name policy and traversal guard
//! - **Reports**: counters per set, task and run
//! - **Pipeline**: sequential set/document executor via [`pipeline::HarvestPipeline`]

pub mod classify;
pub mod paths;
pub mod pipeline;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

// Re-export commonly used types
pub use classify::classify;
pub use paths::{safe_child, FilenamePolicy};
pub use pipeline::{ensure_directory, get_record_url, HarvestPipeline};
pub use traits::{
    DocumentFailure, FetchOutcome, HarvestError, MalformedReason, RunReport, SetReport, TaskReport,
};
