//! Run configuration.
//!
//! [`HarvestConfig`] carries everything the binary needs for one run. The
//! [`Verbosity`] it holds is handed to the executor and pipeline when they are
//! built; nothing reads it from global state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::harvest::FilenamePolicy;

/// Default task file, relative to the working directory.
pub const DEFAULT_TASK_FILE: &str = "config.xml";

/// How much the harvest reports while it runs.
///
/// Ordered: each level includes everything the lower ones report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Nothing at all
    #[default]
    Quiet,

    /// Directory errors and per-set summaries
    Summary,

    /// Task and set progress, one line per document
    Progress,

    /// Request URLs, HTTP status, loaded tasks
    Trace,
}

impl Verbosity {
    /// Maps a repeated `-v` count onto a level.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Quiet,
            1 => Verbosity::Summary,
            2 => Verbosity::Progress,
            _ => Verbosity::Trace,
        }
    }

    pub fn shows(self, level: Verbosity) -> bool {
        level != Verbosity::Quiet && self >= level
    }

    /// Default `tracing` directive for this level.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "off",
            Verbosity::Summary | Verbosity::Progress => "info",
            Verbosity::Trace => "debug",
        }
    }
}

/// Settings for one harvest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub task_file: PathBuf,

    /// Directory to change into before reading the task file
    pub work_dir: Option<PathBuf>,

    /// Only harvest these repository ids; `None` means all
    pub repositories: Option<BTreeSet<String>>,

    pub verbosity: Verbosity,
    pub filename_policy: FilenamePolicy,

    /// Per-request HTTP timeout; no timeout when unset
    pub fetch_timeout: Option<Duration>,

    /// Where to write the JSON run report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            task_file: PathBuf::from(DEFAULT_TASK_FILE),
            work_dir: None,
            repositories: None,
            verbosity: Verbosity::default(),
            filename_policy: FilenamePolicy::default(),
            fetch_timeout: None,
            report_path: None,
        }
    }
}

/// Parses a comma separated repository list. Blank entries are dropped, and an
/// empty list means "all repositories".
pub fn parse_repository_list(list: &str) -> Option<BTreeSet<String>> {
    let repos: BTreeSet<String> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if repos.is_empty() {
        None
    } else {
        Some(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_count() {
        assert_eq!(Verbosity::from_count(0), Verbosity::Quiet);
        assert_eq!(Verbosity::from_count(1), Verbosity::Summary);
        assert_eq!(Verbosity::from_count(2), Verbosity::Progress);
        assert_eq!(Verbosity::from_count(3), Verbosity::Trace);
        assert_eq!(Verbosity::from_count(9), Verbosity::Trace);
    }

    #[test]
    fn test_verbosity_shows() {
        assert!(!Verbosity::Quiet.shows(Verbosity::Summary));
        assert!(!Verbosity::Quiet.shows(Verbosity::Quiet));
        assert!(Verbosity::Summary.shows(Verbosity::Summary));
        assert!(!Verbosity::Summary.shows(Verbosity::Progress));
        assert!(Verbosity::Trace.shows(Verbosity::Progress));
    }

    #[test]
    fn test_parse_repository_list() {
        assert_eq!(parse_repository_list(""), None);
        assert_eq!(parse_repository_list(" , "), None);

        let repos = parse_repository_list("b, a,,b").unwrap();
        assert_eq!(repos.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_default_config() {
        let config = HarvestConfig::default();
        assert_eq!(config.task_file, PathBuf::from("config.xml"));
        assert_eq!(config.verbosity, Verbosity::Quiet);
        assert_eq!(config.filename_policy, FilenamePolicy::ColonToDash);
        assert!(config.fetch_timeout.is_none());
    }
}
