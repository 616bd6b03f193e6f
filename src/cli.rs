//! Command-line arguments.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{parse_repository_list, HarvestConfig, Verbosity, DEFAULT_TASK_FILE};
use crate::harvest::FilenamePolicy;

/// Harvest individual OAI-PMH records by identifier into per-set directories.
#[derive(Debug, Parser)]
#[command(name = "selective-harvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the task file (xml)
    #[arg(short, long, default_value = DEFAULT_TASK_FILE, env = "SELECTIVE_HARVEST_CONFIG")]
    pub config: PathBuf,

    /// Path to the working directory
    #[arg(short, long)]
    pub workdir: Option<PathBuf>,

    /// Only harvest repositories in this comma separated list of ids
    #[arg(short, long, default_value = "")]
    pub repo: String,

    /// Print messages (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// How identifiers become file names
    #[arg(long, value_enum, default_value_t = FilenameArg::ColonToDash)]
    pub filenames: FilenameArg,

    /// Per-request HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// File name policy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilenameArg {
    /// Replace ':' with '-' only
    ColonToDash,
    /// Replace anything outside [A-Za-z0-9._-] with '-'
    Portable,
}

impl From<FilenameArg> for FilenamePolicy {
    fn from(arg: FilenameArg) -> Self {
        match arg {
            FilenameArg::ColonToDash => FilenamePolicy::ColonToDash,
            FilenameArg::Portable => FilenamePolicy::Portable,
        }
    }
}

impl Cli {
    pub fn into_config(self) -> HarvestConfig {
        HarvestConfig {
            task_file: self.config,
            work_dir: self.workdir,
            repositories: parse_repository_list(&self.repo),
            verbosity: Verbosity::from_count(self.verbose),
            filename_policy: self.filenames.into(),
            fetch_timeout: self.timeout.map(Duration::from_secs),
            report_path: self.report,
        }
    }
}
