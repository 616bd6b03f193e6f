//! `selective-harvest` - harvest the records named in a task file.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use selective_harvester::cli::Cli;
use selective_harvester::config::{HarvestConfig, Verbosity};
use selective_harvester::{logging, task, HarvestExecutor, HttpFetcher};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    logging::init(config.verbosity);

    match run(&config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            if config.verbosity.shows(Verbosity::Summary) {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &HarvestConfig) -> Result<bool> {
    let verbosity = config.verbosity;

    // Resolve the report path against the directory we were started in.
    let report_path = match &config.report_path {
        Some(path) => Some(std::env::current_dir()?.join(path)),
        None => None,
    };

    if let Some(dir) = &config.work_dir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Cannot change to working directory \"{}\"", dir.display()))?;
    }
    if verbosity.shows(Verbosity::Progress) {
        info!("working in directory \"{}\"", std::env::current_dir()?.display());
        match &config.repositories {
            None => info!(
                "Harvest all repos found in \"{}\"",
                config.task_file.display()
            ),
            Some(repos) => info!(
                "Harvest repositories \"{}\" only",
                repos.iter().cloned().collect::<Vec<_>>().join("\", \"")
            ),
        }
    }

    let tasks = task::load_tasks(&config.task_file)?;
    let selection = task::select_repositories(tasks, config.repositories.as_ref());
    if verbosity.shows(Verbosity::Progress) {
        for name in &selection.skipped {
            info!("skipping repo \"{}\"", name);
        }
    }
    if verbosity.shows(Verbosity::Summary) {
        for name in &selection.missing {
            warn!("repo \"{}\" is not defined in the task file", name);
        }
    }
    if verbosity.shows(Verbosity::Trace) {
        debug!(tasks = ?selection.tasks, "Loaded tasks");
    }
    if selection.tasks.is_empty() {
        bail!("No repositories to harvest");
    }

    let fetcher = HttpFetcher::with_timeout(config.fetch_timeout)?;
    let executor = HarvestExecutor::new(fetcher)
        .with_verbosity(verbosity)
        .with_filename_policy(config.filename_policy);
    let report = executor.run(&selection.tasks).await;

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Cannot write report \"{}\"", path.display()))?;
    }

    Ok(report.all_succeeded())
}
