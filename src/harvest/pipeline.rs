//! Set and document level of the harvest.
//!
//! [`HarvestPipeline`] walks one output set, one identifier at a time:
//! build the `GetRecord` URL, fetch into the target file, classify what
//! landed on disk, then keep only the extracted metadata or remove the file.
//! Every identifier ends in exactly one [`FetchOutcome`]; nothing at this
//! level stops the loop early.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Verbosity;
use crate::harvest::classify::classify;
use crate::harvest::paths::{safe_child, FilenamePolicy};
use crate::harvest::traits::{FetchOutcome, HarvestError, SetReport};
use crate::model::{OutputSet, RepositoryTask};
use crate::traits::{DocumentFetcher, FetchError};

// ============================================================================
// Requests and Directories
// ============================================================================

/// Builds the `GetRecord` request URL for one identifier.
///
/// Any query string already on `base_url` is kept; the protocol parameters
/// are appended form-encoded.
pub fn get_record_url(
    base_url: &str,
    identifier: &str,
    metadata_prefix: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut()
        .append_pair("verb", "GetRecord")
        .append_pair("identifier", identifier)
        .append_pair("metadataPrefix", metadata_prefix);
    Ok(url)
}

/// Makes sure `path` is a directory, creating it (and its parents) if missing.
///
/// # Errors
///
/// - [`HarvestError::MissingDestination`] for an empty path
/// - [`HarvestError::NotADirectory`] if something else already lives there
/// - [`HarvestError::DirectoryCreation`] if it cannot be inspected or created
pub async fn ensure_directory(path: &Path) -> Result<(), HarvestError> {
    if path.as_os_str().is_empty() {
        return Err(HarvestError::MissingDestination);
    }

    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(HarvestError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => tokio::fs::create_dir_all(path)
            .await
            .map_err(|source| HarvestError::DirectoryCreation {
                path: path.to_path_buf(),
                source,
            }),
        Err(source) => Err(HarvestError::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Removes a leftover file. A file that is already gone is fine.
async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove file"),
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Harvests output sets through a [`DocumentFetcher`].
///
/// Strictly sequential: an identifier is fetched, classified and persisted
/// before the next one starts. Identifiers run in ascending order.
///
/// # Example
///
/// ```ignore
/// use selective_harvester::fetch::HttpFetcher;
/// use selective_harvester::harvest::HarvestPipeline;
///
/// let pipeline = HarvestPipeline::new(HttpFetcher::new()?)
///     .with_verbosity(Verbosity::Progress);
/// let report = pipeline.harvest_set(&task, &task.sets[0]).await;
/// println!("{} good, {} missed", report.succeeded, report.failed);
/// ```
pub struct HarvestPipeline<F>
where
    F: DocumentFetcher,
{
    fetcher: F,
    filename_policy: FilenamePolicy,
    verbosity: Verbosity,
}

impl<F> HarvestPipeline<F>
where
    F: DocumentFetcher,
{
    /// Creates a pipeline with colon-to-dash file names and no reporting.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            filename_policy: FilenamePolicy::default(),
            verbosity: Verbosity::default(),
        }
    }

    pub fn with_filename_policy(mut self, policy: FilenamePolicy) -> Self {
        self.filename_policy = policy;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Harvests every identifier of `set` into `<destination>/<set name>`.
    ///
    /// The task's destination root is expected to exist already. If the set
    /// directory cannot be used, no identifier is attempted and the report
    /// carries the directory error.
    pub async fn harvest_set(&self, task: &RepositoryTask, set: &OutputSet) -> SetReport {
        if self.verbosity.shows(Verbosity::Progress) {
            info!(
                "Harvesting \"{}\" set \"{}\" with {} documents",
                task.name,
                set.name,
                set.identifiers.len()
            );
        }

        let set_dir = match self.prepare_set_dir(task, set).await {
            Ok(dir) => dir,
            Err(e) => {
                if self.verbosity.shows(Verbosity::Summary) {
                    error!(task = %task.name, set = %set.name, "{}", e);
                }
                return SetReport::directory_failed(&set.name, &e);
            }
        };

        let mut report = SetReport::new(&set.name);
        // File name -> identifier that claimed it in this pass.
        let mut claimed: HashMap<String, &str> = HashMap::new();
        for identifier in &set.identifiers {
            let file_name = self.filename_policy.file_name(identifier);
            let outcome = match claimed.get(&file_name) {
                Some(owner) => FetchOutcome::TransportFailure(format!(
                    "file name \"{}\" collides with identifier \"{}\"",
                    file_name, owner
                )),
                None => {
                    claimed.insert(file_name, identifier);
                    self.harvest_document(task, identifier, &set_dir).await
                }
            };
            self.report_document(identifier, &outcome);
            report.record(identifier, &outcome);
        }

        if self.verbosity.shows(Verbosity::Summary) {
            info!(
                "Harvested \"{}\" set \"{}\" {} good, {} missed",
                task.name, set.name, report.succeeded, report.failed
            );
        }
        report
    }

    async fn prepare_set_dir(
        &self,
        task: &RepositoryTask,
        set: &OutputSet,
    ) -> Result<PathBuf, HarvestError> {
        let dir = safe_child(&task.destination, &set.name)?;
        ensure_directory(&dir).await?;
        Ok(dir)
    }

    /// Harvests one identifier into `set_dir`.
    ///
    /// On [`FetchOutcome::Success`] the file holds exactly the extracted
    /// metadata; on any other outcome no file is left behind.
    pub async fn harvest_document(
        &self,
        task: &RepositoryTask,
        identifier: &str,
        set_dir: &Path,
    ) -> FetchOutcome {
        let file_name = self.filename_policy.file_name(identifier);
        let dest = match safe_child(set_dir, &file_name) {
            Ok(dest) => dest,
            Err(e) => return FetchOutcome::TransportFailure(e.to_string()),
        };

        let outcome = match self.retrieve(task, identifier, &dest).await {
            Ok(raw) => classify(&raw),
            Err(e) => FetchOutcome::TransportFailure(e.to_string()),
        };

        match outcome {
            FetchOutcome::Success(payload) => match tokio::fs::write(&dest, &payload).await {
                Ok(()) => FetchOutcome::Success(payload),
                Err(e) => {
                    discard(&dest).await;
                    FetchOutcome::TransportFailure(FetchError::Io(e).to_string())
                }
            },
            other => {
                discard(&dest).await;
                other
            }
        }
    }

    /// Fetches the record into `dest` and reads back the raw response.
    async fn retrieve(
        &self,
        task: &RepositoryTask,
        identifier: &str,
        dest: &Path,
    ) -> Result<String, FetchError> {
        let url = get_record_url(&task.base_url, identifier, &task.metadata_prefix)?;
        if self.verbosity.shows(Verbosity::Trace) {
            debug!(fetcher = self.fetcher.fetcher_id(), url = %url, "Fetching record");
        }

        self.fetcher.fetch(url.as_str(), dest).await?;
        Ok(tokio::fs::read_to_string(dest).await?)
    }

    fn report_document(&self, identifier: &str, outcome: &FetchOutcome) {
        if !self.verbosity.shows(Verbosity::Progress) {
            return;
        }
        match outcome.failure_reason() {
            None => info!("harvesting \"{:<40}\" ... OK", identifier),
            Some(reason) => warn!(
                "harvesting \"{:<40}\" ... XX {}",
                identifier,
                reason.trim_end_matches('\n')
            ),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
