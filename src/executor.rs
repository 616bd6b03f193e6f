use crate::config::Verbosity;
use crate::harvest::pipeline::{ensure_directory, HarvestPipeline};
use crate::harvest::{FilenamePolicy, RunReport, TaskReport};
use crate::model::RepositoryTask;
use crate::traits::DocumentFetcher;
use tracing::{error, info, instrument};

/// Runs repository tasks one after another through a [`HarvestPipeline`].
pub struct HarvestExecutor<F>
where
    F: DocumentFetcher,
{
    pipeline: HarvestPipeline<F>,
}

impl<F> HarvestExecutor<F>
where
    F: DocumentFetcher,
{
    pub fn new(fetcher: F) -> Self {
        Self {
            pipeline: HarvestPipeline::new(fetcher),
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.pipeline = self.pipeline.with_verbosity(verbosity);
        self
    }

    pub fn with_filename_policy(mut self, policy: FilenamePolicy) -> Self {
        self.pipeline = self.pipeline.with_filename_policy(policy);
        self
    }

    pub fn pipeline(&self) -> &HarvestPipeline<F> {
        &self.pipeline
    }

    /// Harvests every task in order and reports on all of them.
    pub async fn run(&self, tasks: &[RepositoryTask]) -> RunReport {
        let mut report = RunReport::default();
        for task in tasks {
            report.tasks.push(self.harvest_task(task).await);
        }
        report
    }

    /// `true` iff every set of every task fully succeeded.
    pub async fn harvest_all(&self, tasks: &[RepositoryTask]) -> bool {
        self.run(tasks).await.all_succeeded()
    }

    /// Harvests all sets of one task.
    ///
    /// A destination root that cannot be used fails the whole task before any
    /// set is looked at. A bad set directory only fails that set.
    #[instrument(skip(self, task), fields(task = %task.name))]
    pub async fn harvest_task(&self, task: &RepositoryTask) -> TaskReport {
        let verbosity = self.pipeline.verbosity();
        if verbosity.shows(Verbosity::Progress) {
            info!("Harvesting from \"{}\"", task.name);
        }

        let mut report = TaskReport {
            name: task.name.clone(),
            ..TaskReport::default()
        };

        if let Err(e) = ensure_directory(&task.destination).await {
            if verbosity.shows(Verbosity::Summary) {
                error!("{}", e);
            }
            report.directory_error = Some(e.to_string());
            return report;
        }

        for set in &task.sets {
            report.sets.push(self.pipeline.harvest_set(task, set).await);
        }

        if verbosity.shows(Verbosity::Progress) {
            info!(
                good = report.documents_succeeded(),
                missed = report.documents_failed(),
                "Finished \"{}\"",
                task.name
            );
        }
        report
    }
}
