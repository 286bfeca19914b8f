//! Sweeps old workflow runs out of every configured repository, one repository at a time.
//!
//! Failures never stop the sweep: a repository that cannot be listed is skipped, a run with a
//! malformed timestamp is skipped, and a failed deletion is logged. Nothing is retried.

mod report;

pub use report::*;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info, warn};

use crate::{
    config::SweepConfig,
    error::Result,
    workflow::{WorkflowRun, client::GitHubClient},
};

/// The instant before which runs are deleted.
///
/// Saturates at the earliest representable instant, so an absurd retention deletes nothing.
pub fn cutoff(now: DateTime<Utc>, retention: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(retention)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Deletes workflow runs older than the configured retention.
#[derive(Debug)]
pub struct Sweeper {
    config: SweepConfig,
    client: GitHubClient,
}

impl Sweeper {
    /// Creates a sweeper and its HTTP client. No request is sent yet.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Config`](crate::error::SweepError::Config) if the HTTP client cannot
    /// be built from the configuration.
    pub fn new(config: SweepConfig) -> Result<Self> {
        let client = GitHubClient::new(config.api_url(), config.token(), config.timeout())?;
        Ok(Self { config, client })
    }

    /// The configuration this sweeper was built with.
    pub const fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Sweeps every configured repository in order, measuring the cutoff against the current
    /// time before each one.
    pub async fn run(&self) -> SweepReport {
        if self.config.dry_run() {
            warn!("dry run, no workflow run will be deleted");
        }

        let mut report = SweepReport::default();
        for repository in self.config.repositories() {
            report
                .repositories
                .push(self.sweep_repository(repository, Utc::now()).await);
        }
        report
    }

    /// Sweeps one repository against the cutoff derived from `now`.
    pub async fn sweep_repository(&self, repository: &str, now: DateTime<Utc>) -> RepositoryReport {
        let owner = self.config.owner();
        info!("📦 checking {owner}/{repository}…");

        let outcome = match self.client.list_runs(owner, repository).await {
            Ok(page) => {
                let cutoff = cutoff(now, self.config.retention());
                let mut result = SweepResult {
                    unlisted: page.unlisted(),
                    ..SweepResult::default()
                };
                for run in &page.workflow_runs {
                    result.record(self.sweep_run(repository, run, cutoff).await);
                }
                info!("✅ done with {owner}/{repository}: {result}");
                Ok(result)
            }
            Err(err) => {
                error!("{err}, skipping {owner}/{repository}");
                Err(err)
            }
        };

        RepositoryReport {
            repository: repository.to_owned(),
            outcome,
        }
    }

    async fn sweep_run(
        &self,
        repository: &str,
        run: &WorkflowRun,
        cutoff: DateTime<Utc>,
    ) -> RunOutcome {
        let created_at = match run.parse_created_at() {
            Ok(created_at) => created_at,
            Err(err) => {
                warn!("{err}, skipping it");
                return RunOutcome::Unparsable;
            }
        };

        if created_at >= cutoff {
            return RunOutcome::Kept;
        }

        if self.config.dry_run() {
            info!("would delete run {run}");
            return RunOutcome::WouldDelete;
        }

        match self
            .client
            .delete_run(self.config.owner(), repository, run.id)
            .await
        {
            Ok(()) => {
                info!("🗑️ deleted run {run}");
                RunOutcome::Deleted
            }
            Err(err) => {
                warn!("⚠️ {err}");
                RunOutcome::DeleteFailed
            }
        }
    }
}
