use std::fmt::Display;

use crate::error::SweepError;

/// What happened to a single run during a sweep.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run is on or after the cutoff.
    Kept,
    /// The run was older than the cutoff and GitHub confirmed its deletion.
    Deleted,
    /// The run was older than the cutoff but the sweep is a dry run.
    WouldDelete,
    /// The creation timestamp could not be parsed, so the run was skipped.
    Unparsable,
    /// The run was older than the cutoff but deleting it failed.
    DeleteFailed,
}

/// Counters of one repository sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepResult {
    /// Runs returned by the listing.
    pub examined: usize,
    /// Runs older than the cutoff.
    pub eligible: usize,
    /// Runs GitHub confirmed as deleted.
    pub deleted: usize,
    /// Runs skipped because of a malformed timestamp.
    pub unparsable: usize,
    /// Runs whose deletion failed.
    pub failed_deletions: usize,
    /// Runs beyond the first page, never examined.
    pub unlisted: usize,
}

impl SweepResult {
    /// Counts one examined run.
    pub const fn record(&mut self, outcome: RunOutcome) {
        self.examined += 1;
        match outcome {
            RunOutcome::Kept => {}
            RunOutcome::Deleted => {
                self.eligible += 1;
                self.deleted += 1;
            }
            RunOutcome::WouldDelete => self.eligible += 1,
            RunOutcome::Unparsable => self.unparsable += 1,
            RunOutcome::DeleteFailed => {
                self.eligible += 1;
                self.failed_deletions += 1;
            }
        }
    }

    /// Whether every examined run was handled without error.
    pub const fn is_clean(&self) -> bool {
        self.unparsable == 0 && self.failed_deletions == 0
    }

    fn merge(&mut self, other: &Self) {
        self.examined += other.examined;
        self.eligible += other.eligible;
        self.deleted += other.deleted;
        self.unparsable += other.unparsable;
        self.failed_deletions += other.failed_deletions;
        self.unlisted += other.unlisted;
    }
}

impl Display for SweepResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "examined {}, deleted {} of {} eligible",
            self.examined, self.deleted, self.eligible
        )?;
        if self.unparsable > 0 {
            write!(f, ", {} unparsable", self.unparsable)?;
        }
        if self.failed_deletions > 0 {
            write!(f, ", {} failed", self.failed_deletions)?;
        }
        if self.unlisted > 0 {
            write!(f, ", {} beyond the first page", self.unlisted)?;
        }
        Ok(())
    }
}

/// The outcome of sweeping one repository.
#[derive(Debug)]
pub struct RepositoryReport {
    /// The repository name, without the owner.
    pub repository: String,
    /// The counters, or the error that prevented listing the runs.
    pub outcome: Result<SweepResult, SweepError>,
}

impl RepositoryReport {
    /// Whether the repository was listed and all of its runs handled without error.
    pub fn is_clean(&self) -> bool {
        self.outcome.as_ref().is_ok_and(SweepResult::is_clean)
    }
}

/// The outcome of one invocation, one entry per configured repository in order.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// The per-repository reports.
    pub repositories: Vec<RepositoryReport>,
}

impl SweepReport {
    /// Sums the counters of every repository that could be listed.
    pub fn totals(&self) -> SweepResult {
        self.repositories
            .iter()
            .filter_map(|report| report.outcome.as_ref().ok())
            .fold(SweepResult::default(), |mut totals, result| {
                totals.merge(result);
                totals
            })
    }

    /// How many repositories could not be listed.
    pub fn failed_repositories(&self) -> usize {
        self.repositories
            .iter()
            .filter(|report| report.outcome.is_err())
            .count()
    }

    /// Whether nothing failed anywhere.
    pub fn is_clean(&self) -> bool {
        self.repositories.iter().all(RepositoryReport::is_clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_of(outcomes: &[RunOutcome]) -> SweepResult {
        let mut result = SweepResult::default();
        for outcome in outcomes {
            result.record(*outcome);
        }
        result
    }

    #[test]
    fn record_counts_every_outcome() {
        let result = result_of(&[
            RunOutcome::Kept,
            RunOutcome::Deleted,
            RunOutcome::Deleted,
            RunOutcome::Unparsable,
            RunOutcome::DeleteFailed,
        ]);

        assert_eq!(
            result,
            SweepResult {
                examined: 5,
                eligible: 3,
                deleted: 2,
                unparsable: 1,
                failed_deletions: 1,
                unlisted: 0,
            }
        );
        assert!(!result.is_clean());
    }

    #[test]
    fn dry_run_outcome_is_eligible_but_not_deleted() {
        let result = result_of(&[RunOutcome::WouldDelete, RunOutcome::Kept]);

        assert_eq!(result.eligible, 1);
        assert_eq!(result.deleted, 0);
        assert!(result.is_clean());
    }

    #[test]
    fn display_mentions_failures_only_when_present() {
        assert_eq!(
            result_of(&[RunOutcome::Deleted, RunOutcome::Kept]).to_string(),
            "examined 2, deleted 1 of 1 eligible"
        );
        assert_eq!(
            result_of(&[RunOutcome::Unparsable, RunOutcome::DeleteFailed]).to_string(),
            "examined 2, deleted 0 of 1 eligible, 1 unparsable, 1 failed"
        );
    }

    #[test]
    fn display_mentions_unlisted_runs() {
        let mut result = result_of(&[RunOutcome::Kept]);
        result.unlisted = 150;

        assert_eq!(
            result.to_string(),
            "examined 1, deleted 0 of 0 eligible, 150 beyond the first page"
        );
        assert!(result.is_clean());
    }

    #[test]
    fn report_totals_skip_failed_repositories() {
        let report = SweepReport {
            repositories: vec![
                RepositoryReport {
                    repository: "api".to_owned(),
                    outcome: Ok(result_of(&[RunOutcome::Deleted])),
                },
                RepositoryReport {
                    repository: "web".to_owned(),
                    outcome: Err(SweepError::Fetch {
                        repository: "octo-org/web".to_owned(),
                        reason: "404 Not Found".to_owned(),
                    }),
                },
                RepositoryReport {
                    repository: "worker".to_owned(),
                    outcome: Ok(result_of(&[RunOutcome::Deleted, RunOutcome::Kept])),
                },
            ],
        };

        let totals = report.totals();

        assert_eq!(totals.examined, 3);
        assert_eq!(totals.deleted, 2);
        assert_eq!(report.failed_repositories(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn empty_report_is_clean() {
        let report = SweepReport::default();

        assert!(report.is_clean());
        assert_eq!(report.totals(), SweepResult::default());
    }
}
