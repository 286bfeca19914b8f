//! Errors raised while configuring or running a sweep.

/// A specialized [`Result`](std::result::Result) for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Errors that can occur while sweeping workflow runs.
///
/// Only [`SweepError::Config`] is fatal. The others are recorded per repository or per run
/// and the sweep carries on with the next unit of work.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// The configuration is incomplete or malformed, e.g. the token is unset.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Listing the workflow runs of a repository failed.
    #[error("failed to list workflow runs of {repository}: {reason}")]
    Fetch {
        /// The `owner/name` of the repository.
        repository: String,
        /// What went wrong, including the HTTP status when there was one.
        reason: String,
    },

    /// A run carries a creation timestamp that is missing, not a string, or not
    /// `YYYY-MM-DDTHH:MM:SSZ`.
    #[error("run {run_id} has a malformed creation timestamp {value}")]
    Parse {
        /// The identifier of the run.
        run_id: u64,
        /// The timestamp as JSON text, e.g. `"2024-06-08"` or `null`.
        value: String,
        /// The underlying parse failure, if the timestamp was a string at all.
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// Deleting a run did not answer with `204 No Content`.
    #[error("failed to delete run {run_id}: {reason}")]
    Delete {
        /// The identifier of the run.
        run_id: u64,
        /// What went wrong, including the HTTP status when there was one.
        reason: String,
    },
}
