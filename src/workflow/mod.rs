//! Data models of GitHub Actions workflows.

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SweepError};

pub mod client;

/// The only timestamp layout accepted for `created_at`.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A page of workflow runs from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowRuns {
    /// How many runs the repository has in total, possibly more than fit on the page.
    #[serde(default)]
    pub total_count: u64,
    /// The runs on this page.
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

impl WorkflowRuns {
    /// How many runs exist beyond this page and will not be examined.
    pub fn unlisted(&self) -> usize {
        usize::try_from(self.total_count)
            .unwrap_or(usize::MAX)
            .saturating_sub(self.workflow_runs.len())
    }
}

/// Represents a GitHub Actions workflow run from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowRun {
    /// Unique within the repository.
    pub id: u64,
    /// The workflow name, when GitHub reports one.
    #[serde(default)]
    pub name: Option<String>,
    /// The raw creation timestamp, see [`WorkflowRun::parse_created_at`].
    ///
    /// Kept as JSON so that a missing or mistyped timestamp only fails this run.
    #[serde(default)]
    pub created_at: Value,
}

impl WorkflowRun {
    /// Parses [`Self::created_at`] as a UTC instant.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Parse`] unless the timestamp is a string matching
    /// [`CREATED_AT_FORMAT`] exactly.
    pub fn parse_created_at(&self) -> Result<DateTime<Utc>> {
        let malformed = |source| SweepError::Parse {
            run_id: self.id,
            value: self.created_at.to_string(),
            source,
        };

        let Some(created_at) = self.created_at.as_str() else {
            return Err(malformed(None));
        };
        NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|source| malformed(Some(source)))
    }
}

impl Display for WorkflowRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        match self.created_at.as_str() {
            Some(created_at) => write!(f, " created at {created_at}"),
            None => write!(f, " created at {}", self.created_at),
        }
    }
}
