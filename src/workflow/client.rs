//! A minimal GitHub REST API client for listing and deleting workflow runs.

use std::{error::Error as _, time::Duration};

use reqwest::{
    StatusCode,
    header::{self, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret as _, SecretString};
use tracing::{debug, warn};

use crate::{
    error::{Result, SweepError},
    workflow::WorkflowRuns,
};

/// The largest page GitHub serves. Only the first page of runs is ever listed.
pub const PER_PAGE: u8 = 100;

const USER_AGENT: &str = concat!("run-sweeper/", env!("CARGO_PKG_VERSION"));

/// Issues authenticated requests against GitHub REST API.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
}

impl GitHubClient {
    /// Builds a client for `api_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Config`] if the token cannot be sent as a header or the HTTP client
    /// cannot be initialized.
    pub fn new(api_url: &str, token: &SecretString, timeout: Duration) -> Result<Self> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())).map_err(|_| {
                SweepError::Config("the GitHub token contains invalid characters".to_owned())
            })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SweepError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Lists the first page of workflow runs of `owner/repo`.
    ///
    /// The page's `total_count` tells how many runs are left unlisted.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Fetch`] if the request fails, the status is not a success or the body
    /// cannot be decoded.
    pub async fn list_runs(&self, owner: &str, repo: &str) -> Result<WorkflowRuns> {
        let url = format!("{}/repos/{owner}/{repo}/actions/runs", self.api_url);
        let fetch_error = |reason: String| SweepError::Fetch {
            repository: format!("{owner}/{repo}"),
            reason,
        };
        debug!("fetching workflow runs from {url}…");

        let response = self
            .http
            .get(&url)
            .query(&[("per_page", PER_PAGE)])
            .send()
            .await
            .map_err(|err| fetch_error(describe_error(&err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(describe_status(status)));
        }

        let runs = response.json::<WorkflowRuns>().await.map_err(|err| {
            fetch_error(format!("invalid response body: {}", describe_error(&err)))
        })?;

        let listed = runs.workflow_runs.len();
        if runs.unlisted() > 0 {
            warn!(
                "{owner}/{repo} has {} workflow runs, only the first {listed} are examined",
                runs.total_count
            );
        }
        match listed {
            1 => debug!("fetched 1 workflow run from {url}"),
            count => debug!("fetched {count} workflow runs from {url}"),
        }

        Ok(runs)
    }

    /// Deletes the workflow run `run_id` of `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Delete`] unless GitHub answers `204 No Content`.
    pub async fn delete_run(&self, owner: &str, repo: &str, run_id: u64) -> Result<()> {
        let url = format!("{}/repos/{owner}/{repo}/actions/runs/{run_id}", self.api_url);
        debug!("deleting workflow run at {url}…");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|err| SweepError::Delete {
                run_id,
                reason: describe_error(&err),
            })?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(SweepError::Delete {
                run_id,
                reason: describe_status(status),
            }),
        }
    }
}

fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

fn describe_error(err: &reqwest::Error) -> String {
    match err.source() {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}
