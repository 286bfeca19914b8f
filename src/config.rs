//! The immutable configuration of a sweep.

use std::time::Duration;

use chrono::TimeDelta;
use reqwest::Url;
use secrecy::{ExposeSecret as _, SecretString};

use crate::error::{Result, SweepError};

/// The public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Runs younger than this many days are kept.
pub const DEFAULT_RETENTION_DAYS: u32 = 1;

/// Applied to every HTTP request so a stalled connection cannot hang the sweep.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a [`Sweeper`](crate::sweep::Sweeper) needs to know, built once at start-up.
///
/// The constructor checks the invariants shared by every source of configuration: a non-empty
/// owner, at least one repository and a non-empty token. Optional settings are applied with the
/// `with_*` methods.
#[derive(Debug)]
pub struct SweepConfig {
    owner: String,
    repositories: Vec<String>,
    retention: TimeDelta,
    token: SecretString,
    api_url: String,
    timeout: Duration,
    dry_run: bool,
    fail_on_errors: bool,
}

impl SweepConfig {
    /// Creates a configuration with the default retention, timeout and API URL.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Config`] if the token is blank, the repository list is empty, or the
    /// owner or a repository is not a plain GitHub name (ASCII letters, digits, `-`, `_`, `.`).
    pub fn new(owner: String, repositories: Vec<String>, token: SecretString) -> Result<Self> {
        if token.expose_secret().trim().is_empty() {
            return Err(SweepError::Config("the GitHub token is empty".to_owned()));
        }
        if !is_plain_name(&owner) {
            return Err(SweepError::Config(format!(
                "invalid repository owner {owner:?}"
            )));
        }
        if repositories.is_empty() {
            return Err(SweepError::Config("no repositories to sweep".to_owned()));
        }
        if let Some(repo) = repositories.iter().find(|repo| !is_plain_name(repo)) {
            return Err(SweepError::Config(format!(
                "invalid repository name {repo:?}"
            )));
        }

        Ok(Self {
            owner,
            repositories,
            retention: TimeDelta::days(i64::from(DEFAULT_RETENTION_DAYS)),
            token,
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            dry_run: false,
            fail_on_errors: false,
        })
    }

    /// Keeps runs younger than `days` whole days.
    #[must_use]
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention = TimeDelta::days(i64::from(days));
        self
    }

    /// Points the sweep at another API, e.g. a GitHub Enterprise Server.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Config`] if `api_url` is not an absolute URL.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        Url::parse(api_url)
            .map_err(|e| SweepError::Config(format!("invalid API URL {api_url:?}: {e}")))?;
        self.api_url = api_url.trim_end_matches('/').to_owned();
        Ok(self)
    }

    /// Sets the timeout of each HTTP request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reports eligible runs without deleting them.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Makes the binary exit with a failure code when any repository or run failed.
    #[must_use]
    pub const fn with_fail_on_errors(mut self, fail_on_errors: bool) -> Self {
        self.fail_on_errors = fail_on_errors;
        self
    }

    /// The organization or user owning the repositories.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The repositories to sweep, in order.
    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// How long runs are kept.
    pub const fn retention(&self) -> TimeDelta {
        self.retention
    }

    /// The bearer token.
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// The API base URL, without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// The timeout of each HTTP request.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether deletions are skipped.
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether failures should turn into a failing exit code.
    pub const fn fail_on_errors(&self) -> bool {
        self.fail_on_errors
    }
}

/// Names end up in URL paths, so anything that could change the request target is refused.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
