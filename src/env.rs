//! Defines the environment variables to use.

#![cfg(feature = "env")]

use std::time::Duration;

use secrecy::SecretString;

use crate::{
    config::{DEFAULT_RETENTION_DAYS, DEFAULT_TIMEOUT, SweepConfig},
    error::{Result, SweepError},
};

/// The bearer token. Required.
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// The organization or user owning the repositories.
pub const SWEEP_OWNER: &str = "SWEEP_OWNER";
/// Fallback for [`SWEEP_OWNER`], set by GitHub Actions.
pub const GITHUB_REPOSITORY_OWNER: &str = "GITHUB_REPOSITORY_OWNER";
/// Comma-separated repository names. Required.
pub const SWEEP_REPOSITORIES: &str = "SWEEP_REPOSITORIES";
/// Whole days to keep runs for.
pub const SWEEP_RETENTION_DAYS: &str = "SWEEP_RETENTION_DAYS";
/// Seconds before an HTTP request times out.
pub const SWEEP_TIMEOUT_SECS: &str = "SWEEP_TIMEOUT_SECS";
/// Reports eligible runs without deleting them.
pub const SWEEP_DRY_RUN: &str = "SWEEP_DRY_RUN";
/// Exits with a failure code when anything failed.
pub const SWEEP_FAIL_ON_ERRORS: &str = "SWEEP_FAIL_ON_ERRORS";
/// The API base URL, set by GitHub Actions.
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";

/// Parses an optional variable from a lookup function, wrapping any error in [`SweepError::Config`].
macro_rules! parse_env {
    ($lookup:expr, $key:expr => |$var:ident| $expr:expr) => {
        $lookup($key)
            .map(|$var| {
                $expr.map_err(|e| SweepError::Config(format!("invalid value for {}: {e}", $key)))
            })
            .transpose()
    };
}

impl SweepConfig {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Config`] if the token, the owner or the repository list is missing,
    /// or if any variable holds a value that cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = lookup(GITHUB_TOKEN)
            .ok_or_else(|| SweepError::Config(format!("{GITHUB_TOKEN} is not set")))?;
        let owner = lookup(SWEEP_OWNER)
            .or_else(|| lookup(GITHUB_REPOSITORY_OWNER))
            .ok_or_else(|| {
                SweepError::Config(format!(
                    "neither {SWEEP_OWNER} nor {GITHUB_REPOSITORY_OWNER} is set"
                ))
            })?;
        let repositories = lookup(SWEEP_REPOSITORIES)
            .map(|value| split_list(&value))
            .ok_or_else(|| SweepError::Config(format!("{SWEEP_REPOSITORIES} is not set")))?;

        let retention_days = parse_env!(lookup, SWEEP_RETENTION_DAYS => |s| s.trim().parse::<u32>())?
            .unwrap_or(DEFAULT_RETENTION_DAYS);
        let timeout = parse_env!(lookup, SWEEP_TIMEOUT_SECS => |s| s.trim().parse::<u64>())?
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        let dry_run = parse_env!(lookup, SWEEP_DRY_RUN => |s| parse_flag(&s))?.unwrap_or(false);
        let fail_on_errors =
            parse_env!(lookup, SWEEP_FAIL_ON_ERRORS => |s| parse_flag(&s))?.unwrap_or(false);

        let config = Self::new(
            owner.trim().to_owned(),
            repositories,
            SecretString::from(token.trim()),
        )?
        .with_retention_days(retention_days)
        .with_timeout(timeout)
        .with_dry_run(dry_run)
        .with_fail_on_errors(fail_on_errors);

        match lookup(GITHUB_API_URL) {
            Some(api_url) => config.with_api_url(api_url.trim()),
            None => Ok(config),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeDelta;
    use secrecy::ExposeSecret as _;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        (GITHUB_TOKEN, "ghp_secret"),
        (SWEEP_OWNER, "octo-org"),
        (SWEEP_REPOSITORIES, "api, web ,,worker"),
    ];

    #[test]
    fn reads_required_variables() {
        let config = SweepConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.owner(), "octo-org");
        assert_eq!(config.repositories(), ["api", "web", "worker"]);
        assert_eq!(config.token().expose_secret(), "ghp_secret");
        assert_eq!(config.retention(), TimeDelta::days(1));
        assert!(!config.dry_run());
    }

    #[test]
    fn reads_optional_variables() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            (SWEEP_RETENTION_DAYS, "7"),
            (SWEEP_TIMEOUT_SECS, "5"),
            (SWEEP_DRY_RUN, "Yes"),
            (SWEEP_FAIL_ON_ERRORS, "1"),
            (GITHUB_API_URL, "https://ghe.example.com/api/v3/"),
        ]);

        let config = SweepConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.retention(), TimeDelta::days(7));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.dry_run());
        assert!(config.fail_on_errors());
        assert_eq!(config.api_url(), "https://ghe.example.com/api/v3");
    }

    #[test]
    fn missing_token_fails() {
        let result = SweepConfig::from_lookup(lookup(&REQUIRED[1..]));

        assert!(matches!(result, Err(SweepError::Config(msg)) if msg.contains(GITHUB_TOKEN)));
    }

    #[test]
    fn token_loses_surrounding_whitespace() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = (GITHUB_TOKEN, "ghp_secret\n");

        let config = SweepConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.token().expose_secret(), "ghp_secret");
    }

    #[test]
    fn blank_token_fails() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = (GITHUB_TOKEN, "   ");

        assert!(matches!(
            SweepConfig::from_lookup(lookup(&vars)),
            Err(SweepError::Config(_))
        ));
    }

    #[test]
    fn owner_falls_back_to_actions_variable() {
        let vars = [
            (GITHUB_TOKEN, "ghp_secret"),
            (GITHUB_REPOSITORY_OWNER, "actions-owner"),
            (SWEEP_REPOSITORIES, "api"),
        ];

        let config = SweepConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.owner(), "actions-owner");
    }

    #[test]
    fn empty_repository_list_fails() {
        let mut vars = REQUIRED.to_vec();
        vars[2] = (SWEEP_REPOSITORIES, ", ,");

        assert!(matches!(
            SweepConfig::from_lookup(lookup(&vars)),
            Err(SweepError::Config(_))
        ));
    }

    #[test]
    fn malformed_numbers_and_flags_fail() {
        for bad in [
            (SWEEP_RETENTION_DAYS, "a week"),
            (SWEEP_RETENTION_DAYS, "-1"),
            (SWEEP_TIMEOUT_SECS, "30s"),
            (SWEEP_DRY_RUN, "maybe"),
        ] {
            let mut vars = REQUIRED.to_vec();
            vars.push(bad);

            let result = SweepConfig::from_lookup(lookup(&vars));

            assert!(
                matches!(&result, Err(SweepError::Config(msg)) if msg.contains(bad.0)),
                "{bad:?} was accepted"
            );
        }
    }

    #[test]
    fn blank_optional_values_use_defaults() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([(SWEEP_RETENTION_DAYS, ""), (SWEEP_DRY_RUN, " ")]);

        let config = SweepConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.retention(), TimeDelta::days(1));
        assert!(!config.dry_run());
    }
}
