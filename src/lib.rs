//! Deletes GitHub Actions workflow runs older than a retention threshold, keeping repositories
//! under their Actions storage quota.
//!
//! Build a [`SweepConfig`], hand it to a [`Sweeper`], and [`Sweeper::run`] it:
//!
//! ```rust,no_run
//! # async fn sweep() -> run_sweeper::error::Result<()> {
//! use run_sweeper::{SweepConfig, Sweeper};
//! use secrecy::SecretString;
//!
//! let config = SweepConfig::new(
//!     "octo-org".to_owned(),
//!     vec!["api".to_owned(), "web".to_owned()],
//!     SecretString::from("ghp_token"),
//! )?
//! .with_retention_days(7);
//! let report = Sweeper::new(config)?.run().await;
//! println!("deleted {} runs", report.totals().deleted);
//! # Ok(())
//! # }
//! ```
//!
//! With the `env` feature, `SweepConfig::from_env` builds the configuration from the process
//! environment instead.
//!
//! Only the first page of runs (100) of each repository is examined per invocation.

pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod sweep;
pub mod workflow;

pub use config::SweepConfig;
pub use error::SweepError;
pub use sweep::{RepositoryReport, RunOutcome, SweepReport, SweepResult, Sweeper};
