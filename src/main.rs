//! Deletes old workflow runs from the repositories named in the environment.
//!
//! Usage:
//!   GITHUB_TOKEN=… SWEEP_OWNER=octo-org SWEEP_REPOSITORIES=api,web run-sweeper
//!
//! See [`run_sweeper::env`] for every variable read.

use std::process::ExitCode;

use anyhow::Context as _;
use run_sweeper::{SweepConfig, Sweeper, logging};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    let config = SweepConfig::from_env().context("failed to load sweep configuration")?;
    let fail_on_errors = config.fail_on_errors();
    let sweeper = Sweeper::new(config)?;

    let report = sweeper.run().await;
    let totals = report.totals();

    println!();
    println!("🧹 Sweep completed");
    println!("   Repositories: {}", report.repositories.len());
    if report.failed_repositories() > 0 {
        println!("   Not listed: {}", report.failed_repositories());
    }
    println!("   Runs: {totals}");
    for repo in report.repositories.iter().filter(|repo| !repo.is_clean()) {
        match &repo.outcome {
            Ok(result) => println!("   - {}: {result}", repo.repository),
            Err(err) => println!("   - {}: {err}", repo.repository),
        }
    }

    if fail_on_errors && !report.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
