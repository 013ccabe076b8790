//! shipflow CLI - feature-to-production release flow
//!
//! Creates a feature branch, gates it on tests and a build, publishes it,
//! merges it through the integration branch into `main` and deploys.

use anyhow::{Context, Result};
use clap::Parser;
use shipflow_core::{
    CONFIG_FILE_NAME, DEFAULT_BASE_BRANCH, DeployStatus, Orchestrator, Outcome, RunConfig,
    ShipConfig, Summary,
};
use std::path::PathBuf;
use tracing::{error, info};

const EXAMPLES: &str = "\
Examples:
  shipflow user-auth
  shipflow payment-gateway --base develop
  shipflow hotfix-login --skip-tests
  shipflow new-dashboard --verbose";

/// shipflow - automated feature-to-production flow
///
/// Runs feature -> develop -> main -> deploy with confirmation gates before
/// each merge.
#[derive(Parser)]
#[command(version, about, long_about = None, after_help = EXAMPLES)]
struct Cli {
    /// Feature name (letters, digits, '-' and '_'), e.g. "user-auth"
    feature_name: String,

    /// Base branch the feature starts from and merges into
    #[arg(long, default_value = DEFAULT_BASE_BRANCH)]
    base: String,

    /// Echo every command and its output
    #[arg(short, long)]
    verbose: bool,

    /// Skip the test and build gate
    #[arg(long)]
    skip_tests: bool,

    /// Settings file (defaults to ./shipflow.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = install_interrupt_handler() {
        tracing::warn!("could not install Ctrl+C handler: {}", e);
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Flow failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for structured logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("shipflow=debug,shipflow_core=debug")
        } else {
            EnvFilter::new("shipflow=info,shipflow_core=info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Ctrl+C ends the run as a user cancellation, not a failure.
fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nFlow cancelled by user.");
        std::process::exit(0);
    })
    .context("failed to set signal handler")
}

/// Validates input, loads settings, runs the pipeline and reports the result.
///
/// Returns the process exit code.
fn run(cli: Cli) -> Result<i32> {
    // Nothing external runs before the name is validated.
    let run = RunConfig::new(&cli.feature_name, &cli.base, cli.verbose, cli.skip_tests)?;

    let workdir = std::env::current_dir().context("failed to determine working directory")?;
    let settings = match &cli.config {
        Some(path) => ShipConfig::load_required(path)?,
        None => ShipConfig::load(&workdir.join(CONFIG_FILE_NAME))?,
    };

    info!("Feature: {}", run.feature_name());
    info!("Base branch: {}", run.base_branch());

    let orchestrator = Orchestrator::new(run, settings, workdir);
    let outcome = orchestrator.execute();
    report(&outcome, &orchestrator.settings);

    Ok(outcome.exit_code())
}

fn report(outcome: &Outcome, settings: &ShipConfig) {
    match outcome {
        Outcome::Completed(summary) => print_summary(summary, settings),
        Outcome::Cancelled { step } => {
            println!("\nFlow cancelled at '{}'. Nothing further was changed.", step);
        }
        Outcome::Failed { step, error } => {
            eprintln!("\n✘ Step '{}' failed: {}", step, error);
            eprintln!("\nSuggestions:");
            eprintln!("  - Check your git configuration (user.name, user.email, remote)");
            eprintln!("  - Make sure you have push permissions on the remote");
            eprintln!("  - Run 'npm install' to verify npm dependencies");
            eprintln!("  - If there are conflicts, resolve them and run 'git merge --continue'");
        }
    }
}

fn print_summary(summary: &Summary, settings: &ShipConfig) {
    println!("\nFlow completed!");
    for line in summary_lines(summary, settings) {
        println!("{}", line);
    }

    if summary.fallback_used {
        println!("\nNext steps:");
        println!("  Check your hosting dashboard; a CI/CD deployment should start from the push.");
        println!("  Install the deployment tool to deploy directly next time.");
    }

    if let Some(elapsed) = summary.elapsed() {
        println!("\nFinished in {}s", elapsed.num_seconds());
    }
}

/// One line per fact in the summary: "✔" for done, "!" for skipped or degraded.
fn summary_lines(summary: &Summary, settings: &ShipConfig) -> Vec<String> {
    let mut lines = vec![format!("✔ Branch created: {}", summary.feature_branch)];
    if summary.tests_run {
        lines.push("✔ Tests and build passed".to_string());
    }
    if summary.committed {
        lines.push("✔ Changes committed and pushed".to_string());
    } else {
        lines.push("! No changes to commit".to_string());
    }
    lines.push(format!("✔ Merged into {}", summary.base_branch));
    lines.push(format!("✔ Merged into {}", summary.release_branch));

    match &summary.deployment {
        Some(DeployStatus::Deployed) => lines.push(format!("✔ Deployed with {}", settings.deploy.tool)),
        Some(DeployStatus::ToolMissing) => lines.push(format!("! {} not installed", settings.deploy.tool)),
        Some(DeployStatus::Failed(reason)) => lines.push(format!("! Deployment failed: {}", reason)),
        None => {}
    }

    if summary.fallback_used {
        lines.push(format!(
            "✔ Fallback: rebuilt and pushed {} to {}",
            summary.release_branch, settings.git.remote
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Summary {
        let run = RunConfig::new("user-auth", "develop", false, false).unwrap();
        Summary::new(&run)
    }

    #[test]
    fn test_no_op_commit_is_not_marked_done() {
        let mut summary = summary();
        summary.deployment = Some(DeployStatus::Deployed);

        let lines = summary_lines(&summary, &ShipConfig::default());
        assert!(lines.contains(&"! No changes to commit".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("✔ No changes")));
        assert!(lines.contains(&"✔ Deployed with vercel".to_string()));
    }

    #[test]
    fn test_fallback_lines() {
        let mut summary = summary();
        summary.tests_run = true;
        summary.committed = true;
        summary.deployment = Some(DeployStatus::ToolMissing);
        summary.fallback_used = true;

        let lines = summary_lines(&summary, &ShipConfig::default());
        assert_eq!(
            lines,
            vec![
                "✔ Branch created: feature/user-auth",
                "✔ Tests and build passed",
                "✔ Changes committed and pushed",
                "✔ Merged into develop",
                "✔ Merged into main",
                "! vercel not installed",
                "✔ Fallback: rebuilt and pushed main to origin",
            ]
        );
    }
}
