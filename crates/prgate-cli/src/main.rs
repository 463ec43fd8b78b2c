//! prgate - pull request gatekeeper CLI
//!
//! Reads the triggering CI event, runs the validation engine against the
//! host API, writes machine-readable outputs, and exits 0 iff the pull
//! request satisfies every policy (or the run skipped neutrally).

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use prgate_core::{
    pull_request_from_event, GateConfig, GateEngine, GateOutputs, GitHubConfig, GitHubGateway,
    DEFAULT_CHANGELOG_DIR,
};

#[derive(Parser)]
#[command(name = "prgate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate changelog and version-bump policies on a pull request", long_about = None)]
struct Cli {
    /// Name of the triggering event (must be a pull request event)
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// Path to the JSON event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Token with permission to read the PR and write issue comments
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Base URL of the host API
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    api_url: String,

    /// Directory a changelog entry must be added under
    #[arg(long, env = "PRGATE_CHANGELOG_DIR", default_value = DEFAULT_CHANGELOG_DIR)]
    changelog_dir: String,

    /// Skip status comment reconciliation (outputs and exit code unchanged)
    #[arg(long)]
    no_comment: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG` when set; falls back to the supplied level otherwise.
/// Safe to call more than once, only the first call takes effect.
fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("Validation run aborted: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Execute one validation run. Returns whether the run passed.
async fn run(cli: Cli) -> Result<bool> {
    let payload = std::fs::read_to_string(&cli.event_path)
        .with_context(|| format!("Failed to read event payload {}", cli.event_path.display()))?;
    let pr = pull_request_from_event(&cli.event_name, &payload)?;

    let gateway = GitHubGateway::new(GitHubConfig::new(&cli.api_url, &cli.token))
        .context("Failed to construct host API client")?;

    let mut config = GateConfig::new(&cli.changelog_dir);
    if cli.no_comment {
        config = config.without_comment();
    }

    let engine = GateEngine::new(Arc::new(gateway));
    let outcome = engine.run(&config, &pr).await?;

    emit_outputs(&outcome.outputs())?;
    Ok(outcome.passed())
}

/// Write outputs to the `GITHUB_OUTPUT` file when the host provides one,
/// otherwise log them (local runs).
fn emit_outputs(outputs: &GateOutputs) -> Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => outputs
            .write_to(Path::new(&path))
            .context("Failed to write outputs file"),
        None => {
            for (key, value) in outputs.pairs() {
                info!("output: {key}={value}");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "prgate",
            "--event-name",
            "pull_request",
            "--event-path",
            "/tmp/event.json",
            "--token",
            "t",
            "--changelog-dir",
            ".changelog",
            "--no-comment",
        ]);
        assert!(cli.no_comment);
        assert!(!cli.verbose);
        assert_eq!(cli.changelog_dir, ".changelog");
    }
}
