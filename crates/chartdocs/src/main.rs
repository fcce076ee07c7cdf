//! chartdocs binary.
//!
//! Reads its inputs from flags or `INPUT_*` environment variables, installs
//! the requested helm-docs release, regenerates the chart documentation,
//! and fails, pushes, or reports depending on the configured policy.

// The workflow-command surface writes directly to stdout by design.
#![allow(clippy::print_stdout)]

use chartdocs::actions;
use chartdocs::cli::{Cli, Config};
use chartdocs::orchestrator::{self, Outcome};
use chartdocs_install::{HttpReleaseFetcher, Installer, ToolCache};
use chartdocs_vcs::GitClient;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(err) => {
            actions::error(&err.to_string());
            std::process::exit(1);
        }
    };

    let repo_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            actions::error(&err.to_string());
            std::process::exit(1);
        }
    };

    let installer = Installer::new(
        HttpReleaseFetcher::new(),
        ToolCache::new(ToolCache::default_root()),
    );
    let git = GitClient::new(&repo_root);

    let outcome = orchestrator::run(config, &installer, &git, &repo_root).await;
    if matches!(outcome, Outcome::Failed { .. }) {
        std::process::exit(1);
    }
}
