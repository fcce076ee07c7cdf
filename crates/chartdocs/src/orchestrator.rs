//! Install helm-docs, regenerate the documentation, and reconcile the
//! working tree.
//!
//! [`run`] never propagates an error past its own boundary: every failure is
//! converted into an error annotation plus a [`Outcome::Failed`] value, and
//! the binary maps that to a non-zero exit.

use crate::actions;
use crate::cli::Config;
use chartdocs_core::{Error, Result};
use chartdocs_install::{Installer, ReleaseFetcher, TOOL_NAME, file_sha256};
use chartdocs_vcs::{GitClient, filter_by_suffix};
use std::ffi::OsString;
use std::path::Path;
use tracing::{info, warn};

/// Terminal disposition of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The output file did not change.
    UpToDate,
    /// The output file changed and was committed and pushed.
    Pushed {
        /// Id of the pushed commit.
        commit: String,
    },
    /// The output file changed but no action was requested.
    Reported,
    /// The build must fail.
    Failed {
        /// Human-readable failure message.
        message: String,
    },
}

/// Action selected for a non-empty change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffAction {
    Fail,
    Push,
    Report,
}

/// Select the action for detected changes. fail-on-diff takes priority over
/// git-push.
fn decide(fail_on_diff: bool, git_push: bool) -> DiffAction {
    if fail_on_diff {
        DiffAction::Fail
    } else if git_push {
        DiffAction::Push
    } else {
        DiffAction::Report
    }
}

/// Argument vector for the helm-docs invocation.
///
/// The template-files input is comma-split with each entry trimmed; an empty
/// input yields a single empty entry, matching the upstream action.
#[must_use]
pub fn helm_docs_args(config: &Config) -> Vec<String> {
    let mut args = vec![
        "--values-file".to_string(),
        config.values_file.clone(),
        "--output-file".to_string(),
        config.output_file.clone(),
        "--chart-search-root".to_string(),
        config.chart_search_root.clone(),
    ];

    if !config.sort_values_order.is_empty() {
        args.push("--sort-values-order".to_string());
        args.push(config.sort_values_order.clone());
    }

    if config.skip_version_footer {
        args.push("--skip-version-footer".to_string());
    }

    for template_file in config.template_files.split(',') {
        args.push("--template-files".to_string());
        args.push(template_file.trim().to_string());
    }

    args
}

/// Run the full step. Never returns an error; failures become
/// [`Outcome::Failed`] after emitting an error annotation.
pub async fn run<F: ReleaseFetcher>(
    config: Config,
    installer: &Installer<F>,
    git: &GitClient,
    repo_root: &Path,
) -> Outcome {
    match execute(&config, installer, git, repo_root).await {
        Ok(outcome) => outcome,
        Err(err) => {
            let message = err.to_string();
            actions::error(&message);
            Outcome::Failed { message }
        }
    }
}

async fn execute<F: ReleaseFetcher>(
    config: &Config,
    installer: &Installer<F>,
    git: &GitClient,
    repo_root: &Path,
) -> Result<Outcome> {
    actions::start_group(&format!("Downloading helm-docs {}", config.version));
    let binary = installer.install(&config.version).await?;
    actions::end_group();

    let digest = file_sha256(&binary).await?;
    info!(
        binary = %binary.display(),
        %digest,
        "helm-docs binary '{}' has been cached",
        config.version
    );
    if let Err(err) = actions::set_output("helm-docs", &binary.to_string_lossy()) {
        warn!(%err, "failed to record step output");
    }

    run_helm_docs(&binary, &helm_docs_args(config), repo_root).await?;

    let changed = filter_by_suffix(git.status()?, &config.output_file);

    if changed.is_empty() {
        info!("'{}' is up to date.", config.output_file);
        return Ok(Outcome::UpToDate);
    }

    match decide(config.fail_on_diff, config.git_push) {
        DiffAction::Fail => {
            let mut message = String::new();
            for entry in &changed {
                // The diff preview is best effort; failure to produce it
                // must not mask the drift failure itself.
                match git.diff(&entry.path) {
                    Ok(diff) => info!("Diff for '{}':\n{diff}", entry.path),
                    Err(_) => info!("Unable to get diff for '{}'", entry.path),
                }
                message = format!("'{}' has changed", entry.path);
                actions::error(&message);
            }
            Ok(Outcome::Failed { message })
        }
        DiffAction::Push => {
            git.add_config("user.name", &config.git_push_user_name)?;
            git.add_config("user.email", &config.git_push_user_email)?;
            for entry in &changed {
                git.add(&entry.path)?;
            }
            let commit = git.commit(&config.git_commit_message)?;
            git.push()?;
            info!("Pushed '{}' to the branch.", config.output_file);
            Ok(Outcome::Pushed { commit })
        }
        DiffAction::Report => {
            info!(
                "'{}' has changed, but no action was requested.",
                config.output_file
            );
            Ok(Outcome::Reported)
        }
    }
}

/// Execute the helm-docs binary with the derived arguments.
///
/// The binary is invoked by absolute path; its directory is prepended to the
/// child's `PATH` only, never to this process's environment.
async fn run_helm_docs(binary: &Path, args: &[String], repo_root: &Path) -> Result<()> {
    let mut cmd = tokio::process::Command::new(binary);
    cmd.args(args).current_dir(repo_root);
    if let Some(dir) = binary.parent() {
        cmd.env("PATH", child_search_path(dir));
    }

    info!(?args, "running helm-docs");
    let status = cmd
        .status()
        .await
        .map_err(|e| Error::subprocess(TOOL_NAME, format!("could not be spawned: {e}")))?;

    if !status.success() {
        return Err(Error::subprocess(TOOL_NAME, format!("exited with {status}")));
    }
    Ok(())
}

/// Search path for the child process, with `dir` as its first entry unless
/// it already is.
fn child_search_path(dir: &Path) -> OsString {
    match std::env::var_os("PATH") {
        Some(existing) => {
            let mut entries: Vec<_> = std::env::split_paths(&existing).collect();
            if entries.first().map(Path::new) != Some(dir) {
                entries.insert(0, dir.to_path_buf());
            }
            std::env::join_paths(entries).unwrap_or_else(|_| dir.as_os_str().to_os_string())
        }
        None => dir.as_os_str().to_os_string(),
    }
}
