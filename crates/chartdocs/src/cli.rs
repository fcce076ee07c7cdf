//! Input surface and configuration normalization.
//!
//! Inputs follow the GitHub Actions convention: every flag also binds to the
//! `INPUT_<NAME>` environment variable the runner exports for action inputs.
//! All inputs arrive as strings; boolean-ish values are normalized exactly
//! once here so the rest of the program only sees real booleans.

use chartdocs_core::{Error, Result};
use clap::Parser;

/// helm-docs release installed when the `version` input is empty.
pub const DEFAULT_VERSION: &str = "v1.14.2";

/// Raw string-typed inputs, as supplied by the CI runner.
#[derive(Debug, Parser)]
#[command(
    name = "chartdocs",
    disable_version_flag = true,
    about = "Regenerates Helm chart documentation with helm-docs and fails, pushes, or reports when it drifts"
)]
pub struct Cli {
    /// Directory helm-docs searches for charts.
    #[arg(long, env = "INPUT_CHART-SEARCH-ROOT", default_value = "")]
    pub chart_search_root: String,

    /// Values file passed to helm-docs.
    #[arg(long, env = "INPUT_VALUES-FILE", default_value = "")]
    pub values_file: String,

    /// Documentation file helm-docs regenerates; also the change-detection
    /// filter.
    #[arg(long, env = "INPUT_OUTPUT-FILE", default_value = "")]
    pub output_file: String,

    /// Comma-separated template files passed to helm-docs.
    #[arg(long, env = "INPUT_TEMPLATE-FILES", default_value = "")]
    pub template_files: String,

    /// Sort order for values documentation.
    #[arg(long, env = "INPUT_SORT-VALUES-ORDER", default_value = "")]
    pub sort_values_order: String,

    /// Skip the helm-docs version footer (boolean).
    #[arg(long, env = "INPUT_SKIP-VERSION-FOOTER", default_value = "")]
    pub skip_version_footer: String,

    /// Commit and push the regenerated file (boolean).
    #[arg(long, env = "INPUT_GIT-PUSH", default_value = "")]
    pub git_push: String,

    /// Committer name for the push branch.
    #[arg(long, env = "INPUT_GIT-PUSH-USER-NAME", default_value = "")]
    pub git_push_user_name: String,

    /// Committer email for the push branch.
    #[arg(long, env = "INPUT_GIT-PUSH-USER-EMAIL", default_value = "")]
    pub git_push_user_email: String,

    /// Commit message for the push branch.
    #[arg(long, env = "INPUT_GIT-COMMIT-MESSAGE", default_value = "")]
    pub git_commit_message: String,

    /// Fail the build when the output file changed (boolean, takes priority
    /// over --git-push).
    #[arg(long, env = "INPUT_FAIL-ON-DIFF", default_value = "")]
    pub fail_on_diff: String,

    /// helm-docs release tag to install, e.g. v1.14.2.
    #[arg(long, env = "INPUT_VERSION", default_value = "")]
    pub version: String,
}

/// Normalized configuration with real booleans and a validated version.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory helm-docs searches for charts.
    pub chart_search_root: String,
    /// Values file passed to helm-docs.
    pub values_file: String,
    /// Documentation file name used for change detection.
    pub output_file: String,
    /// Raw comma-separated template files input.
    pub template_files: String,
    /// Sort order for values documentation, empty when unset.
    pub sort_values_order: String,
    /// Skip the helm-docs version footer.
    pub skip_version_footer: bool,
    /// Commit and push the regenerated file.
    pub git_push: bool,
    /// Committer name.
    pub git_push_user_name: String,
    /// Committer email.
    pub git_push_user_email: String,
    /// Commit message.
    pub git_commit_message: String,
    /// Fail the build when the output file changed.
    pub fail_on_diff: bool,
    /// helm-docs release tag, defaulted and validated.
    pub version: String,
}

impl Config {
    /// Normalize raw inputs into a configuration.
    ///
    /// The only validations are the boolean normalization, the default
    /// substitution for an empty `version`, and the requirement that the
    /// version is a `v`-prefixed release tag.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let version = if cli.version.is_empty() {
            DEFAULT_VERSION.to_string()
        } else {
            cli.version
        };
        if !version.starts_with('v') {
            return Err(Error::configuration(format!(
                "version '{version}' must be a release tag starting with 'v'"
            )));
        }

        Ok(Self {
            chart_search_root: cli.chart_search_root,
            values_file: cli.values_file,
            output_file: cli.output_file,
            template_files: cli.template_files,
            sort_values_order: cli.sort_values_order,
            skip_version_footer: parse_bool_input("skip-version-footer", &cli.skip_version_footer)?,
            git_push: parse_bool_input("git-push", &cli.git_push)?,
            git_push_user_name: cli.git_push_user_name,
            git_push_user_email: cli.git_push_user_email,
            git_commit_message: cli.git_commit_message,
            fail_on_diff: parse_bool_input("fail-on-diff", &cli.fail_on_diff)?,
            version,
        })
    }
}

/// Parse a GitHub Actions boolean input.
///
/// Accepts the runner's boolean spellings; an empty input means false.
fn parse_bool_input(name: &str, raw: &str) -> Result<bool> {
    match raw {
        "" | "false" | "False" | "FALSE" => Ok(false),
        "true" | "True" | "TRUE" => Ok(true),
        other => Err(Error::configuration(format!(
            "input '{name}' is not a boolean: '{other}'"
        ))),
    }
}
