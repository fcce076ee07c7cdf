//! Thin client over the `git` CLI for the current working tree.
//!
//! Exposes exactly the plumbing the orchestrator needs: `status`, `diff`,
//! `config`, `add`, `commit`, `push`. Every operation shells out to `git`
//! in the repository root and converts a non-zero exit into a
//! [`chartdocs_core::Error::Git`] carrying the subcommand and stderr.

use chartdocs_core::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Kind of change reported for a working-tree path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Newly added to the index.
    Added,
    /// Content modified.
    Modified,
    /// Deleted.
    Deleted,
    /// Renamed.
    Renamed,
    /// Copied.
    Copied,
    /// Not tracked by git.
    Untracked,
    /// Unmerged (conflict).
    Unmerged,
    /// Anything else git may report.
    Other,
}

impl ChangeKind {
    /// Map a two-character porcelain status code to a change kind.
    ///
    /// The index column wins when it carries a state; otherwise the
    /// worktree column is used.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code == "??" {
            return Self::Untracked;
        }
        let mut chars = code.chars();
        let index = chars.next().unwrap_or(' ');
        let worktree = chars.next().unwrap_or(' ');
        let significant = if index == ' ' { worktree } else { index };
        match significant {
            'A' => Self::Added,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            'R' => Self::Renamed,
            'C' => Self::Copied,
            'U' => Self::Unmerged,
            _ => Self::Other,
        }
    }
}

/// One entry of the working-tree status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// Path relative to the repository root.
    pub path: String,
    /// Kind of change.
    pub kind: ChangeKind,
}

/// Filter status entries to those whose path matches or ends with `suffix`.
///
/// Suffix matching (rather than exact matching) lets a configured output
/// file name like `README.md` match the same file regenerated under any
/// chart subdirectory.
#[must_use]
pub fn filter_by_suffix(entries: Vec<StatusEntry>, suffix: &str) -> Vec<StatusEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.path.ends_with(suffix))
        .collect()
}

/// git client bound to a repository root.
pub struct GitClient {
    root: PathBuf,
}

impl GitClient {
    /// Create a client for the repository at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "running git");
        let subcommand = args.first().copied().unwrap_or_default();
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::git(subcommand, e.to_string()))?;

        if !output.status.success() {
            return Err(Error::git(
                subcommand,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Working-tree status as `(path, kind)` entries.
    pub fn status(&self) -> Result<Vec<StatusEntry>> {
        let out = self.run(&["status", "--porcelain"])?;
        Ok(parse_porcelain(&out))
    }

    /// Textual diff of a single path against the index.
    pub fn diff(&self, path: &str) -> Result<String> {
        self.run(&["diff", "--", path])
    }

    /// Write a repository-local configuration value.
    pub fn add_config(&self, key: &str, value: &str) -> Result<()> {
        self.run(&["config", key, value]).map(drop)
    }

    /// Stage a path.
    pub fn add(&self, path: &str) -> Result<()> {
        self.run(&["add", path]).map(drop)
    }

    /// Commit staged changes, returning the new commit id.
    pub fn commit(&self, message: &str) -> Result<String> {
        self.run(&["commit", "-m", message])?;
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    /// Push the current branch to its upstream.
    pub fn push(&self) -> Result<()> {
        self.run(&["push"]).map(drop)
    }
}

/// Parse `git status --porcelain` output.
fn parse_porcelain(out: &str) -> Vec<StatusEntry> {
    out.lines()
        .filter_map(|line| {
            if line.len() < 4 {
                return None;
            }
            let (code, rest) = line.split_at(2);
            // Rename lines read `R  old -> new`; the new path is the one
            // that exists in the working tree.
            let path = rest[1..].rsplit(" -> ").next()?.to_string();
            Some(StatusEntry {
                path,
                kind: ChangeKind::from_code(code),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modified_and_untracked_entries() {
        let entries = parse_porcelain(" M charts/app/README.md\n?? notes.txt\n");
        assert_eq!(
            entries,
            vec![
                StatusEntry {
                    path: "charts/app/README.md".to_string(),
                    kind: ChangeKind::Modified,
                },
                StatusEntry {
                    path: "notes.txt".to_string(),
                    kind: ChangeKind::Untracked,
                },
            ]
        );
    }

    #[test]
    fn parses_rename_to_the_new_path() {
        let entries = parse_porcelain("R  docs/OLD.md -> docs/README.md\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "docs/README.md");
        assert_eq!(entries[0].kind, ChangeKind::Renamed);
    }

    #[test]
    fn index_column_wins_over_worktree_column() {
        assert_eq!(ChangeKind::from_code("M "), ChangeKind::Modified);
        assert_eq!(ChangeKind::from_code(" M"), ChangeKind::Modified);
        assert_eq!(ChangeKind::from_code("A "), ChangeKind::Added);
        assert_eq!(ChangeKind::from_code("AM"), ChangeKind::Added);
        assert_eq!(ChangeKind::from_code(" D"), ChangeKind::Deleted);
        assert_eq!(ChangeKind::from_code("??"), ChangeKind::Untracked);
        assert_eq!(ChangeKind::from_code("!!"), ChangeKind::Other);
    }

    #[test]
    fn empty_status_parses_to_no_entries() {
        assert!(parse_porcelain("").is_empty());
        assert!(parse_porcelain("\n").is_empty());
    }

    #[test]
    fn suffix_filter_matches_nested_paths() {
        let entries = vec![
            StatusEntry {
                path: "charts/app/README.md".to_string(),
                kind: ChangeKind::Modified,
            },
            StatusEntry {
                path: "README.md".to_string(),
                kind: ChangeKind::Modified,
            },
            StatusEntry {
                path: "charts/app/values.yaml".to_string(),
                kind: ChangeKind::Modified,
            },
        ];
        let filtered = filter_by_suffix(entries, "README.md");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.path.ends_with("README.md")));
    }

    #[test]
    fn suffix_filter_with_no_matches_is_empty() {
        let entries = vec![StatusEntry {
            path: "Chart.yaml".to_string(),
            kind: ChangeKind::Modified,
        }];
        assert!(filter_by_suffix(entries, "README.md").is_empty());
    }
}
