//! Integration tests driving a real git repository.

use chartdocs_vcs::{ChangeKind, GitClient, filter_by_suffix};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn init_repo(dir: &Path) -> GitClient {
    git(dir, &["init", "--initial-branch=main"]);
    let client = GitClient::new(dir);
    client.add_config("user.name", "Test User").unwrap();
    client.add_config("user.email", "test@example.com").unwrap();
    client.add_config("commit.gpgsign", "false").unwrap();
    client
}

#[test]
fn status_reports_a_modified_tracked_file() {
    let tmp = TempDir::new().unwrap();
    let client = init_repo(tmp.path());

    std::fs::write(tmp.path().join("README.md"), "# chart\n").unwrap();
    client.add("README.md").unwrap();
    client.commit("initial").unwrap();

    assert!(client.status().unwrap().is_empty());

    std::fs::write(tmp.path().join("README.md"), "# chart\nchanged\n").unwrap();
    let entries = client.status().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "README.md");
    assert_eq!(entries[0].kind, ChangeKind::Modified);
}

#[test]
fn diff_shows_the_changed_lines() {
    let tmp = TempDir::new().unwrap();
    let client = init_repo(tmp.path());

    std::fs::write(tmp.path().join("README.md"), "before\n").unwrap();
    client.add("README.md").unwrap();
    client.commit("initial").unwrap();
    std::fs::write(tmp.path().join("README.md"), "after\n").unwrap();

    let diff = client.diff("README.md").unwrap();
    assert!(diff.contains("-before"));
    assert!(diff.contains("+after"));
}

#[test]
fn diff_of_an_unknown_path_is_empty_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let client = init_repo(tmp.path());
    std::fs::write(tmp.path().join("README.md"), "x\n").unwrap();
    client.add("README.md").unwrap();
    client.commit("initial").unwrap();

    let diff = client.diff("does-not-exist.md").unwrap();
    assert!(diff.is_empty());
}

#[test]
fn commit_returns_the_new_commit_id() {
    let tmp = TempDir::new().unwrap();
    let client = init_repo(tmp.path());

    std::fs::write(tmp.path().join("README.md"), "one\n").unwrap();
    client.add("README.md").unwrap();
    let first = client.commit("first").unwrap();

    std::fs::write(tmp.path().join("README.md"), "two\n").unwrap();
    client.add("README.md").unwrap();
    let second = client.commit("second").unwrap();

    assert_eq!(first.len(), 40);
    assert_eq!(second.len(), 40);
    assert_ne!(first, second);
}

#[test]
fn push_updates_the_upstream_remote() {
    let tmp = TempDir::new().unwrap();
    let remote = tmp.path().join("remote.git");
    let work = tmp.path().join("work");
    std::fs::create_dir_all(&remote).unwrap();
    std::fs::create_dir_all(&work).unwrap();

    git(&remote, &["init", "--bare", "--initial-branch=main"]);
    let client = init_repo(&work);
    git(
        &work,
        &["remote", "add", "origin", remote.to_str().unwrap()],
    );

    std::fs::write(work.join("README.md"), "one\n").unwrap();
    client.add("README.md").unwrap();
    client.commit("first").unwrap();
    git(&work, &["push", "--set-upstream", "origin", "main"]);

    std::fs::write(work.join("README.md"), "two\n").unwrap();
    client.add("README.md").unwrap();
    let pushed = client.commit("second").unwrap();
    client.push().unwrap();

    let head = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(&remote)
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&head.stdout).trim(), pushed);
}

#[test]
fn push_without_upstream_is_a_git_error() {
    let tmp = TempDir::new().unwrap();
    let client = init_repo(tmp.path());
    std::fs::write(tmp.path().join("README.md"), "x\n").unwrap();
    client.add("README.md").unwrap();
    client.commit("initial").unwrap();

    let err = client.push().unwrap_err();
    assert!(err.to_string().starts_with("git push failed:"), "{err}");
}

#[test]
fn suffix_filter_on_real_status_output() {
    let tmp = TempDir::new().unwrap();
    let client = init_repo(tmp.path());

    std::fs::create_dir_all(tmp.path().join("charts/app")).unwrap();
    std::fs::write(tmp.path().join("charts/app/README.md"), "docs\n").unwrap();
    std::fs::write(tmp.path().join("charts/app/Chart.yaml"), "name: app\n").unwrap();
    client.add(".").unwrap();
    client.commit("initial").unwrap();

    std::fs::write(tmp.path().join("charts/app/README.md"), "docs v2\n").unwrap();
    std::fs::write(tmp.path().join("charts/app/Chart.yaml"), "name: app2\n").unwrap();

    let filtered = filter_by_suffix(client.status().unwrap(), "README.md");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].path, "charts/app/README.md");
}
