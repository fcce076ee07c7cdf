//! Minimal GitHub Actions workflow-command surface.
//!
//! Only the commands this step actually emits: log grouping, error
//! annotations, and the step output file. Everything degrades to plain
//! logging when run outside a runner.

use std::io::Write;
use tracing::debug;

/// Open a collapsible log group.
pub fn start_group(title: &str) {
    println!("::group::{}", escape_data(title));
}

/// Close the current log group.
pub fn end_group() {
    println!("::endgroup::");
}

/// Emit an error annotation.
pub fn error(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Record a step output by appending to the file named by `$GITHUB_OUTPUT`.
///
/// Outside a runner the variable is unset and the output is skipped with a
/// debug log.
pub fn set_output(name: &str, value: &str) -> std::io::Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            writeln!(file, "{name}={value}")
        }
        None => {
            debug!(%name, %value, "GITHUB_OUTPUT not set, skipping step output");
            Ok(())
        }
    }
}

/// Escape workflow-command data per the runner's percent-encoding rules.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_percent_and_line_breaks() {
        assert_eq!(escape_data("100%"), "100%25");
        assert_eq!(escape_data("a\r\nb"), "a%0D%0Ab");
        assert_eq!(escape_data("plain"), "plain");
    }

    #[test]
    fn percent_is_escaped_before_line_breaks() {
        // A literal "%0A" in the input must not survive as a line break.
        assert_eq!(escape_data("%0A"), "%250A");
    }
}
