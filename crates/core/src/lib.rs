//! Core types shared across the chartdocs crates.
//!
//! This crate defines the error taxonomy used by the installer, the git
//! client, and the orchestrator, plus the platform identification types
//! used to name release assets.

pub mod platform;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for chartdocs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while installing or running helm-docs.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to download a release archive.
    #[error("Failed to download {url}: {message}")]
    Download {
        /// The download URL.
        url: String,
        /// Error message from the HTTP layer.
        message: String,
    },

    /// Failed to extract a downloaded archive.
    #[error("Failed to extract archive: {0}")]
    Extraction(String),

    /// No executable matched the expected name after installation.
    #[error("executable not found in path: {}", .0.display())]
    ExecutableNotFound(PathBuf),

    /// The external binary could not be spawned or exited non-zero.
    #[error("'{tool}' {message}")]
    Subprocess {
        /// The binary that failed.
        tool: String,
        /// What went wrong.
        message: String,
    },

    /// A git operation failed.
    #[error("git {command} failed: {message}")]
    Git {
        /// The git subcommand.
        command: String,
        /// Stderr or spawn error from git.
        message: String,
    },

    /// Invalid configuration input.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create an executable-not-found error for the scanned directory.
    #[must_use]
    pub fn executable_not_found(dir: &Path) -> Self {
        Self::ExecutableNotFound(dir.to_path_buf())
    }

    /// Create a subprocess error.
    #[must_use]
    pub fn subprocess(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Subprocess {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a git error.
    #[must_use]
    pub fn git(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Git {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
