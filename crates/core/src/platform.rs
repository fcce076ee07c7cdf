//! Platform identification for release-asset naming.
//!
//! helm-docs release archives are named `helm-docs_<version>_<Os>_<Arch>.tar.gz`
//! with OS tokens in the style of `uname -s` (`Linux`, `Darwin`, `Windows`).
//! The mapping rules mirror the upstream asset convention: `Windows_NT`
//! collapses to `Windows`, every other OS name is used as-is, and every
//! architecture other than `arm64` collapses to `x86_64`.

use serde::{Deserialize, Serialize};

/// Platform identifier combining OS family and architecture family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// OS family.
    pub os: Os,
    /// CPU architecture family.
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Get the current platform.
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: Os::current(),
            arch: Arch::current(),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.os, self.arch)
    }
}

/// Operating system family.
///
/// Only Windows needs special handling (asset token and `.exe` suffix);
/// every other OS type name passes through unchanged, case preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    /// Any Windows variant (`Windows_NT`).
    Windows,
    /// Any other OS, carrying its raw type name (`Linux`, `Darwin`, ...).
    Other(String),
}

impl Os {
    /// Map a raw OS type name to its family.
    #[must_use]
    pub fn from_type_name(raw: &str) -> Self {
        if raw == "Windows_NT" {
            Self::Windows
        } else {
            Self::Other(raw.to_string())
        }
    }

    /// Get the current OS family.
    #[must_use]
    pub fn current() -> Self {
        Self::from_type_name(host_type_name())
    }

    /// Executable filename suffix for this OS family.
    #[must_use]
    pub fn executable_suffix(&self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Other(name) if name.starts_with("Win") => ".exe",
            Self::Other(_) => "",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "Windows"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// OS type name of the host, in `uname -s` style.
fn host_type_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows_NT",
        other => other,
    }
}

/// CPU architecture family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit ARM.
    Arm64,
    /// Everything else.
    X86_64,
}

impl Arch {
    /// Map a raw architecture name to its family.
    ///
    /// Only the literal `arm64` token maps to [`Arch::Arm64`]; any other
    /// architecture name collapses to [`Arch::X86_64`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        if raw == "arm64" {
            Self::Arm64
        } else {
            Self::X86_64
        }
    }

    /// Get the current architecture family.
    #[must_use]
    pub fn current() -> Self {
        Self::from_raw(host_arch_name())
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arm64 => write!(f, "arm64"),
            Self::X86_64 => write!(f, "x86_64"),
        }
    }
}

/// Architecture name of the host, normalized to the upstream tokens.
fn host_arch_name() -> &'static str {
    match std::env::consts::ARCH {
        "aarch64" => "arm64",
        other => other,
    }
}
