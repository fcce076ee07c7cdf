//! helm-docs release resolver and installer.
//!
//! Maps a release tag to a locally cached, runnable helm-docs binary:
//!
//! - The download URL is a pure function of `(tool, version, platform)` and
//!   follows the upstream asset convention
//!   `<host>/<tool>/releases/download/<tag>/<tool>_<bare-version>_<Os>_<Arch>.tar.gz`.
//! - Archives are downloaded once per `(tool, version)` and extracted into a
//!   keyed cache directory. Population is atomic: download and extraction
//!   happen in a hidden staging directory which is renamed into place only
//!   on full success.
//! - The executable is located by scanning the cache entry's immediate
//!   children (subdirectories are skipped, not descended into) for the tool
//!   name plus the OS-appropriate suffix. Entries are compared in lexical
//!   order so first-match-wins is deterministic.

use async_trait::async_trait;
use chartdocs_core::platform::{Os, Platform};
use chartdocs_core::{Error, Result};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tar::Archive;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Name of the external documentation generator.
pub const TOOL_NAME: &str = "helm-docs";

/// Release host for helm-docs archives.
pub const RELEASES_HOST: &str = "https://github.com/norwoodj";

/// Build the release-archive download URL for a tool version and platform.
///
/// Pure function of its inputs; no network access. The leading `v` of the
/// version appears in the release tag path segment but not in the asset
/// file name.
#[must_use]
pub fn download_url(tool: &str, version: &str, platform: &Platform) -> String {
    let bare = version.strip_prefix('v').unwrap_or(version);
    format!("{RELEASES_HOST}/{tool}/releases/download/{version}/{tool}_{bare}_{platform}.tar.gz")
}

/// Download primitive for release archives.
///
/// Seam between the installer and the network, so tests can populate the
/// cache without any HTTP traffic.
#[async_trait]
pub trait ReleaseFetcher: Send + Sync {
    /// Download the archive at `url` into memory.
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`ReleaseFetcher`] backed by an HTTP client.
pub struct HttpReleaseFetcher {
    client: reqwest::Client,
}

impl Default for HttpReleaseFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpReleaseFetcher {
    /// Create a new HTTP fetcher.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend fails to initialize, which indicates a
    /// broken environment rather than a recoverable error.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("chartdocs")
                .build()
                .expect("failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl ReleaseFetcher for HttpReleaseFetcher {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!(%url, "downloading release archive");

        let mut request = self.client.get(url);

        // Hosted runners hit anonymous rate limits quickly.
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            request = request.header("Authorization", format!("Bearer {token}"));
        } else if let Ok(token) = std::env::var("GH_TOKEN") {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::download(url, format!("HTTP {}", response.status())));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| Error::download(url, e.to_string()))
    }
}

/// Persistent on-disk cache of extracted tool archives, keyed by
/// `(tool, version)`.
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    /// Create a cache rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default cache root, `<user cache dir>/chartdocs/tools`.
    #[must_use]
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("chartdocs")
            .join("tools")
    }

    fn entry_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version)
    }

    /// Look up an existing cache entry.
    #[must_use]
    pub fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version);
        dir.is_dir().then_some(dir)
    }

    /// Create a fresh staging directory for an entry being populated.
    ///
    /// A stale staging directory left behind by an interrupted run is
    /// removed first.
    pub fn stage(&self, tool: &str, version: &str) -> Result<PathBuf> {
        let staged = self.root.join(tool).join(format!(".{version}.tmp"));
        if staged.exists() {
            std::fs::remove_dir_all(&staged)?;
        }
        std::fs::create_dir_all(&staged)?;
        Ok(staged)
    }

    /// Publish a fully populated staging directory as the cache entry.
    pub fn publish(&self, staged: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        let dir = self.entry_dir(tool, version);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::rename(staged, &dir)?;
        Ok(dir)
    }
}

/// Resolver/installer mapping a release tag to a runnable binary path.
pub struct Installer<F> {
    fetcher: F,
    cache: ToolCache,
}

impl<F: ReleaseFetcher> Installer<F> {
    /// Create an installer over a fetcher and a cache.
    pub fn new(fetcher: F, cache: ToolCache) -> Self {
        Self { fetcher, cache }
    }

    /// Install helm-docs at `version` for the current platform.
    pub async fn install(&self, version: &str) -> Result<PathBuf> {
        self.install_for(TOOL_NAME, version, &Platform::current())
            .await
    }

    /// Install `tool` at `version` for `platform`, returning the executable
    /// path.
    ///
    /// A cache hit skips the download entirely. On a miss the archive is
    /// downloaded, marked executable, extracted into a staging directory,
    /// and published into the cache, in that order. Any failure propagates
    /// immediately; nothing is retried.
    pub async fn install_for(
        &self,
        tool: &str,
        version: &str,
        platform: &Platform,
    ) -> Result<PathBuf> {
        let dir = match self.cache.find(tool, version) {
            Some(dir) => {
                debug!(dir = %dir.display(), "tool already cached");
                dir
            }
            None => {
                let url = download_url(tool, version, platform);
                info!(%url, "fetching release archive");
                let data = self.fetcher.download(&url).await?;

                let staged = self.cache.stage(tool, version)?;
                let archive = staged.join(format!("{tool}.tar.gz"));
                std::fs::write(&archive, &data)?;
                set_executable(&archive)?;
                extract_tar_gz(&archive, &staged)?;
                std::fs::remove_file(&archive)?;
                self.cache.publish(&staged, tool, version)?
            }
        };

        let binary = find_executable(&dir, tool, &platform.os)?;
        set_executable(&binary)?;
        Ok(binary)
    }
}

/// Extract a gzip-compressed tar archive into `dest`.
fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive)?;
    let mut tar = Archive::new(GzDecoder::new(file));
    tar.unpack(dest).map_err(|e| Error::extraction(e.to_string()))
}

/// Locate the tool executable among the immediate children of `dir`.
///
/// Subdirectories are skipped, never descended into. The expected file name
/// is the tool name plus the OS-appropriate executable suffix, compared
/// case-sensitively. Children are visited in lexical order.
pub fn find_executable(dir: &Path, tool: &str, os: &Os) -> Result<PathBuf> {
    let expected = format!("{tool}{}", os.executable_suffix());

    let mut entries = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        if entry.file_type()?.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy() == expected {
            return Ok(entry.path());
        }
    }

    Err(Error::executable_not_found(dir))
}

/// Grant execute permission on a file. Idempotent; no-op off Unix.
fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(perms.mode() | 0o755);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Compute the SHA-256 digest of a file, hex encoded.
pub async fn file_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
