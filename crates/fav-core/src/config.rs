//! File-based configuration for icon discovery.
//!
//! Configuration is stored in TOML and is entirely optional: a missing file
//! means defaults. It seeds a [`Finder`](crate::Finder) through
//! [`FinderBuilder::config`](crate::FinderBuilder::config); explicit builder
//! calls made afterwards take precedence.
//!
//! ## File Location
//!
//! - Linux: `~/.config/favscout/config.toml`
//! - macOS: `~/Library/Application Support/dev.favscout.favscout/config.toml`
//! - Windows: `%APPDATA%\favscout\favscout\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! timeout_secs = 5
//! user_agent = "my-crawler/1.0"
//! max_concurrent_probes = 2
//! ignore_manifest = false
//! ignore_well_known = true
//! formats = ["png"]
//! mime_types = ["image/svg+xml"]
//! ```

use crate::discovery::filter::IconFilter;
use crate::discovery::well_known::DEFAULT_MAX_CONCURRENT_PROBES;
use crate::fetcher::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::{Error, ImageFormat, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Discovery settings loadable from a config file.
///
/// Every field is optional in the file; omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Maximum number of well-known probes in flight at once.
    pub max_concurrent_probes: usize,
    /// Skip fetching the web-app manifest.
    pub ignore_manifest: bool,
    /// Skip probing well-known paths.
    pub ignore_well_known: bool,
    /// Allow-listed image formats.
    pub formats: Vec<ImageFormat>,
    /// Allow-listed MIME types.
    pub mime_types: Vec<String>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            ignore_manifest: false,
            ignore_well_known: false,
            formats: Vec::new(),
            mime_types: Vec::new(),
        }
    }
}

impl FinderConfig {
    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config: {e}")))
    }

    /// Platform config file path.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("dev", "favscout", "favscout")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Reject values that would make discovery impossible.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than zero".into()));
        }
        if self.max_concurrent_probes == 0 {
            return Err(Error::Config(
                "max_concurrent_probes must be greater than zero".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("user_agent must not be empty".into()));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Filters described by `formats` and `mime_types`.
    pub fn filters(&self) -> Vec<IconFilter> {
        self.formats
            .iter()
            .copied()
            .map(IconFilter::Format)
            .chain(self.mime_types.iter().map(|m| IconFilter::mime_type(m)))
            .collect()
    }
}
