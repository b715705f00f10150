//! Configuration file support for modinfo.
//!
//! Two configuration file locations are read:
//! - Global: `~/.modinfo/config.toml` - User-wide defaults
//! - Project: `.modinfo/config.toml` next to ModInfo.toml - Project overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::process::find_java;

/// modinfo configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Launcher selection
    pub toolchain: ToolchainSettings,

    /// Module listing settings
    pub listing: ListingConfig,
}

/// Which java launcher runs `--list-modules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Path to the java launcher (e.g., /usr/lib/jvm/java-21/bin/java)
    pub java: Option<PathBuf>,
}

/// Module listing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ListingConfig {
    /// Kill a listing process after this many seconds (None = wait forever)
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.toolchain.java.is_some() {
            self.toolchain.java = other.toolchain.java;
        }
        if other.listing.timeout_secs.is_some() {
            self.listing.timeout_secs = other.listing.timeout_secs;
        }
    }

    /// Listing timeout; zero seconds disables it.
    pub fn timeout(&self) -> Option<Duration> {
        self.listing
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Pick the java launcher.
    ///
    /// Order of precedence:
    /// 1. `explicit` (command line / `MODINFO_JAVA`)
    /// 2. `toolchain.java` from config
    /// 3. `$JAVA_HOME/bin/java`
    /// 4. `java` on `PATH`
    pub fn resolve_java(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(java) = explicit.or(self.toolchain.java.as_deref()) {
            if java.is_file() {
                return Ok(java.to_path_buf());
            }
            // bare names such as `java21` are looked up on PATH
            if let Ok(found) = which::which(java) {
                return Ok(found);
            }
            bail!("configured java launcher not found: {}", java.display());
        }

        match find_java() {
            Some(java) => Ok(java),
            None => bail!(
                "no java launcher found\n\
                 \n\
                 modinfo runs `java --list-modules` to inspect module paths.\n\
                 Set JAVA_HOME, pass --java, or set `toolchain.java` in .modinfo/config.toml."
            ),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.modinfo/config.toml)
/// 2. Global config (~/.modinfo/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global modinfo config directory (~/.modinfo).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".modinfo"))
}

/// Get the project config path (.modinfo/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".modinfo").join("config.toml")
}
