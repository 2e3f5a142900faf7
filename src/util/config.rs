//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.release-matrix/config.toml` - User-wide defaults
//! - Project: `.release-matrix/config.toml` - Checkout-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory name used for both the global and the project config.
pub const CONFIG_DIR_NAME: &str = ".release-matrix";

/// Release orchestrator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// External build tool (default: `make`)
    pub tool: Option<String>,

    /// Directory holding one subdirectory per port (default: `ports`)
    pub ports_dir: Option<PathBuf>,

    /// Root of the published release tree (default: `bin`)
    pub release_root: Option<PathBuf>,

    /// Board catalog file (default: `boards.toml`)
    pub catalog: Option<PathBuf>,

    /// Parallel jobs for real builds (None = CPU count)
    pub jobs: Option<usize>,

    /// Parallel jobs when running on constrained CI hosts (None = 2)
    pub ci_jobs: Option<usize>,

    /// Remove stale build directories before a release run (None = true)
    pub purge: Option<bool>,
}

impl BuildConfig {
    pub const DEFAULT_TOOL: &'static str = "make";
    pub const DEFAULT_PORTS_DIR: &'static str = "ports";
    pub const DEFAULT_RELEASE_ROOT: &'static str = "bin";
    pub const DEFAULT_CATALOG: &'static str = "boards.toml";
    pub const DEFAULT_CI_JOBS: usize = 2;

    pub fn tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(Self::DEFAULT_TOOL)
    }

    pub fn ports_dir(&self) -> PathBuf {
        self.ports_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PORTS_DIR))
    }

    pub fn release_root(&self) -> PathBuf {
        self.release_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_RELEASE_ROOT))
    }

    pub fn catalog(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CATALOG))
    }

    pub fn ci_jobs(&self) -> usize {
        self.ci_jobs.unwrap_or(Self::DEFAULT_CI_JOBS)
    }

    pub fn purge(&self) -> bool {
        self.purge.unwrap_or(true)
    }

    /// Parallelism for real builds.
    ///
    /// An explicit `cli` value wins. Otherwise the configured `jobs` (or
    /// `host`) is used, capped at `ci_jobs` under CI. Never below 1.
    pub fn resolve_jobs(&self, cli: Option<usize>, ci: bool, host: usize) -> usize {
        let jobs = cli.unwrap_or_else(|| {
            let base = self.jobs.unwrap_or(host);
            if ci {
                base.min(self.ci_jobs())
            } else {
                base
            }
        });
        jobs.max(1)
    }
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
        if other.build.tool.is_some() {
            self.build.tool = other.build.tool;
        }
        if other.build.ports_dir.is_some() {
            self.build.ports_dir = other.build.ports_dir;
        }
        if other.build.release_root.is_some() {
            self.build.release_root = other.build.release_root;
        }
        if other.build.catalog.is_some() {
            self.build.catalog = other.build.catalog;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.ci_jobs.is_some() {
            self.build.ci_jobs = other.build.ci_jobs;
        }
        if other.build.purge.is_some() {
            self.build.purge = other.build.purge;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.release-matrix/config.toml)
/// 2. Global config (~/.release-matrix/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.release-matrix).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.release-matrix/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.release-matrix/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}
