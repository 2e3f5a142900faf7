//! Global context for a release run.
//!
//! Holds the working directory and the environment switches. The
//! environment is read exactly once, when the context is created.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_path, project_config_path};

/// Presence of this variable marks a constrained, shared CI host.
pub const CI_ENV_VAR: &str = "GITHUB_ACTION";

/// Whitespace-separated list of boards to build instead of the full catalog.
pub const BOARDS_ENV_VAR: &str = "BOARDS";

/// Environment switches recognized at run start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSwitches {
    /// Running under CI; build parallelism is reduced.
    pub ci: bool,
    /// Explicit board selection.
    pub boards: Option<Vec<String>>,
}

impl EnvSwitches {
    /// Read the switches through a lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        EnvSwitches {
            ci: lookup(CI_ENV_VAR).is_some(),
            boards: lookup(BOARDS_ENV_VAR).map(|list| split_list(&list)),
        }
    }

    /// Read the switches from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Split a whitespace-separated list, dropping empty entries.
pub fn split_list(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

/// Global context containing paths and environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Switches read from the environment at startup
    env: EnvSwitches,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process state.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            env: EnvSwitches::from_env(),
        })
    }

    /// Create a GlobalContext with explicit parts.
    pub fn with_parts(cwd: PathBuf, env: EnvSwitches) -> Self {
        GlobalContext { cwd, env }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the environment switches.
    pub fn env(&self) -> &EnvSwitches {
        &self.env
    }

    /// Resolve a possibly relative path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Get the global configuration file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        global_config_path()
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        project_config_path(&self.cwd)
    }
}
