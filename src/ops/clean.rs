//! Removal of stale build directories.
//!
//! A release starts from empty build directories so that nothing compiled
//! by an earlier checkout leaks into published images.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::{glob_dirs, remove_dir_all_if_exists};

/// Build directories under `<ports_dir>/<port>` for the given ports.
pub fn stale_build_dirs<S: AsRef<str>>(ports_dir: &Path, ports: &[S]) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for port in ports {
        dirs.extend(glob_dirs(&ports_dir.join(port.as_ref()), "build*")?);
    }
    Ok(dirs)
}

/// Remove every `build*` directory of the given ports. Returns what was removed.
pub fn purge_build_dirs<S: AsRef<str>>(ports_dir: &Path, ports: &[S]) -> Result<Vec<PathBuf>> {
    let dirs = stale_build_dirs(ports_dir, ports)?;
    for dir in &dirs {
        tracing::debug!("removing {}", dir.display());
        remove_dir_all_if_exists(dir)?;
    }
    Ok(dirs)
}
