//! The external build tool.
//!
//! The orchestrator never compiles anything. It drives the firmware's own
//! build system with structured argument lists, one invocation per probe or
//! build, and reads back only the exit status and the raw output text.

use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::core::board::BoardTarget;
use crate::core::variant::Variant;
use crate::util::process::{find_executable, CommandOutput, ProcessBuilder};

/// Printed by the probe target when a configuration cannot reuse objects
/// compiled for other variants and must be built from an empty directory.
pub const CLEAN_BUILD_MARKER: &str = "RELEASE_NEEDS_CLEAN_BUILD = 1";

/// Build-system target that reports whether a clean build is needed.
pub const PROBE_TARGET: &str = "check-release-needs-clean-build";

/// Name of the firmware image produced in every build directory.
pub const FIRMWARE_STEM: &str = "firmware";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("build tool `{tool}` not found in PATH")]
    NotFound { tool: String },
}

/// Runs a prepared tool invocation.
///
/// The seam between the orchestrator and the operating system; tests swap
/// in a scripted runner.
pub trait ToolRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<CommandOutput>;
}

/// Runs invocations as real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<CommandOutput> {
        tracing::debug!("running `{}`", cmd.display_command());
        cmd.exec_merged()
    }
}

/// How to invoke the build tool for a firmware tree.
#[derive(Debug, Clone)]
pub struct BuildTool {
    program: PathBuf,
    ports_dir: PathBuf,
}

impl BuildTool {
    pub fn new(program: impl Into<PathBuf>, ports_dir: impl Into<PathBuf>) -> Self {
        BuildTool {
            program: program.into(),
            ports_dir: ports_dir.into(),
        }
    }

    /// Resolve the program through PATH, failing early if it is missing.
    pub fn locate(program: &str, ports_dir: impl Into<PathBuf>) -> Result<Self, ToolError> {
        let program = find_executable(program).ok_or_else(|| ToolError::NotFound {
            tool: program.to_string(),
        })?;
        Ok(BuildTool::new(program, ports_dir))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn ports_dir(&self) -> &Path {
        &self.ports_dir
    }

    /// Directory the tool runs in for a port.
    pub fn port_dir(&self, port: &str) -> PathBuf {
        self.ports_dir.join(port)
    }

    /// Where a build leaves its image for `extension`.
    pub fn artifact_path(&self, board: &BoardTarget, build_dir: &str, extension: &str) -> PathBuf {
        self.port_dir(&board.port)
            .join(build_dir)
            .join(format!("{}.{}", FIRMWARE_STEM, extension))
    }

    /// Arguments shared by the probe and the build.
    fn base_command(&self, board: &BoardTarget, variant: &Variant) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg("-C")
            .arg(self.port_dir(&board.port))
            .arg(format!("TRANSLATION={}", variant.language))
            .arg(format!("BOARD={}", board.id))
            .args(variant.settings_args())
    }

    /// The check-only invocation that may print [`CLEAN_BUILD_MARKER`].
    pub fn probe_command(
        &self,
        board: &BoardTarget,
        variant: &Variant,
        jobs: usize,
    ) -> ProcessBuilder {
        self.base_command(board, variant)
            .arg(PROBE_TARGET)
            .arg("-j")
            .arg(jobs.to_string())
    }

    /// The real build into `build_dir`, relative to the port directory.
    pub fn build_command(
        &self,
        board: &BoardTarget,
        variant: &Variant,
        build_dir: &str,
        jobs: usize,
    ) -> ProcessBuilder {
        self.base_command(board, variant)
            .arg(format!("BUILD={}", build_dir))
            .arg("-j")
            .arg(jobs.to_string())
    }
}
