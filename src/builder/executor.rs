//! Build executor: one (board, variant) build at a time.
//!
//! Language variants of a board normally share one build directory so that
//! each translation only recompiles what differs. A variant gets a directory
//! of its own (a clean build) when it carries extra settings, or when the
//! build system's probe target reports that it cannot reuse shared objects.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::builder::tool::{BuildTool, ToolRunner, CLEAN_BUILD_MARKER};
use crate::core::board::BoardTarget;
use crate::core::variant::Variant;
use crate::util::process::Termination;

/// Exit code recorded when the build tool could not be run at all.
pub const SPAWN_FAILURE_CODE: i32 = 1;

/// Record of one finished build. Never persisted.
#[derive(Debug, Clone)]
pub struct BuildAttempt {
    /// Build directory name, relative to the port directory
    pub build_dir: String,
    /// Full path of the build directory
    pub build_path: PathBuf,
    pub clean_build: bool,
    /// Wall-clock time for probe and build
    pub duration: Duration,
    pub exit_code: i32,
    /// Combined stdout/stderr of the build
    pub output: String,
}

impl BuildAttempt {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Whether a variant must be built from an empty build directory.
///
/// Extra settings may change compiler flags in ways that corrupt shared
/// intermediates, so they always force a clean build.
pub fn needs_clean_build(marker_found: bool, variant: &Variant) -> bool {
    marker_found || variant.has_settings()
}

/// Build directory name for a board.
///
/// Incremental builds of every language share `build-<board>`; a clean
/// build gets `build-<board>-<variant>`.
pub fn build_dir_name(board_id: &str, clean_build: bool, variant_name: &str) -> String {
    if clean_build {
        format!("build-{}-{}", board_id, variant_name)
    } else {
        format!("build-{}", board_id)
    }
}

/// Why a finished probe is not trustworthy, if it is not.
///
/// A printed marker is honored whatever the exit status.
fn probe_problem(termination: Termination, marker_found: bool) -> Option<String> {
    match termination {
        Termination::Exited(0) => None,
        _ if marker_found => None,
        Termination::Exited(code) => Some(format!("exited with {}", code)),
        Termination::Signaled(signal) => Some(format!("killed by signal {}", signal)),
    }
}

/// Runs probes and builds through a [`ToolRunner`].
pub struct BuildExecutor<'a> {
    tool: &'a BuildTool,
    runner: &'a dyn ToolRunner,
    /// Parallelism hint for the probe
    probe_jobs: usize,
    /// Parallelism for real builds
    jobs: usize,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(tool: &'a BuildTool, runner: &'a dyn ToolRunner, jobs: usize) -> Self {
        BuildExecutor {
            tool,
            runner,
            probe_jobs: jobs,
            jobs,
        }
    }

    /// Set the probe parallelism separately from the build parallelism.
    pub fn probe_jobs(mut self, probe_jobs: usize) -> Self {
        self.probe_jobs = probe_jobs;
        self
    }

    /// Ask the build system whether this variant needs a clean build.
    ///
    /// Only the marker counts. A probe that crashed (non-zero exit without
    /// the marker, killed, or never started) means "no", after a warning.
    pub fn probe(&self, board: &BoardTarget, variant: &Variant) -> bool {
        let cmd = self.tool.probe_command(board, variant, self.probe_jobs);

        match self.runner.run(&cmd) {
            Ok(result) => {
                let found = result.output.contains(CLEAN_BUILD_MARKER);
                if let Some(problem) = probe_problem(result.termination, found) {
                    tracing::warn!(
                        "clean-build probe for {} {} {}; assuming no clean build",
                        board.id,
                        variant,
                        problem
                    );
                }
                found
            }
            Err(e) => {
                tracing::warn!(
                    "clean-build probe for {} {} could not run: {:#}; assuming no clean build",
                    board.id,
                    variant,
                    e
                );
                false
            }
        }
    }

    /// Probe, then build. Failures are recorded, never returned.
    pub fn execute(&self, board: &BoardTarget, variant: &Variant) -> BuildAttempt {
        let start = Instant::now();

        let clean_build = needs_clean_build(self.probe(board, variant), variant);
        let build_dir = build_dir_name(&board.id, clean_build, &variant.name);
        let cmd = self.tool.build_command(board, variant, &build_dir, self.jobs);

        let (exit_code, output) = match self.runner.run(&cmd) {
            Ok(result) => (result.code(), result.output),
            Err(e) => (SPAWN_FAILURE_CODE, format!("{:#}", e)),
        };

        BuildAttempt {
            build_path: self.tool.port_dir(&board.port).join(&build_dir),
            build_dir,
            clean_build,
            duration: start.elapsed(),
            exit_code,
            output,
        }
    }
}
