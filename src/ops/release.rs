//! Implementation of a release run.
//!
//! Builds every (board, variant) item strictly in matrix order, publishes
//! what each build produced, and folds every outcome into one exit status.
//! No failure stops the run: a release always attempts every item so one
//! broken board does not cost the artifacts of all the others.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Instant;

use crate::builder::events::ReleaseEvent;
use crate::builder::executor::{BuildAttempt, BuildExecutor};
use crate::builder::tool::{BuildTool, ToolRunner};
use crate::core::board::BoardTarget;
use crate::core::catalog::BoardCatalog;
use crate::core::matrix::{skipped_languages, BuildMatrix};
use crate::core::variant::Variant;
use crate::ops::clean::purge_build_dirs;
use crate::ops::publish::{PublishReport, Publisher, ReleaseLayout};
use crate::util::shell::{Shell, Status};

/// Worst outcome seen so far.
///
/// Build-tool failures outrank unpublished artifacts, which outrank success.
/// Among build failures the first code observed is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Success,
    /// An expected artifact could not be published
    ArtifactMissing,
    /// The build tool exited with this non-zero code
    BuildFailed(i32),
}

impl RunStatus {
    pub fn from_build(exit_code: i32) -> Self {
        if exit_code == 0 {
            RunStatus::Success
        } else {
            RunStatus::BuildFailed(exit_code)
        }
    }

    pub fn from_publish(report: &PublishReport) -> Self {
        if report.is_complete() {
            RunStatus::Success
        } else {
            RunStatus::ArtifactMissing
        }
    }

    fn rank(&self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::ArtifactMissing => 1,
            RunStatus::BuildFailed(_) => 2,
        }
    }

    /// Fold two statuses; on a tie the receiver wins.
    pub fn worst(self, other: RunStatus) -> RunStatus {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Process exit code for this status.
    pub fn code(&self) -> i32 {
        match *self {
            RunStatus::Success => 0,
            RunStatus::ArtifactMissing => 1,
            RunStatus::BuildFailed(code) => code,
        }
    }
}

/// An item that did not fully succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub board: String,
    pub variant: String,
    pub status: RunStatus,
}

/// Accumulated outcome of a release run.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    status: RunStatus,
    builds: usize,
    failed_builds: usize,
    missing_artifacts: usize,
    failures: Vec<FailedItem>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one item's build and publish outcomes into the run.
    pub fn record(&mut self, board: &str, variant: &str, exit_code: i32, report: &PublishReport) {
        let item = RunStatus::from_build(exit_code).worst(RunStatus::from_publish(report));

        self.builds += 1;
        if exit_code != 0 {
            self.failed_builds += 1;
        }
        self.missing_artifacts += report.errors.len();
        self.status = self.status.worst(item);

        if item != RunStatus::Success {
            self.failures.push(FailedItem {
                board: board.to_string(),
                variant: variant.to_string(),
                status: item,
            });
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Exit status for the whole process.
    pub fn exit_status(&self) -> i32 {
        self.status.code()
    }

    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn failed_builds(&self) -> usize {
        self.failed_builds
    }

    pub fn missing_artifacts(&self) -> usize {
        self.missing_artifacts
    }

    pub fn failures(&self) -> &[FailedItem] {
        &self.failures
    }
}

/// Options for a release run.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Root of the published tree
    pub release_root: PathBuf,
    /// Parallelism for real builds
    pub jobs: usize,
    /// Parallelism hint for clean-build probes
    pub probe_jobs: usize,
    /// Remove stale build directories first
    pub purge: bool,
}

/// Everything a run needs besides its options.
pub struct Release<'a> {
    pub catalog: &'a dyn BoardCatalog,
    pub matrix: &'a BuildMatrix,
    pub tool: &'a BuildTool,
    pub runner: &'a dyn ToolRunner,
    pub shell: &'a Shell,
}

/// Run the whole matrix and return the folded result.
///
/// Never fails: every problem is local to its item and lands in the result.
pub fn run_release(release: &Release<'_>, opts: &ReleaseOptions) -> RunResult {
    let Release {
        catalog,
        matrix,
        tool,
        runner,
        shell,
    } = *release;
    let start = Instant::now();

    if opts.purge {
        match purge_build_dirs(tool.ports_dir(), catalog.supported_ports()) {
            Ok(removed) => {
                for dir in removed {
                    shell.status(Status::Removed, dir.display());
                }
            }
            Err(e) => shell.warn(format!("could not remove stale build directories: {:#}", e)),
        }
    }

    let skipped = skipped_languages(catalog.all_languages(), catalog.languages());
    if !skipped.is_empty() {
        shell.note(format!("Not building languages {}", skipped.join(", ")));
    }
    shell.note(format!("building boards with parallelism {}", opts.jobs));
    shell.status(
        Status::Building,
        format!(
            "{} {} ({} boards, {} variants)",
            catalog.version(),
            catalog.sha(),
            matrix.boards().len(),
            matrix.variants().len()
        ),
    );
    shell.json_event(&ReleaseEvent::RunStarted {
        version: catalog.version().to_string(),
        sha: catalog.sha().to_string(),
        boards: matrix.boards().len(),
        variants: matrix.variants().len(),
        jobs: opts.jobs,
        skipped_languages: skipped,
    });

    let layout = ReleaseLayout::new(&opts.release_root, catalog.version());
    let executor = BuildExecutor::new(tool, runner, opts.jobs).probe_jobs(opts.probe_jobs);
    let publisher = Publisher::new(tool, &layout);

    let mut result = RunResult::new();
    for item in matrix.items() {
        let attempt = executor.execute(item.board, item.variant);
        let report = publisher.publish(item.board, item.variant, &attempt);
        result.record(
            &item.board.id,
            &item.variant.name,
            attempt.exit_code,
            &report,
        );
        report_item(shell, item.board, item.variant, &attempt, report);
    }

    report_summary(shell, &result);
    shell.json_event(&ReleaseEvent::RunFinished {
        builds: result.builds(),
        failed_builds: result.failed_builds(),
        missing_artifacts: result.missing_artifacts(),
        exit_status: result.exit_status(),
        duration_ms: start.elapsed().as_millis() as u64,
    });

    result
}

/// The one-line headline for a finished build.
pub fn format_build_line(
    board: &str,
    variant: &str,
    attempt: &BuildAttempt,
    outcome: &str,
) -> String {
    let mut line = format!("Build {} for {}", board, variant);
    if attempt.clean_build {
        line.push_str(" (clean build)");
    }
    let _ = write!(
        line,
        " took {:.2}s and {}",
        attempt.duration.as_secs_f64(),
        outcome
    );
    line
}

fn report_item(
    shell: &Shell,
    board: &BoardTarget,
    variant: &Variant,
    attempt: &BuildAttempt,
    report: PublishReport,
) {
    if shell.is_json() {
        for message in &report.errors {
            shell.json_event(&ReleaseEvent::ArtifactMissing {
                board: board.id.clone(),
                variant: variant.name.clone(),
                message: message.clone(),
            });
        }
        shell.json_event(&ReleaseEvent::BuildFinished {
            board: board.id.clone(),
            variant: variant.name.clone(),
            clean_build: attempt.clean_build,
            build_dir: attempt.build_dir.clone(),
            duration_ms: attempt.duration.as_millis() as u64,
            exit_code: attempt.exit_code,
            success: attempt.success(),
            published: report.copied,
            output: attempt.output.clone(),
        });
        return;
    }

    shell.println(format_build_line(
        &board.id,
        &variant.name,
        attempt,
        &shell.outcome(attempt.success()),
    ));
    shell.println(&attempt.output);
    for message in &report.errors {
        shell.println(message);
    }
    // Separator; also forces a flush before the next (possibly long) build.
    shell.println("");
}

fn report_summary(shell: &Shell, result: &RunResult) {
    if result.failures().is_empty() {
        shell.status(
            Status::Finished,
            format!("{} builds, all artifacts published", result.builds()),
        );
        return;
    }

    shell.error(format!(
        "{} of {} builds did not fully succeed",
        result.failures().len(),
        result.builds()
    ));
    for failure in result.failures() {
        let reason = match failure.status {
            RunStatus::BuildFailed(code) => format!("build exited with {}", code),
            _ => "missing artifacts".to_string(),
        };
        shell.warn(format!("{} {}: {}", failure.board, failure.variant, reason));
    }
}
