//! Release event types for JSON output.
//!
//! These events are emitted one per line when running with
//! `--message-format json`.
//!
//! # Event Types
//!
//! - `run-started`: the matrix is about to be built
//! - `build-finished`: one (board, variant) build completed
//! - `artifact-missing`: an expected image could not be published
//! - `run-finished`: every item was attempted
//!
//! # Stability
//!
//! New fields may be added, but existing fields should not be removed or renamed.

use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum ReleaseEvent {
    #[serde(rename = "run-started")]
    RunStarted {
        version: String,
        sha: String,
        boards: usize,
        variants: usize,
        jobs: usize,
        /// Known languages that are not being built
        skipped_languages: Vec<String>,
    },

    #[serde(rename = "build-finished")]
    BuildFinished {
        board: String,
        variant: String,
        clean_build: bool,
        build_dir: String,
        duration_ms: u64,
        exit_code: i32,
        success: bool,
        /// Files published for this build
        published: Vec<PathBuf>,
        /// Captured tool output
        output: String,
    },

    #[serde(rename = "artifact-missing")]
    ArtifactMissing {
        board: String,
        variant: String,
        message: String,
    },

    #[serde(rename = "run-finished")]
    RunFinished {
        builds: usize,
        failed_builds: usize,
        missing_artifacts: usize,
        exit_status: i32,
        duration_ms: u64,
    },
}
