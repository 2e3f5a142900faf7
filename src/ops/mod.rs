//! High-level operations.
//!
//! This module contains the implementation of the release commands.

pub mod clean;
pub mod plan;
pub mod publish;
pub mod release;

pub use clean::purge_build_dirs;
pub use plan::{plan_release, PlannedBuild};
pub use publish::{PublishReport, Publisher, ReleaseLayout};
pub use release::{run_release, Release, ReleaseOptions, RunResult, RunStatus};
