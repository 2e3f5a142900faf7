//! Build execution.
//!
//! This module drives the external build tool:
//! - Tool invocation (probe and build command lines)
//! - Clean-vs-incremental decisions and build directory naming
//! - Machine-readable release events

pub mod events;
pub mod executor;
pub mod tool;

pub use events::ReleaseEvent;
pub use executor::{build_dir_name, needs_clean_build, BuildAttempt, BuildExecutor};
pub use tool::{BuildTool, SystemRunner, ToolRunner, CLEAN_BUILD_MARKER};
