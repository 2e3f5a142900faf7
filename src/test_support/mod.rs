//! Test utilities and mocks for unit tests.
//!
//! Provides a scripted [`ToolRunner`] so executor and release logic can be
//! exercised without a firmware tree, and an in-memory [`BoardCatalog`].
//!
//! # Example
//!
//! ```rust,ignore
//! use release_matrix::test_support::{MockProcessOutput, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.expect_contains(
//!     "check-release",
//!     MockProcessOutput::success("RELEASE_NEEDS_CLEAN_BUILD = 1"),
//! );
//! runner.set_default(MockProcessOutput::success(""));
//! ```

pub mod fixtures;

use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::tool::ToolRunner;
use crate::core::board::BoardTarget;
use crate::core::catalog::BoardCatalog;
use crate::util::process::{CommandOutput, ProcessBuilder, Termination};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    pub termination: Termination,
    /// Combined stdout/stderr.
    pub output: String,
}

impl MockProcessOutput {
    /// Create a successful output.
    pub fn success(output: impl Into<String>) -> Self {
        MockProcessOutput {
            termination: Termination::Exited(0),
            output: output.into(),
        }
    }

    /// Create a failure output with the given status code.
    pub fn failure(status: i32, output: impl Into<String>) -> Self {
        MockProcessOutput {
            termination: Termination::Exited(status),
            output: output.into(),
        }
    }

    /// Create an output for a process killed by `signal`.
    pub fn signaled(signal: i32, output: impl Into<String>) -> Self {
        MockProcessOutput {
            termination: Termination::Signaled(signal),
            output: output.into(),
        }
    }

    fn to_command_output(&self) -> CommandOutput {
        CommandOutput::new(self.termination, self.output.clone())
    }
}

/// Pattern for matching commands in MockRunner.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<(CommandPattern, MockProcessOutput)>,
    calls: Vec<String>,
    default_output: Option<MockProcessOutput>,
}

/// Scripted tool runner.
///
/// Expectations are tried in insertion order; the first match answers.
/// Unmatched commands fall back to the default output, or fail the way a
/// spawn error would when there is none.
#[derive(Debug, Default)]
pub struct MockRunner {
    state: Mutex<MockState>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer an exact command line.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Answer any command line containing `substring`.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Contains(substring.to_string()), output)
    }

    /// Answer every unmatched command.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.lock().default_output = Some(output);
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn push(&self, pattern: CommandPattern, output: MockProcessOutput) -> &Self {
        self.lock().expectations.push((pattern, output));
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ToolRunner for MockRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<CommandOutput> {
        let full_cmd = cmd.display_command();
        let mut state = self.lock();
        state.calls.push(full_cmd.clone());

        if let Some((_, output)) = state
            .expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(&full_cmd))
        {
            return Ok(output.to_command_output());
        }

        if let Some(ref default) = state.default_output {
            return Ok(default.to_command_output());
        }

        bail!("unexpected command: {}", full_cmd)
    }
}

/// In-memory board catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    boards: Vec<BoardTarget>,
    ports: Vec<String>,
    languages: Vec<String>,
    all_languages: Vec<String>,
    version: String,
}

impl StaticCatalog {
    pub fn new(version: impl Into<String>) -> Self {
        StaticCatalog {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Add a board; its port becomes supported.
    pub fn with_board(mut self, board: BoardTarget) -> Self {
        if !self.ports.contains(&board.port) {
            self.ports.push(board.port.clone());
        }
        self.boards.push(board);
        self
    }

    /// Set enabled languages; they are also the known languages unless
    /// [`StaticCatalog::with_all_languages`] says otherwise.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        if self.all_languages.is_empty() {
            self.all_languages = self.languages.clone();
        }
        self
    }

    pub fn with_all_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all_languages = languages.into_iter().map(Into::into).collect();
        self
    }
}

impl BoardCatalog for StaticCatalog {
    fn boards(&self) -> &[BoardTarget] {
        &self.boards
    }

    fn supported_ports(&self) -> &[String] {
        &self.ports
    }

    fn languages(&self) -> &[String] {
        &self.languages
    }

    fn all_languages(&self) -> &[String] {
        &self.all_languages
    }

    fn sha(&self) -> &str {
        "0000000"
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_first_match_wins() {
        let runner = MockRunner::new();
        runner.expect_contains("BOARD=a", MockProcessOutput::failure(2, "first"));
        runner.expect_contains("BOARD=", MockProcessOutput::success("second"));

        let out = runner
            .run(&ProcessBuilder::new("make").arg("BOARD=a"))
            .unwrap();
        assert_eq!(out.code(), 2);
        assert_eq!(out.output, "first");

        let out = runner
            .run(&ProcessBuilder::new("make").arg("BOARD=b"))
            .unwrap();
        assert!(out.success());

        assert_eq!(runner.calls(), vec!["make BOARD=a", "make BOARD=b"]);
    }

    #[test]
    fn test_mock_runner_exact_and_unexpected() {
        let runner = MockRunner::new();
        runner.expect("make -v", MockProcessOutput::success("GNU Make 4.3"));

        assert!(runner.run(&ProcessBuilder::new("make").arg("-v")).is_ok());
        assert!(runner.run(&ProcessBuilder::new("make").arg("-j")).is_err());
    }

    #[test]
    fn test_static_catalog_collects_ports() {
        let catalog = StaticCatalog::new("1.0.0")
            .with_board(BoardTarget::new("a", "nrf"))
            .with_board(BoardTarget::new("b", "nrf"))
            .with_board(BoardTarget::new("c", "stm"))
            .with_languages(["en_US"])
            .with_all_languages(["en_US", "fr"]);

        assert_eq!(catalog.supported_ports(), ["nrf", "stm"]);
        assert_eq!(catalog.all_languages(), ["en_US", "fr"]);
        assert_eq!(catalog.board("b").unwrap().port, "nrf");
    }
}
