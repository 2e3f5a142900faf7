//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

/// How a finished process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process exited with a status code.
    Exited(i32),
    /// The process was killed by a signal.
    Signaled(i32),
}

impl Termination {
    fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Termination::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Termination::Signaled(signal);
            }
        }

        Termination::Exited(1)
    }

    /// Shell-style exit code: the status code, or `128 + signal`.
    pub fn code(&self) -> i32 {
        match *self {
            Termination::Exited(code) => code,
            Termination::Signaled(signal) => 128 + signal,
        }
    }

    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        *self == Termination::Exited(0)
    }
}

/// Output of a process whose stdout and stderr share one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub termination: Termination,
    /// Interleaved stdout/stderr, lossily decoded.
    pub output: String,
}

impl CommandOutput {
    pub fn new(termination: Termination, output: impl Into<String>) -> Self {
        CommandOutput {
            termination,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.termination.success()
    }

    pub fn code(&self) -> i32 {
        self.termination.code()
    }
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Execute the command with stdout and stderr merged into one pipe.
    ///
    /// The output keeps the interleaving the child produced, the way a
    /// terminal would show it. A non-zero exit is not an error here; only
    /// failing to spawn or to collect the child is.
    pub fn exec_merged(&self) -> Result<CommandOutput> {
        let (mut reader, writer) =
            std::io::pipe().context("failed to create output pipe")?;

        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(
            writer
                .try_clone()
                .context("failed to duplicate output pipe")?,
        );
        cmd.stderr(writer);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        // The Command still owns write ends of the pipe; reading to EOF
        // would block forever while they are alive.
        drop(cmd);

        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .with_context(|| format!("failed to read output of `{}`", self.program.display()))?;

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for `{}`", self.program.display()))?;

        Ok(CommandOutput {
            termination: Termination::from_status(status),
            output: String::from_utf8_lossy(&buf).into_owned(),
        })
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Number of CPUs available to this process.
pub fn host_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
