//! Builder for executing external tool commands with optional timeout.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use vidsplit_core::{Error, Result};

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// The last `n` non-empty lines of stderr, joined with newlines.
    ///
    /// ffmpeg prints its banner and stream listing before the actual error,
    /// so the tail is what belongs in an error message.
    pub fn stderr_tail(&self, n: usize) -> String {
        let lines: Vec<&str> = self
            .stderr
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();
        let skip = lines.len().saturating_sub(n);
        lines[skip..].join("\n")
    }
}

/// A builder for constructing and executing external tool invocations.
///
/// # Example
///
/// ```no_run
/// use vidsplit_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> vidsplit_core::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffmpeg"))
///     .arg("-i")
///     .arg("/path/to/video.mp4")
///     .output()
///     .await?;
/// println!("{}", output.stderr);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(s.as_ref().to_os_string());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl AsRef<OsStr>>) -> &mut Self {
        self.args
            .extend(iter.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Set the maximum execution time. `None` waits indefinitely.
    pub fn timeout(&mut self, d: Option<Duration>) -> &mut Self {
        self.timeout = d;
        self
    }

    /// Short name of the program, used in error messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run the command and capture its output regardless of exit status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tool`] if spawning fails, waiting fails, or the
    /// timeout expires. The child is killed when the timeout fires.
    pub async fn output(&self) -> Result<ToolOutput> {
        let program_name = self.program_name();

        tracing::debug!(
            "exec: {} {}",
            self.program.display(),
            self.args
                .iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| Error::tool(&program_name, format!("failed to spawn: {e}")))?;

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| Error::tool(&program_name, format!("timed out after {limit:?}")))?,
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|e| {
            Error::tool(&program_name, format!("I/O error waiting for process: {e}"))
        })?;

        Ok(ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Run the command and require a zero exit status.
    ///
    /// # Errors
    ///
    /// Everything [`ToolCommand::output`] returns, plus [`Error::Tool`] when
    /// the process exits with a non-zero status (message includes the tail of
    /// stderr).
    pub async fn execute(&self) -> Result<ToolOutput> {
        let output = self.output().await?;
        if !output.status.success() {
            return Err(Error::tool(
                self.program_name(),
                format!("exited with status {}: {}", output.status, output.stderr_tail(5)),
            ));
        }
        Ok(output)
    }
}
