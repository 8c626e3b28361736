//! Process-backed tool implementation.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Output, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use super::command::Invocation;
use super::config::ToolConfig;
use super::error::ToolError;
use super::traits::MediaTool;
use crate::progress::{Feed, LineBuffer, ProgressEvent, ProgressTracker};

/// Error lines kept for a failure report.
const MAX_ERROR_LINES: usize = 20;

const READ_CHUNK: usize = 4096;

/// Runs the real ffmpeg and ffprobe binaries.
pub struct FfmpegTool {
    config: ToolConfig,
}

impl FfmpegTool {
    /// Creates a new tool runner with the given configuration.
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Creates a tool runner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ToolConfig::default())
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn spawn_error(program: &Path, err: io::Error) -> ToolError {
        if err.kind() == io::ErrorKind::NotFound {
            ToolError::NotFound {
                tool: program
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| program.display().to_string()),
                path: program.to_path_buf(),
            }
        } else {
            ToolError::Io(err)
        }
    }

    /// Runs `command` to completion, collecting its output. The configured
    /// timeout applies; on expiry the child is killed when dropped.
    async fn collect(
        &self,
        program: &Path,
        command: &mut Command,
        display: impl FnOnce() -> String,
    ) -> Result<Output, ToolError> {
        command.stdin(Stdio::null()).kill_on_drop(true);
        let output = command.output();

        let output = match self.config.timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), output).await {
                Ok(result) => result,
                Err(_) => {
                    let command = display();
                    tracing::warn!(command = %command, timeout_secs = secs, "Tool timed out");
                    return Err(ToolError::Timeout {
                        command,
                        timeout_secs: secs,
                    });
                }
            },
            None => output.await,
        };

        output.map_err(|e| Self::spawn_error(program, e))
    }

    async fn check_version(&self, program: &Path) -> Result<(), ToolError> {
        let output = self
            .collect(
                program,
                Command::new(program).arg("-version"),
                || format!("{} -version", program.display()),
            )
            .await?;

        if !output.status.success() {
            return Err(ToolError::failed(
                format!("{} -version", program.display()),
                output.status.code(),
                None,
            ));
        }

        Ok(())
    }
}

/// Keeps the most recent lines that look like errors.
#[derive(Debug, Default)]
struct ErrorLines {
    lines: VecDeque<String>,
}

impl ErrorLines {
    fn observe(&mut self, line: &str) {
        if !(line.contains("Error") || line.contains("error")) {
            return;
        }
        if self.lines.len() == MAX_ERROR_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    fn into_report(self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(Vec::from(self.lines).join("\n"))
        }
    }
}

/// Reads `stderr` until end of stream, then reaps the child.
///
/// Owning the child means a timeout that drops this future also kills
/// the process.
async fn supervise<R>(
    mut child: Child,
    mut stderr: R,
    total_secs: Option<u64>,
    mut progress_tx: Option<mpsc::Sender<ProgressEvent>>,
) -> io::Result<(ExitStatus, Option<String>)>
where
    R: AsyncRead + Unpin,
{
    let mut tracker = ProgressTracker::new(total_secs);
    let mut lines = LineBuffer::new();
    let mut errors = ErrorLines::default();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = stderr.read(&mut chunk).await?;
        if n == 0 {
            break;
        }

        for byte in &chunk[..n] {
            let Feed::LineReady(line) = lines.push(*byte) else {
                continue;
            };
            errors.observe(&line);

            let Some(event) = tracker.on_line(line) else {
                continue;
            };
            if let Some(tx) = &progress_tx {
                if tx.send(event).await.is_err() {
                    // Nobody is listening any more
                    progress_tx = None;
                }
            }
        }
    }

    if !lines.pending().is_empty() {
        tracing::debug!(bytes = lines.pending().len(), "Dropping unterminated status line");
    }

    let status = child.wait().await?;
    Ok((status, errors.into_report()))
}

#[async_trait]
impl MediaTool for FfmpegTool {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, invocation: &Invocation) -> Result<String, ToolError> {
        tracing::debug!(command = %invocation, "Probing");

        let output = self
            .collect(
                &invocation.program,
                Command::new(&invocation.program).args(&invocation.args),
                || invocation.to_string(),
            )
            .await?;

        let report = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ToolError::failed(
                invocation.to_string(),
                output.status.code(),
                if report.trim().is_empty() {
                    None
                } else {
                    Some(report)
                },
            ));
        }

        Ok(report)
    }

    async fn run(
        &self,
        invocation: &Invocation,
        total_secs: Option<u64>,
        progress_tx: Option<mpsc::Sender<ProgressEvent>>,
    ) -> Result<(), ToolError> {
        tracing::debug!(command = %invocation, total_secs = ?total_secs, "Running");

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::spawn_error(&invocation.program, e))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stderr not captured"))?;

        let supervised = supervise(child, stderr, total_secs, progress_tx);

        let (status, error_output) = match self.config.timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), supervised).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!(command = %invocation, timeout_secs = secs, "Tool timed out");
                    return Err(ToolError::Timeout {
                        command: invocation.to_string(),
                        timeout_secs: secs,
                    });
                }
            },
            None => supervised.await?,
        };

        if !status.success() {
            return Err(ToolError::failed(
                invocation.to_string(),
                status.code(),
                error_output,
            ));
        }

        Ok(())
    }

    async fn validate(&self) -> Result<(), ToolError> {
        self.check_version(&self.config.ffmpeg_path).await?;
        self.check_version(&self.config.ffprobe_path).await?;
        Ok(())
    }
}
