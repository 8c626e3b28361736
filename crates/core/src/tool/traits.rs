//! Trait definitions for the tool module.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::command::Invocation;
use super::error::ToolError;
use crate::progress::ProgressEvent;

/// Something that can run ffprobe and ffmpeg invocations.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Returns the name of this implementation.
    fn name(&self) -> &str;

    /// Runs a probe to completion and returns its diagnostic output.
    async fn probe(&self, invocation: &Invocation) -> Result<String, ToolError>;

    /// Runs a transcode or concat to completion.
    ///
    /// `total_secs` seeds the progress total; without it the total comes
    /// from the tool's own `Duration:` line. Events go to `progress_tx`
    /// when given. A dropped receiver does not stop the run.
    async fn run(
        &self,
        invocation: &Invocation,
        total_secs: Option<u64>,
        progress_tx: Option<mpsc::Sender<ProgressEvent>>,
    ) -> Result<(), ToolError>;

    /// Checks that the tools can be started.
    async fn validate(&self) -> Result<(), ToolError>;
}
