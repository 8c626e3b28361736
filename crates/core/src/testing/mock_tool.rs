//! Mock media tool for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::progress::{ProgressEvent, ProgressTracker};
use crate::tool::{Invocation, MediaTool, ToolError};

/// A recorded `run` call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRun {
    /// The command that would have been spawned.
    pub invocation: Invocation,
    /// The progress total it was given.
    pub total_secs: Option<u64>,
    /// Whether the run succeeded.
    pub success: bool,
}

/// Mock implementation of the MediaTool trait.
///
/// Provides controllable behavior for testing:
/// - Scripted probe reports per input
/// - Scripted status output fed through a real [`ProgressTracker`]
/// - Recorded probes and runs for assertions
/// - Injected failures
///
/// # Example
///
/// ```rust,ignore
/// use recoder_core::testing::MockMediaTool;
///
/// let tool = MockMediaTool::new();
/// tool.set_probe_output("in.ts", "Stream #0:0: Video: h264").await;
///
/// let report = tool.probe(&invocation).await?;
/// assert_eq!(tool.probe_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockMediaTool {
    /// Probe reports keyed by input path.
    probe_outputs: Arc<RwLock<HashMap<String, String>>>,
    /// Report for inputs without a scripted one.
    default_probe_output: Arc<RwLock<Option<String>>>,
    /// Raw status bytes replayed on every run.
    run_output: Arc<RwLock<Vec<u8>>>,
    /// Probed invocations.
    probes: Arc<RwLock<Vec<Invocation>>>,
    /// Run invocations.
    runs: Arc<RwLock<Vec<RecordedRun>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ToolError>>>,
}

impl Default for MockMediaTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaTool {
    /// Create a new mock tool.
    pub fn new() -> Self {
        Self {
            probe_outputs: Arc::new(RwLock::new(HashMap::new())),
            default_probe_output: Arc::new(RwLock::new(None)),
            run_output: Arc::new(RwLock::new(Vec::new())),
            probes: Arc::new(RwLock::new(Vec::new())),
            runs: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the probe report for a specific input.
    pub async fn set_probe_output(&self, input: impl Into<String>, report: impl Into<String>) {
        self.probe_outputs
            .write()
            .await
            .insert(input.into(), report.into());
    }

    /// Set the report for inputs without a scripted one.
    pub async fn set_default_probe_output(&self, report: impl Into<String>) {
        *self.default_probe_output.write().await = Some(report.into());
    }

    /// Set the status bytes every run writes.
    pub async fn set_run_output(&self, bytes: Vec<u8>) {
        *self.run_output.write().await = bytes;
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ToolError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all probed invocations.
    pub async fn recorded_probes(&self) -> Vec<Invocation> {
        self.probes.read().await.clone()
    }

    /// Get the number of probes performed.
    pub async fn probe_count(&self) -> usize {
        self.probes.read().await.len()
    }

    /// Get all recorded runs.
    pub async fn recorded_runs(&self) -> Vec<RecordedRun> {
        self.runs.read().await.clone()
    }

    async fn take_error(&self) -> Option<ToolError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MediaTool for MockMediaTool {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, invocation: &Invocation) -> Result<String, ToolError> {
        self.probes.write().await.push(invocation.clone());

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        let input = invocation.args.last().cloned().unwrap_or_default();
        if let Some(report) = self.probe_outputs.read().await.get(&input) {
            return Ok(report.clone());
        }
        if let Some(report) = self.default_probe_output.read().await.as_ref() {
            return Ok(report.clone());
        }

        Err(ToolError::failed(
            invocation.to_string(),
            Some(1),
            Some(format!("{}: No such file or directory", input)),
        ))
    }

    async fn run(
        &self,
        invocation: &Invocation,
        total_secs: Option<u64>,
        progress_tx: Option<mpsc::Sender<ProgressEvent>>,
    ) -> Result<(), ToolError> {
        let error = self.take_error().await;

        if error.is_none() {
            let mut tracker = ProgressTracker::new(total_secs);
            let events = tracker.feed(&self.run_output.read().await);
            tracker.finish();

            if let Some(tx) = progress_tx {
                for event in events {
                    let _ = tx.send(event).await;
                }
            }
        }

        self.runs.write().await.push(RecordedRun {
            invocation: invocation.clone(),
            total_secs,
            success: error.is_none(),
        });

        match error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn validate(&self) -> Result<(), ToolError> {
        match self.take_error().await {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
