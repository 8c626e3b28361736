//! Error types for the tool module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running ffmpeg or ffprobe.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The binary could not be found.
    #[error("{tool} not found at path: {path}")]
    NotFound { tool: String, path: PathBuf },

    /// The tool ran but did not exit cleanly.
    #[error("'{command}' returned {} while 0 was expected", describe_code(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// The tool exceeded the configured timeout and was killed.
    #[error("'{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// I/O error while talking to the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code '{}'", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ToolError {
    /// Creates a new failure error with optional stderr output.
    pub fn failed(command: impl Into<String>, code: Option<i32>, stderr: Option<String>) -> Self {
        Self::Failed {
            command: command.into(),
            code,
            stderr,
        }
    }

    /// Diagnostic output captured from the failed tool, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}
