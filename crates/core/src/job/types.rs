//! Job request and error types.

use std::io;
use thiserror::Error;

use crate::streams::ExplicitStreams;
use crate::timecode::TrimPeriod;
use crate::tool::ToolError;

/// What the user asked for when transcoding one or more inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    /// Output spec, resolved per input.
    pub output: String,
    pub trim: TrimPeriod,
    pub explicit: ExplicitStreams,
    /// Probe the input and fill in the kinds not chosen explicitly.
    pub auto_streams: bool,
    /// Re-encode video instead of copying it.
    pub transcode_video: bool,
}

impl TranscodeRequest {
    /// Creates a request that copies everything ffmpeg picks by default.
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            trim: TrimPeriod::default(),
            explicit: ExplicitStreams::default(),
            auto_streams: false,
            transcode_video: false,
        }
    }

    pub fn with_trim(mut self, trim: TrimPeriod) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_explicit(mut self, explicit: ExplicitStreams) -> Self {
        self.explicit = explicit;
        self
    }

    pub fn with_auto_streams(mut self, auto_streams: bool) -> Self {
        self.auto_streams = auto_streams;
        self
    }

    pub fn with_transcode_video(mut self, transcode_video: bool) -> Self {
        self.transcode_video = transcode_video;
        self
    }

    /// Whether the input has to be probed before the job can be built.
    pub fn needs_probe(&self) -> bool {
        self.auto_streams && !self.explicit.is_complete()
    }
}

/// Errors from running jobs.
#[derive(Debug, Error)]
pub enum JobError {
    /// Probing an input failed.
    #[error("Probing '{input}' failed")]
    ProbeFailed {
        input: String,
        #[source]
        source: ToolError,
    },

    /// The ffmpeg run for an input failed.
    #[error("Transcoding '{input}' failed")]
    TranscodeFailed {
        input: String,
        #[source]
        source: ToolError,
    },

    /// The concat run failed.
    #[error("Concatenation failed")]
    ConcatFailed {
        #[source]
        source: ToolError,
    },

    /// The concat list file could not be written.
    #[error("Failed to write concat list")]
    ConcatList(#[from] io::Error),

    /// Nothing to work on.
    #[error("No input files given")]
    NoInputs,
}

impl JobError {
    /// The underlying tool error, if the failure came from a tool.
    pub fn tool_error(&self) -> Option<&ToolError> {
        match self {
            Self::ProbeFailed { source, .. }
            | Self::TranscodeFailed { source, .. }
            | Self::ConcatFailed { source } => Some(source),
            _ => None,
        }
    }
}
