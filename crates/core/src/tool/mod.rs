//! External tool supervision.
//!
//! Builds ffprobe and ffmpeg command lines and runs them. Probing returns
//! the tool's report. Transcoding and concatenation stream the tool's status
//! output through a [`ProgressTracker`](crate::progress::ProgressTracker).
//!
//! The [`MediaTool`] trait is the seam between job orchestration and the
//! processes; [`FfmpegTool`] is the real implementation and
//! [`MockMediaTool`](crate::testing::MockMediaTool) the scripted one.

mod command;
mod config;
mod error;
mod ffmpeg;
mod traits;

pub use command::{probe_args, ConcatJob, Invocation, TranscodeJob, VideoCodec};
pub use config::ToolConfig;
pub use error::ToolError;
pub use ffmpeg::FfmpegTool;
pub use traits::MediaTool;
