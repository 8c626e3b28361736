pub mod config;
pub mod job;
pub mod output;
pub mod progress;
pub mod streams;
pub mod testing;
pub mod timecode;
pub mod tool;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, ConcatConfig,
    Config, ConfigError, TranscodeConfig,
};
pub use job::{JobError, JobRunner, TranscodeRequest};
pub use output::{concat_list, resolve_output_path, ConcatPlan};
pub use progress::{ProgressEvent, ProgressTracker};
pub use streams::{
    Classification, ExplicitStreams, SelectionPolicy, StreamClassifier, StreamKind, StreamMapping,
    StreamRecord,
};
pub use timecode::{from_seconds, to_seconds, TimecodeError, TrimPeriod};
pub use tool::{FfmpegTool, Invocation, MediaTool, ToolConfig, ToolError};
