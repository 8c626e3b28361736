//! ffmpeg and ffprobe command lines.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::streams::{StreamKind, StreamMapping};
use crate::timecode::to_seconds;

/// A program plus its arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Program file name, for messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }
}

impl fmt::Display for Invocation {
    /// Renders the command so it can be pasted into a POSIX shell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// How the video stream is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoCodec {
    /// Bit-exact passthrough.
    Copy,
    /// Re-encode with the named encoder.
    Encode(String),
}

impl VideoCodec {
    /// Returns the ffmpeg codec name.
    pub fn ffmpeg_codec(&self) -> &str {
        match self {
            Self::Copy => "copy",
            Self::Encode(codec) => codec,
        }
    }
}

/// Arguments for probing `input`; the report comes on stderr.
pub fn probe_args(input: &str) -> Vec<String> {
    vec![input.to_string()]
}

/// A single-input extraction/trim/transcode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeJob {
    pub input: String,
    pub output: String,
    /// Seek position, passed before the input.
    pub begin: Option<String>,
    /// Amount of input to process.
    pub period: Option<String>,
    pub mapping: StreamMapping,
    pub video_codec: VideoCodec,
}

impl TranscodeJob {
    /// Seconds of output expected, when a period is set.
    pub fn total_secs(&self) -> Option<u64> {
        self.period.as_deref().and_then(|p| to_seconds(p).ok())
    }

    /// Builds ffmpeg arguments; `extra` goes just before the output.
    pub fn ffmpeg_args(&self, extra: &[String]) -> Vec<String> {
        // Overwrite existing output
        let mut args = vec!["-y".to_string()];

        if let Some(ref begin) = self.begin {
            args.extend(["-ss".to_string(), begin.clone()]);
        }

        args.extend(["-i".to_string(), self.input.clone()]);

        for (kind, index) in self.mapping.entries() {
            let codec = match kind {
                StreamKind::Video => self.video_codec.ffmpeg_codec(),
                _ => "copy",
            };
            args.extend([
                "-map".to_string(),
                format!("0:{}", index),
                kind.codec_flag().to_string(),
                codec.to_string(),
            ]);
        }

        if let Some(ref period) = self.period {
            args.extend(["-t".to_string(), period.clone()]);
        }

        args.extend(extra.iter().cloned());
        args.push(self.output.clone());
        args
    }
}

/// Joining the files named in a concat list, without re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatJob {
    pub list_path: PathBuf,
    pub output: String,
}

impl ConcatJob {
    pub fn new(list_path: &Path, output: impl Into<String>) -> Self {
        Self {
            list_path: list_path.to_path_buf(),
            output: output.into(),
        }
    }

    /// Builds ffmpeg arguments; `extra` goes just before the output.
    pub fn ffmpeg_args(&self, extra: &[String]) -> Vec<String> {
        let mut args: Vec<String> = ["-f", "concat", "-safe", "0", "-i"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.push(self.list_path.to_string_lossy().into_owned());
        args.extend(["-c".to_string(), "copy".to_string()]);
        args.extend(extra.iter().cloned());
        args.push(self.output.clone());
        args
    }
}
