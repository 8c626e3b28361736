//! Types for the streams module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media kind of an elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
}

impl StreamKind {
    /// Lowercase name, as shown in listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
        }
    }

    /// The codec option ffmpeg uses for this kind.
    pub fn codec_flag(&self) -> &'static str {
        match self {
            Self::Video => "-vcodec",
            Self::Audio => "-acodec",
            Self::Subtitle => "-scodec",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Fields captured from one `Stream #...` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFields {
    /// Stream index within the container.
    pub index: u32,
    /// Language tag without parentheses, e.g. `eng`.
    pub language: Option<String>,
    /// Everything after `<Kind>: `, starting with the codec name.
    pub remainder: String,
}

/// Result of matching a single probe output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine {
    NoMatch,
    Video(StreamFields),
    Audio(StreamFields),
    Subtitle(StreamFields),
}

impl StreamLine {
    /// Kind and fields, or `None` for a non-matching line.
    pub fn parts(&self) -> Option<(StreamKind, &StreamFields)> {
        match self {
            Self::NoMatch => None,
            Self::Video(f) => Some((StreamKind::Video, f)),
            Self::Audio(f) => Some((StreamKind::Audio, f)),
            Self::Subtitle(f) => Some((StreamKind::Subtitle, f)),
        }
    }
}

/// A stream accepted by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub kind: StreamKind,
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Codec description, kept for audio so stereo and 5.1 tracks can be
    /// told apart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Output of classifying a whole probe report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Qualifying streams in the order they were listed.
    pub streams: Vec<StreamRecord>,
    /// Every matched stream line, trimmed; only filled when verbose.
    pub echoed: Vec<String>,
}
