//! Inclusion policy for probed streams.

use serde::{Deserialize, Serialize};

use super::types::{StreamFields, StreamKind};

/// Which streams are worth carrying into the output, per kind.
///
/// Codec lists are matched as prefixes of the stream description, so
/// `aac` also admits `aac_latm`. An empty language list accepts every
/// language; a stream without a language tag is always accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    #[serde(default = "default_video_codecs")]
    pub video_codecs: Vec<String>,

    #[serde(default = "default_audio_codecs")]
    pub audio_codecs: Vec<String>,

    #[serde(default = "default_audio_languages")]
    pub audio_languages: Vec<String>,

    #[serde(default = "default_subtitle_codecs")]
    pub subtitle_codecs: Vec<String>,

    /// Subtitles whose description contains any of these are skipped.
    #[serde(default = "default_subtitle_excludes")]
    pub subtitle_excludes: Vec<String>,

    /// Most video streams to map.
    #[serde(default = "default_max_video")]
    pub max_video: usize,

    /// Most audio streams to map (e.g. a stereo and a 5.1 track).
    #[serde(default = "default_max_audio")]
    pub max_audio: usize,

    /// Most subtitle streams to map.
    #[serde(default = "default_max_subtitle")]
    pub max_subtitle: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_video_codecs() -> Vec<String> {
    strings(&["h264"])
}

fn default_audio_codecs() -> Vec<String> {
    strings(&["aac", "ac3", "mp3"])
}

fn default_audio_languages() -> Vec<String> {
    strings(&["dan", "eng"])
}

fn default_subtitle_codecs() -> Vec<String> {
    strings(&["dvb_subtitle", "subrip"])
}

fn default_subtitle_excludes() -> Vec<String> {
    strings(&["hearing impaired"])
}

fn default_max_video() -> usize {
    1
}

fn default_max_audio() -> usize {
    2
}

fn default_max_subtitle() -> usize {
    1
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            video_codecs: default_video_codecs(),
            audio_codecs: default_audio_codecs(),
            audio_languages: default_audio_languages(),
            subtitle_codecs: default_subtitle_codecs(),
            subtitle_excludes: default_subtitle_excludes(),
            max_video: default_max_video(),
            max_audio: default_max_audio(),
            max_subtitle: default_max_subtitle(),
        }
    }
}

impl SelectionPolicy {
    /// Codec prefixes accepted for `kind`.
    pub fn codecs(&self, kind: StreamKind) -> &[String] {
        match kind {
            StreamKind::Video => &self.video_codecs,
            StreamKind::Audio => &self.audio_codecs,
            StreamKind::Subtitle => &self.subtitle_codecs,
        }
    }

    /// Languages accepted for `kind`; empty means any.
    pub fn languages(&self, kind: StreamKind) -> &[String] {
        match kind {
            StreamKind::Audio => &self.audio_languages,
            StreamKind::Video | StreamKind::Subtitle => &[],
        }
    }

    /// Description markers that disqualify a stream of `kind`.
    pub fn excludes(&self, kind: StreamKind) -> &[String] {
        match kind {
            StreamKind::Subtitle => &self.subtitle_excludes,
            StreamKind::Video | StreamKind::Audio => &[],
        }
    }

    /// Cap on streams of `kind` in a mapping.
    pub fn max_streams(&self, kind: StreamKind) -> usize {
        match kind {
            StreamKind::Video => self.max_video,
            StreamKind::Audio => self.max_audio,
            StreamKind::Subtitle => self.max_subtitle,
        }
    }

    /// Whether the description is kept on the record.
    pub fn keeps_description(&self, kind: StreamKind) -> bool {
        kind == StreamKind::Audio
    }

    /// Applies the policy to one parsed line.
    pub fn accepts(&self, kind: StreamKind, fields: &StreamFields) -> bool {
        let languages = self.languages(kind);
        let language_ok = match &fields.language {
            None => true,
            Some(lang) => languages.is_empty() || languages.iter().any(|l| l == lang),
        };

        let codec_ok = self
            .codecs(kind)
            .iter()
            .any(|codec| fields.remainder.starts_with(codec.as_str()));

        let excluded = self
            .excludes(kind)
            .iter()
            .any(|marker| fields.remainder.contains(marker.as_str()));

        language_ok && codec_ok && !excluded
    }
}
