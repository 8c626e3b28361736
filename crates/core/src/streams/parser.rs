//! Parsing of ffprobe stream lines.
//!
//! ffprobe has no fixed layout for stream descriptions. Some samples:
//!
//! ```text
//! Stream #0:0[0xd3]: Video: h264 (High) ([27][0][0][0] / 0x001B), yuv420p(tv, bt470bg), 704x576
//! Stream #0:1[0xdd](dan): Audio: aac_latm (HE-AAC) ([17][0][0][0] / 0x0011), 48000 Hz, stereo, fltp
//! Stream #0:4[0xec](dan): Subtitle: dvb_subtitle ([6][0][0][0] / 0x0006) (hearing impaired)
//! Stream #0:1(eng): Audio: aac (LC), 48000 Hz, mono, fltp (default)
//! Stream #0:2[0x1200]: Subtitle: hdmv_pgs_subtitle ([144][0][0][0] / 0x0090), 1920x1080
//! ```

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::policy::SelectionPolicy;
use super::types::{Classification, StreamFields, StreamLine, StreamRecord};

static STREAM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*Stream #[0-9]+:([0-9]+)(?:\[[0-9A-Za-z_]+\])?(?:\(([^)]+)\))?: (Video|Audio|Subtitle): (.+)$",
    )
    .expect("stream line pattern is valid")
});

/// Matches one line against the stream grammar.
///
/// Lines that only resemble a stream line (unknown kind, missing codec
/// text, malformed index) yield [`StreamLine::NoMatch`].
pub fn parse_stream_line(line: &str) -> StreamLine {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(caps) = STREAM_LINE.captures(line) else {
        return StreamLine::NoMatch;
    };

    let Some(index) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
        return StreamLine::NoMatch;
    };

    let fields = StreamFields {
        index,
        language: caps.get(2).map(|m| m.as_str().to_string()),
        remainder: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
    };

    match caps.get(3).map(|m| m.as_str()) {
        Some("Video") => StreamLine::Video(fields),
        Some("Audio") => StreamLine::Audio(fields),
        Some("Subtitle") => StreamLine::Subtitle(fields),
        _ => StreamLine::NoMatch,
    }
}

/// Classifies probe output line by line.
#[derive(Debug, Clone, Default)]
pub struct StreamClassifier {
    policy: SelectionPolicy,
}

impl StreamClassifier {
    /// Creates a classifier applying `policy`.
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Returns every qualifying stream in listing order.
    ///
    /// No caps are applied here; three qualifying audio streams give three
    /// records. With `verbose`, every matched line is also collected in
    /// [`Classification::echoed`] before filtering.
    pub fn classify(&self, probe_output: &str, verbose: bool) -> Classification {
        let mut result = Classification::default();

        for line in probe_output.lines() {
            let parsed = parse_stream_line(line);
            let Some((kind, fields)) = parsed.parts() else {
                continue;
            };

            if verbose {
                result.echoed.push(line.trim().to_string());
            }

            if !self.policy.accepts(kind, fields) {
                continue;
            }

            if result.streams.iter().any(|s| s.index == fields.index) {
                tracing::warn!(index = fields.index, "Duplicate stream index in probe output");
                continue;
            }

            result.streams.push(StreamRecord {
                kind,
                index: fields.index,
                language: fields.language.clone(),
                description: self
                    .policy
                    .keeps_description(kind)
                    .then(|| fields.remainder.clone()),
            });
        }

        result
    }
}
