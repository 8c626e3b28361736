//! Turning classified streams into an output mapping.

use serde::{Deserialize, Serialize};

use super::policy::SelectionPolicy;
use super::types::{StreamKind, StreamRecord};

/// Stream indices chosen explicitly by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplicitStreams {
    pub video: Option<u32>,
    pub audio: Option<u32>,
    pub subtitle: Option<u32>,
}

impl ExplicitStreams {
    /// Whether every kind was chosen, making a probe pointless.
    pub fn is_complete(&self) -> bool {
        self.video.is_some() && self.audio.is_some() && self.subtitle.is_some()
    }

    fn get(&self, kind: StreamKind) -> Option<u32> {
        match kind {
            StreamKind::Video => self.video,
            StreamKind::Audio => self.audio,
            StreamKind::Subtitle => self.subtitle,
        }
    }
}

/// Streams mapped into the output, in video, audio, subtitle order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMapping {
    pub video: Vec<u32>,
    pub audio: Vec<u32>,
    pub subtitle: Vec<u32>,
}

impl StreamMapping {
    /// Mapping made only of the explicit choices.
    pub fn from_explicit(explicit: ExplicitStreams) -> Self {
        Self {
            video: explicit.video.into_iter().collect(),
            audio: explicit.audio.into_iter().collect(),
            subtitle: explicit.subtitle.into_iter().collect(),
        }
    }

    /// Combines explicit choices with auto-detected streams.
    ///
    /// An explicit choice for a kind is the only stream of that kind.
    /// Otherwise the first qualifying streams are taken up to the policy's
    /// cap; any further ones are ignored. An index is never mapped twice.
    pub fn select(records: &[StreamRecord], explicit: ExplicitStreams, policy: &SelectionPolicy) -> Self {
        let mut mapping = Self::default();

        for kind in [StreamKind::Video, StreamKind::Audio, StreamKind::Subtitle] {
            let chosen = match explicit.get(kind) {
                Some(index) => vec![index],
                None => records
                    .iter()
                    .filter(|r| r.kind == kind && !mapping.contains(r.index))
                    .map(|r| r.index)
                    .take(policy.max_streams(kind))
                    .collect(),
            };

            for index in chosen {
                if !mapping.contains(index) {
                    mapping.slot_mut(kind).push(index);
                }
            }
        }

        mapping
    }

    /// Whether `index` is already mapped.
    pub fn contains(&self, index: u32) -> bool {
        self.video.contains(&index) || self.audio.contains(&index) || self.subtitle.contains(&index)
    }

    /// Whether nothing is mapped; ffmpeg then picks its own defaults.
    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty() && self.subtitle.is_empty()
    }

    /// All mapped streams with their kind, in output order.
    pub fn entries(&self) -> impl Iterator<Item = (StreamKind, u32)> + '_ {
        self.video
            .iter()
            .map(|i| (StreamKind::Video, *i))
            .chain(self.audio.iter().map(|i| (StreamKind::Audio, *i)))
            .chain(self.subtitle.iter().map(|i| (StreamKind::Subtitle, *i)))
    }

    fn slot_mut(&mut self, kind: StreamKind) -> &mut Vec<u32> {
        match kind {
            StreamKind::Video => &mut self.video,
            StreamKind::Audio => &mut self.audio,
            StreamKind::Subtitle => &mut self.subtitle,
        }
    }
}
