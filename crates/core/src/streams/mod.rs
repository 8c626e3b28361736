//! Stream discovery from ffprobe output.
//!
//! ffprobe reports the streams of a container as loosely structured text
//! on its diagnostic channel. This module picks the `Stream #...` lines
//! out of that text, applies a [`SelectionPolicy`] (codec prefixes,
//! language tags, exclusion markers) and turns the survivors into a
//! [`StreamMapping`] capped at one video, two audio and one subtitle
//! stream by default.
//!
//! # Example
//!
//! ```
//! use recoder_core::streams::{ExplicitStreams, StreamClassifier, StreamMapping};
//!
//! let probe = "Stream #0:0(eng): Video: h264 (High)\nStream #0:1(eng): Audio: ac3, 48000 Hz";
//! let classifier = StreamClassifier::default();
//! let found = classifier.classify(probe, false);
//! let mapping = StreamMapping::select(&found.streams, ExplicitStreams::default(), classifier.policy());
//! assert_eq!(mapping.video, vec![0]);
//! assert_eq!(mapping.audio, vec![1]);
//! ```

mod parser;
mod policy;
mod selection;
mod types;

pub use parser::{parse_stream_line, StreamClassifier};
pub use policy::SelectionPolicy;
pub use selection::{ExplicitStreams, StreamMapping};
pub use types::{Classification, StreamFields, StreamKind, StreamLine, StreamRecord};
