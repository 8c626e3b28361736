//! Progress tracking for running ffmpeg jobs.
//!
//! ffmpeg announces the input's `Duration:` once and then keeps rewriting a
//! status line carrying `time=HH:MM:SS.ff`. [`ProgressTracker`] consumes
//! that output byte by byte and turns it into [`ProgressEvent`]s.
//!
//! # Example
//!
//! ```
//! use recoder_core::progress::{ProgressEvent, ProgressTracker};
//!
//! let mut tracker = ProgressTracker::new(Some(60));
//! let events = tracker.feed(b"frame=1 time=00:00:30.00 bitrate=N/A\r");
//! assert!(matches!(events[0], ProgressEvent::Progress { percent, .. } if percent == 50.0));
//! ```

mod line_buffer;
mod tracker;

pub use line_buffer::{Feed, LineBuffer};
pub use tracker::{ProgressEvent, ProgressTracker};
