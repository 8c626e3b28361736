//! Percentage tracking over ffmpeg's status output.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;

use super::line_buffer::{Feed, LineBuffer};
use crate::timecode::to_seconds;

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time=([0-9]{2}:[0-9]{2}:[0-9]{2})\.[0-9]{2}").expect("time pattern is valid")
});

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duration: ([0-9]{2}:[0-9]{2}:[0-9]{2})\.[0-9]{2}")
        .expect("duration pattern is valid")
});

/// Something worth reporting from the status stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A status line with a known total.
    Progress { percent: f64, line: String },
    /// A status line seen before any total is known.
    Status { line: String },
    /// The input's run time was announced and is now the total.
    RunTimeDiscovered { run_time: String, total_secs: u64 },
}

/// Tracks progress of one ffmpeg run.
///
/// The total is either supplied up front (the trim period) or taken from
/// the first `Duration:` announcement. Once set it never changes.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    lines: LineBuffer,
    total_secs: Option<u64>,
}

impl ProgressTracker {
    /// Creates a tracker. A zero total counts as unknown.
    pub fn new(total_secs: Option<u64>) -> Self {
        Self {
            lines: LineBuffer::new(),
            total_secs: total_secs.filter(|t| *t > 0),
        }
    }

    /// The known or inferred total, in seconds.
    pub fn total_secs(&self) -> Option<u64> {
        self.total_secs
    }

    /// Pushes one byte, returning an event when it completes a line of
    /// interest.
    pub fn push(&mut self, byte: u8) -> Option<ProgressEvent> {
        match self.lines.push(byte) {
            Feed::LineReady(line) => self.on_line(line),
            Feed::Accumulating => None,
        }
    }

    /// Pushes a chunk of bytes, returning events in order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<ProgressEvent> {
        bytes.iter().filter_map(|b| self.push(*b)).collect()
    }

    /// Ends the stream; an unterminated last line is discarded.
    pub fn finish(&mut self) {
        self.lines.clear();
    }

    /// Evaluates one complete line, for callers doing their own splitting.
    pub fn on_line(&mut self, line: String) -> Option<ProgressEvent> {
        if let Some(caps) = TIME_PATTERN.captures(&line) {
            return match self.total_secs {
                Some(total) => {
                    let elapsed = caps.get(1).and_then(|m| to_seconds(m.as_str()).ok())?;
                    let percent = elapsed as f64 * 100.0 / total as f64;
                    Some(ProgressEvent::Progress { percent, line })
                }
                None => Some(ProgressEvent::Status { line }),
            };
        }

        if self.total_secs.is_some() {
            return None;
        }

        let caps = DURATION_PATTERN.captures(&line)?;
        let run_time = caps.get(1)?.as_str().to_string();
        let total = to_seconds(&run_time).ok().filter(|t| *t > 0)?;
        self.total_secs = Some(total);
        tracing::debug!(run_time = %run_time, total_secs = total, "Run time discovered");

        Some(ProgressEvent::RunTimeDiscovered {
            run_time,
            total_secs: total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str =
        "frame=  250 fps=0.0 q=-1.0 size=    2048kB time=00:00:05.00 bitrate=3355.4kbits/s speed=10x";

    #[test]
    fn test_progress_with_supplied_total() {
        let mut tracker = ProgressTracker::new(Some(10));
        let events = tracker.feed(format!("{}\r", STATUS).as_bytes());
        assert_eq!(
            events,
            vec![ProgressEvent::Progress {
                percent: 50.0,
                line: STATUS.to_string(),
            }]
        );
    }

    #[test]
    fn test_duration_is_discovered_then_used() {
        let mut tracker = ProgressTracker::new(None);
        let stream = format!(
            "Input #0, mpegts, from 'in.m2t':\n  Duration: 00:00:10.00, start: 1.4, bitrate: 2500 kb/s\n{}\r",
            STATUS
        );
        let events = tracker.feed(stream.as_bytes());
        assert_eq!(
            events,
            vec![
                ProgressEvent::RunTimeDiscovered {
                    run_time: "00:00:10".to_string(),
                    total_secs: 10,
                },
                ProgressEvent::Progress {
                    percent: 50.0,
                    line: STATUS.to_string(),
                },
            ]
        );
        assert_eq!(tracker.total_secs(), Some(10));
    }

    #[test]
    fn test_status_without_total() {
        let mut tracker = ProgressTracker::new(None);
        let events = tracker.feed(format!("{}\r", STATUS).as_bytes());
        assert_eq!(
            events,
            vec![ProgressEvent::Status {
                line: STATUS.to_string(),
            }]
        );
    }

    #[test]
    fn test_supplied_total_is_not_overwritten() {
        let mut tracker = ProgressTracker::new(Some(20));
        let events = tracker.feed(b"  Duration: 01:00:00.00, start: 0\n");
        assert!(events.is_empty());
        assert_eq!(tracker.total_secs(), Some(20));
    }

    #[test]
    fn test_only_first_duration_counts() {
        let mut tracker = ProgressTracker::new(None);
        let events = tracker.feed(b"Duration: 00:01:00.00\nDuration: 00:02:00.00\n");
        assert_eq!(events.len(), 1);
        assert_eq!(tracker.total_secs(), Some(60));
    }

    #[test]
    fn test_zero_total_counts_as_unknown() {
        let mut tracker = ProgressTracker::new(Some(0));
        assert_eq!(tracker.total_secs(), None);
        let events = tracker.feed(b"Duration: 00:00:00.00\nDuration: 00:00:08.00\n");
        assert_eq!(
            events,
            vec![ProgressEvent::RunTimeDiscovered {
                run_time: "00:00:08".to_string(),
                total_secs: 8,
            }]
        );
    }

    #[test]
    fn test_garbage_is_ignored() {
        let mut tracker = ProgressTracker::new(None);
        let events = tracker.feed(b"time=5\nDuration: N/A, bitrate: N/A\n\r\r\xff\xfe\n");
        assert!(events.is_empty());
        assert_eq!(tracker.total_secs(), None);
    }

    #[test]
    fn test_unterminated_line_is_dropped() {
        let mut tracker = ProgressTracker::new(Some(10));
        let events = tracker.feed(STATUS.as_bytes());
        assert!(events.is_empty());
        tracker.finish();
        assert!(tracker.feed(b"\n").is_empty());
    }

    #[test]
    fn test_percent_past_total_is_not_clamped() {
        let mut tracker = ProgressTracker::new(Some(4));
        let events = tracker.feed(format!("{}\n", STATUS).as_bytes());
        match &events[0] {
            ProgressEvent::Progress { percent, .. } => assert_eq!(*percent, 125.0),
            other => panic!("expected progress, got {:?}", other),
        }
    }
}
