//! Time code conversion and trim periods.
//!
//! Time codes are colon-separated `[[hh:]mm:]ss` values. Fields are not
//! clamped to their conventional ranges, so `01:90` is a legal way to write
//! two and a half minutes.

use thiserror::Error;

/// Errors raised when a time code cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimecodeError {
    /// A field was empty or not a non-negative integer.
    #[error("Invalid time code '{input}': field '{field}' is not a number")]
    InvalidField { input: String, field: String },

    /// The end of a trim period lies before its beginning.
    #[error("Trim end '{end}' is before begin '{begin}'")]
    EndBeforeBegin { begin: String, end: String },

    /// The value does not fit in the seconds counter.
    #[error("Time code '{input}' is out of range")]
    Overflow { input: String },
}

/// Converts a time code such as `01:05:27` to seconds.
///
/// The rightmost field is seconds, and every field to its left is worth 60
/// times the one after it.
pub fn to_seconds(timecode: &str) -> Result<u64, TimecodeError> {
    let mut total: u64 = 0;
    let mut place: u64 = 1;

    for field in timecode.rsplit(':') {
        let trimmed = field.trim();
        let value: u64 = trimmed.parse().map_err(|_| TimecodeError::InvalidField {
            input: timecode.to_string(),
            field: field.to_string(),
        })?;

        let overflow = || TimecodeError::Overflow {
            input: timecode.to_string(),
        };
        total = value
            .checked_mul(place)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(overflow)?;
        place = place.saturating_mul(60);
    }

    Ok(total)
}

/// Formats seconds as `HH:MM:SS`.
///
/// Always three fields, each padded to at least two digits.
pub fn from_seconds(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Portion of the input to process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrimPeriod {
    /// Where to start reading the input, as given by the user.
    pub begin: Option<String>,
    /// How much of the input to process, starting at `begin`.
    pub period: Option<String>,
}

impl TrimPeriod {
    /// Builds a trim period from optional begin and end time codes.
    ///
    /// With both bounds the period is their difference. With only an end the
    /// period is the end itself (reading starts at zero). A begin alone
    /// trims only the start and leaves the period open.
    pub fn from_bounds(begin: Option<&str>, end: Option<&str>) -> Result<Self, TimecodeError> {
        if let Some(b) = begin {
            to_seconds(b)?;
        }

        let period = match (begin, end) {
            (Some(b), Some(e)) => {
                let start = to_seconds(b)?;
                let stop = to_seconds(e)?;
                if stop < start {
                    return Err(TimecodeError::EndBeforeBegin {
                        begin: b.to_string(),
                        end: e.to_string(),
                    });
                }
                Some(from_seconds(stop - start))
            }
            (None, Some(e)) => {
                to_seconds(e)?;
                Some(e.to_string())
            }
            _ => None,
        };

        Ok(Self {
            begin: begin.map(str::to_string),
            period,
        })
    }

    /// Length of the period in seconds, if one is set.
    pub fn total_secs(&self) -> Option<u64> {
        self.period.as_deref().and_then(|p| to_seconds(p).ok())
    }

    /// Whether neither bound was given.
    pub fn is_unbounded(&self) -> bool {
        self.begin.is_none() && self.period.is_none()
    }
}
