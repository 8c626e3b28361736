//! Probe, transcode and concat jobs.

mod runner;
mod types;

pub use runner::JobRunner;
pub use types::{JobError, TranscodeRequest};
