//! Job orchestration over a [`MediaTool`].

use std::io;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::types::{JobError, TranscodeRequest};
use crate::config::Config;
use crate::output::{concat_list_named, resolve_output_path, ConcatPlan};
use crate::progress::ProgressEvent;
use crate::streams::{Classification, StreamClassifier, StreamMapping};
use crate::tool::{
    probe_args, ConcatJob, Invocation, MediaTool, ToolError, TranscodeJob, VideoCodec,
};

/// Plans and runs probe, transcode and concat jobs.
pub struct JobRunner<T: MediaTool> {
    config: Config,
    classifier: StreamClassifier,
    tool: T,
}

impl<T: MediaTool> JobRunner<T> {
    pub fn new(config: Config, tool: T) -> Self {
        let classifier = StreamClassifier::new(config.selection.clone());
        Self {
            config,
            classifier,
            tool,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// The ffprobe command for `input`.
    pub fn probe_invocation(&self, input: &str) -> Invocation {
        Invocation::new(&self.config.tools.ffprobe_path, probe_args(input))
    }

    /// Probes `input` and classifies its streams.
    pub async fn list_streams(
        &self,
        input: &str,
        verbose: bool,
    ) -> Result<Classification, JobError> {
        let invocation = self.probe_invocation(input);
        let report = self
            .tool
            .probe(&invocation)
            .await
            .map_err(|source| JobError::ProbeFailed {
                input: input.to_string(),
                source,
            })?;

        let classification = self.classifier.classify(&report, verbose);
        debug!(
            input = %input,
            streams = classification.streams.len(),
            "Classified streams"
        );
        Ok(classification)
    }

    /// Works out the output path and stream mapping for one input.
    ///
    /// The input is probed only when auto-selection is requested and some
    /// kind was not chosen explicitly.
    pub async fn plan_transcode(
        &self,
        input: &str,
        request: &TranscodeRequest,
    ) -> Result<TranscodeJob, JobError> {
        let output = resolve_output_path(&request.output, input);

        let mapping = if request.needs_probe() {
            let classification = self.list_streams(input, false).await?;
            StreamMapping::select(
                &classification.streams,
                request.explicit,
                self.classifier.policy(),
            )
        } else {
            StreamMapping::from_explicit(request.explicit)
        };

        let video_codec = if request.transcode_video {
            VideoCodec::Encode(self.config.transcode.video_codec.clone())
        } else {
            VideoCodec::Copy
        };

        debug!(
            input = %input,
            output = %output,
            mapping = ?mapping,
            trimmed = !request.trim.is_unbounded(),
            "Planned transcode"
        );

        Ok(TranscodeJob {
            input: input.to_string(),
            output,
            begin: request.trim.begin.clone(),
            period: request.trim.period.clone(),
            mapping,
            video_codec,
        })
    }

    /// The ffmpeg command for a planned transcode.
    pub fn transcode_invocation(&self, job: &TranscodeJob) -> Invocation {
        Invocation::new(
            &self.config.tools.ffmpeg_path,
            job.ffmpeg_args(&self.config.tools.extra_ffmpeg_args),
        )
    }

    /// Runs a planned transcode. Progress is measured against the trim
    /// period when one is set.
    pub async fn transcode(
        &self,
        job: &TranscodeJob,
        progress_tx: Option<mpsc::Sender<ProgressEvent>>,
    ) -> Result<(), JobError> {
        let invocation = self.transcode_invocation(job);
        info!(input = %job.input, output = %job.output, "Transcoding");

        self.tool
            .run(&invocation, job.total_secs(), progress_tx)
            .await
            .map_err(|source| JobError::TranscodeFailed {
                input: job.input.clone(),
                source,
            })?;

        info!(output = %job.output, "Transcode finished");
        Ok(())
    }

    /// Builds the concat plan for `inputs`.
    pub fn plan_concat(
        &self,
        output: Option<&str>,
        inputs: &[String],
    ) -> Result<ConcatPlan, JobError> {
        if inputs.is_empty() {
            return Err(JobError::NoInputs);
        }
        Ok(concat_list_named(
            output,
            inputs,
            &self.config.concat.base_name,
        ))
    }

    /// The ffmpeg command joining the files listed at `list_path`.
    pub fn concat_invocation(&self, list_path: &Path, plan: &ConcatPlan) -> Invocation {
        let job = ConcatJob::new(list_path, plan.output.clone());
        Invocation::new(
            &self.config.tools.ffmpeg_path,
            job.ffmpeg_args(&self.config.tools.extra_ffmpeg_args),
        )
    }

    /// Writes the list file, runs the concat and removes the list file.
    pub async fn concat(
        &self,
        plan: &ConcatPlan,
        progress_tx: Option<mpsc::Sender<ProgressEvent>>,
    ) -> Result<(), JobError> {
        let list = plan.write_list()?;
        let invocation = self.concat_invocation(list.path(), plan);
        info!(output = %plan.output, inputs = plan.entries.len(), "Concatenating");

        let result = self.tool.run(&invocation, None, progress_tx).await;
        finish_concat(result, list.close())?;
        info!(output = %plan.output, "Concatenation finished");
        Ok(())
    }
}

/// Combines the concat run with the list cleanup. A failed run wins over
/// a failed cleanup.
fn finish_concat(
    run: Result<(), ToolError>,
    cleanup: io::Result<()>,
) -> Result<(), JobError> {
    match (run, cleanup) {
        (Err(source), Err(e)) => {
            warn!(error = %e, "Failed to remove concat list");
            Err(JobError::ConcatFailed { source })
        }
        (Err(source), Ok(())) => Err(JobError::ConcatFailed { source }),
        (Ok(()), cleanup) => Ok(cleanup?),
    }
}
