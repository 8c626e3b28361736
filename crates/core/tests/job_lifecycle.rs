//! Job lifecycle integration tests.
//!
//! These tests drive the job runner with the mock tool:
//! - Listing streams with and without verbose echo
//! - Planning transcodes for several inputs from one request
//! - Progress events reaching a consumer task
//! - Concat list files and failure reporting

use tokio::sync::mpsc;

use recoder_core::{
    config::load_config_from_str,
    job::{JobError, JobRunner, TranscodeRequest},
    progress::ProgressEvent,
    streams::{ExplicitStreams, StreamKind},
    testing::{fixtures, MockMediaTool},
    timecode::TrimPeriod,
    tool::{ToolError, VideoCodec},
    Config,
};

/// Test helper holding a runner and a handle on its mock tool.
struct TestHarness {
    runner: JobRunner<MockMediaTool>,
    tool: MockMediaTool,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let tool = MockMediaTool::new();
        let runner = JobRunner::new(config, tool.clone());
        Self { runner, tool }
    }

    /// Runs a transcode and collects every progress event it produced.
    async fn transcode_collecting(
        &self,
        input: &str,
        request: &TranscodeRequest,
    ) -> (Result<(), JobError>, Vec<ProgressEvent>) {
        let job = self
            .runner
            .plan_transcode(input, request)
            .await
            .expect("plan succeeds");

        let (tx, mut rx) = mpsc::channel(64);
        let printer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(event) = rx.recv().await {
                seen.push(event);
            }
            seen
        });

        let result = self.runner.transcode(&job, Some(tx)).await;
        let events = printer.await.expect("printer task completes");
        (result, events)
    }
}

#[tokio::test]
async fn test_list_streams_of_dvb_recording() {
    let harness = TestHarness::new();
    harness
        .tool
        .set_probe_output("/film/news.m2t", fixtures::DVB_T_PROBE)
        .await;

    let listing = harness
        .runner
        .list_streams("/film/news.m2t", false)
        .await
        .unwrap();

    let kinds: Vec<(StreamKind, u32)> = listing.streams.iter().map(|s| (s.kind, s.index)).collect();
    assert_eq!(
        kinds,
        vec![
            (StreamKind::Video, 0),
            (StreamKind::Audio, 1),
            (StreamKind::Subtitle, 3),
        ]
    );
    assert!(listing.echoed.is_empty());
    assert_eq!(
        listing.streams[1].description.as_deref().map(|d| d.starts_with("aac_latm")),
        Some(true)
    );
}

#[tokio::test]
async fn test_verbose_listing_echoes_every_stream_line() {
    let harness = TestHarness::new();
    harness.tool.set_default_probe_output(fixtures::DVB_T_PROBE).await;

    let listing = harness.runner.list_streams("any.m2t", true).await.unwrap();
    assert_eq!(listing.echoed.len(), 5);
    assert!(listing.echoed.iter().all(|l| l.starts_with("Stream #0:")));
}

#[tokio::test]
async fn test_probe_failure_names_input() {
    let harness = TestHarness::new();

    let err = harness
        .runner
        .list_streams("/film/missing.ts", false)
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::ProbeFailed { ref input, .. } if input == "/film/missing.ts"));
    let stderr = err.tool_error().and_then(ToolError::stderr).unwrap_or_default();
    assert!(stderr.contains("No such file or directory"));
}

#[tokio::test]
async fn test_one_request_for_several_inputs() {
    let harness = TestHarness::new();
    harness.tool.set_default_probe_output(fixtures::DVD_RIP_PROBE).await;

    let request = TranscodeRequest::new("/tmp/.mkv")
        .with_auto_streams(true)
        .with_explicit(ExplicitStreams {
            audio: Some(2),
            ..Default::default()
        });

    let first = harness
        .runner
        .plan_transcode("/film/a.avi", &request)
        .await
        .unwrap();
    let second = harness
        .runner
        .plan_transcode("/film/b.avi", &request)
        .await
        .unwrap();

    assert_eq!(first.output, "/tmp/a.mkv");
    assert_eq!(second.output, "/tmp/b.mkv");
    assert_eq!(first.mapping.video, vec![0]);
    assert_eq!(first.mapping.audio, vec![2]);
    assert_eq!(first.mapping.subtitle, vec![3]);
    assert_eq!(first.video_codec, VideoCodec::Copy);
    assert_eq!(harness.tool.probe_count().await, 2);
}

#[tokio::test]
async fn test_selection_policy_from_config() {
    let config = load_config_from_str(
        r#"
[selection]
max_audio = 1
max_subtitle = 0

[transcode]
video_codec = "libx265"
"#,
    )
    .unwrap();
    let harness = TestHarness::with_config(config);
    harness.tool.set_default_probe_output(fixtures::DVD_RIP_PROBE).await;

    let request = TranscodeRequest::new("out.mkv")
        .with_auto_streams(true)
        .with_transcode_video(true);
    let job = harness.runner.plan_transcode("rip.mkv", &request).await.unwrap();

    assert_eq!(job.mapping.audio, vec![1]);
    assert!(job.mapping.subtitle.is_empty());

    let invocation = harness.runner.transcode_invocation(&job);
    let rendered = invocation.to_string();
    assert!(rendered.contains("-map 0:0 -vcodec libx265"));
    assert!(rendered.contains("-map 0:1 -acodec copy"));
}

#[tokio::test]
async fn test_progress_from_discovered_run_time() {
    let harness = TestHarness::new();
    harness
        .tool
        .set_run_output(fixtures::status_output(
            "00:00:20",
            &["00:00:05", "00:00:10", "00:00:20"],
        ))
        .await;

    let (result, events) = harness
        .transcode_collecting("in.ts", &TranscodeRequest::new("out.mkv"))
        .await;
    result.unwrap();

    assert_eq!(
        events[0],
        ProgressEvent::RunTimeDiscovered {
            run_time: "00:00:20".to_string(),
            total_secs: 20,
        }
    );
    let percents: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![25.0, 50.0, 100.0]);
}

#[tokio::test]
async fn test_trim_period_overrides_announced_run_time() {
    let harness = TestHarness::new();
    harness
        .tool
        .set_run_output(fixtures::status_output("01:00:00", &["00:00:30"]))
        .await;

    let trim = TrimPeriod::from_bounds(Some("00:10:00"), Some("00:11:00")).unwrap();
    let request = TranscodeRequest::new("out.mkv").with_trim(trim);
    let (result, events) = harness.transcode_collecting("in.ts", &request).await;
    result.unwrap();

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ProgressEvent::Progress { percent, .. } if percent == 50.0));

    let runs = harness.tool.recorded_runs().await;
    let args = &runs[0].invocation.args;
    assert_eq!(&args[..5], &["-y", "-ss", "00:10:00", "-i", "in.ts"]);
    assert_eq!(runs[0].total_secs, Some(60));
}

#[tokio::test]
async fn test_transcode_failure_is_reported() {
    let harness = TestHarness::new();
    harness
        .tool
        .set_next_error(ToolError::failed(
            "ffmpeg -y -i in.ts out.mkv",
            Some(1),
            Some("in.ts: Invalid data found when processing input".to_string()),
        ))
        .await;

    let (result, events) = harness
        .transcode_collecting("in.ts", &TranscodeRequest::new("out.mkv"))
        .await;

    assert!(events.is_empty());
    match result {
        Err(JobError::TranscodeFailed { input, source }) => {
            assert_eq!(input, "in.ts");
            assert!(source.to_string().contains("exit code '1'"));
        }
        other => panic!("expected TranscodeFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concat_with_configured_base_name() {
    let config = load_config_from_str("[concat]\nbase_name = \"joined\"\n").unwrap();
    let harness = TestHarness::with_config(config);

    let inputs = vec!["/film/part1.mts".to_string(), "/film/part2.mts".to_string()];
    let plan = harness.runner.plan_concat(Some("/tmp/"), &inputs).unwrap();
    assert_eq!(plan.output, "/tmp/joined.mts");
    assert_eq!(
        plan.list_contents(),
        "file '/film/part1.mts'\nfile '/film/part2.mts'\n"
    );

    harness.runner.concat(&plan, None).await.unwrap();

    let runs = harness.tool.recorded_runs().await;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].total_secs, None);
    assert_eq!(runs[0].invocation.args.last().map(String::as_str), Some("/tmp/joined.mts"));
}
