mod cli;
mod report;

use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recoder_core::{
    load_config_or_default, validate_config, FfmpegTool, JobError, JobRunner, MediaTool,
    TimecodeError, TranscodeRequest, TrimPeriod,
};

use cli::{Cli, Mode};

/// Usage error; help has been printed.
const EXIT_USAGE: i32 = 2;
const EXIT_CONCAT_FAILED: i32 = 3;
/// Probing failed while listing streams.
const EXIT_LISTING_FAILED: i32 = 5;
/// Probing failed while auto-selecting streams for a transcode.
const EXIT_SELECTION_FAILED: i32 = 6;
const EXIT_TRANSCODE_FAILED: i32 = 7;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries listings and progress
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mode = cli.mode();
    if mode == Mode::Help {
        println!("{}", Cli::command().render_help());
        process::exit(EXIT_USAGE);
    }

    if let Err(e) = run(cli, mode).await {
        debug!("Fatal error: {:?}", e);
        report_failure(&e);
        process::exit(exit_code(&e, mode));
    }
}

async fn run(cli: Cli, mode: Mode) -> Result<()> {
    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!(?config, "Configuration loaded");

    let tool = FfmpegTool::new(config.tools.clone());
    let runner = JobRunner::new(config, tool);

    match mode {
        Mode::CheckTools => check_tools(&runner).await,
        Mode::Concat => concat(&runner, &cli).await,
        Mode::ListStreams => list_streams(&runner, &cli).await,
        Mode::Transcode => transcode(&runner, &cli).await,
        Mode::Help => Ok(()),
    }
}

async fn check_tools(runner: &JobRunner<FfmpegTool>) -> Result<()> {
    runner.tool().validate().await?;

    let tools = &runner.config().tools;
    println!("ffmpeg:  {}", tools.ffmpeg_path.display());
    println!("ffprobe: {}", tools.ffprobe_path.display());
    println!("All tools available");
    Ok(())
}

async fn concat(runner: &JobRunner<FfmpegTool>, cli: &Cli) -> Result<()> {
    let plan = runner.plan_concat(cli.output.as_deref(), &cli.files)?;

    if cli.dryrun {
        let list = plan.write_list().map_err(JobError::ConcatList)?;
        println!("Concatenating:");
        println!("{}", plan.list_contents());
        println!("With:");
        println!("{}", runner.concat_invocation(list.path(), &plan));
        return Ok(());
    }

    let (tx, printer) = report::spawn_progress_printer();
    let result = runner.concat(&plan, Some(tx)).await;
    report::finish_progress_printer(printer).await;
    result?;

    info!(output = %plan.output, "Concatenated {} inputs", cli.files.len());
    Ok(())
}

async fn list_streams(runner: &JobRunner<FfmpegTool>, cli: &Cli) -> Result<()> {
    let mut stdout = io::stdout();

    for input in &cli.files {
        if cli.several_inputs() && !cli.json {
            report::write_banner(&mut stdout, input)?;
        }
        if cli.dryrun && !cli.json {
            writeln!(stdout, "{}", runner.probe_invocation(input))?;
        }

        let classification = runner.list_streams(input, cli.dryrun).await?;

        if cli.json {
            report::write_json_listing(&mut stdout, input, &classification)?;
        } else {
            report::write_mapping(&mut stdout, &classification)?;
            writeln!(stdout)?;
        }
    }

    stdout.flush()?;
    Ok(())
}

async fn transcode(runner: &JobRunner<FfmpegTool>, cli: &Cli) -> Result<()> {
    let output = cli.output.clone().unwrap_or_default();
    let trim = TrimPeriod::from_bounds(cli.begin.as_deref(), cli.end.as_deref())?;

    let request = TranscodeRequest::new(output)
        .with_trim(trim)
        .with_explicit(cli.explicit_streams())
        .with_auto_streams(cli.streams)
        .with_transcode_video(cli.transcode);

    for input in &cli.files {
        if cli.several_inputs() {
            report::write_banner(&mut io::stdout(), input)?;
        }

        let job = runner.plan_transcode(input, &request).await?;

        if cli.dryrun {
            println!("{}", runner.transcode_invocation(&job));
        } else {
            let (tx, printer) = report::spawn_progress_printer();
            let result = runner.transcode(&job, Some(tx)).await;
            report::finish_progress_printer(printer).await;
            result?;
        }
        println!();
    }

    Ok(())
}

/// Prints the failure, and the tool's own error lines when there are any.
fn report_failure(err: &anyhow::Error) {
    eprintln!("Error: {:#}", err);

    let stderr = err
        .downcast_ref::<JobError>()
        .and_then(JobError::tool_error)
        .and_then(|e| e.stderr());
    if let Some(stderr) = stderr {
        for line in stderr.lines() {
            eprintln!("  {}", line);
        }
    }
}

fn exit_code(err: &anyhow::Error, mode: Mode) -> i32 {
    if err.downcast_ref::<TimecodeError>().is_some() {
        return EXIT_USAGE;
    }

    match err.downcast_ref::<JobError>() {
        Some(JobError::ProbeFailed { .. }) if mode == Mode::ListStreams => EXIT_LISTING_FAILED,
        Some(JobError::ProbeFailed { .. }) => EXIT_SELECTION_FAILED,
        Some(JobError::TranscodeFailed { .. }) => EXIT_TRANSCODE_FAILED,
        Some(JobError::ConcatFailed { .. }) | Some(JobError::ConcatList(_)) => EXIT_CONCAT_FAILED,
        Some(JobError::NoInputs) => EXIT_USAGE,
        None => 1,
    }
}
