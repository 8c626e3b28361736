//! Terminal output.

use std::io::{self, Write};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use recoder_core::{Classification, ProgressEvent, StreamRecord};

/// Progress events buffered between the tool and the terminal.
const PROGRESS_BUFFER: usize = 64;

/// Writes `name` between two rules of its own width.
pub fn write_banner(out: &mut impl Write, name: &str) -> io::Result<()> {
    let rule = "=".repeat(name.chars().count());
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", name)?;
    writeln!(out, "{}", rule)
}

/// Writes the echoed stream lines, then the suggested mapping.
pub fn write_mapping(out: &mut impl Write, classification: &Classification) -> io::Result<()> {
    for line in &classification.echoed {
        writeln!(out, "{}", line)?;
    }

    writeln!(out, "Suggested mapping:")?;
    for stream in &classification.streams {
        let description = stream
            .description
            .as_deref()
            .map(|d| format!("-- {}", d))
            .unwrap_or_default();
        writeln!(out, "{:.<8}: {} {}", stream.kind, stream.index, description)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct Listing<'a> {
    input: &'a str,
    streams: &'a [StreamRecord],
    #[serde(skip_serializing_if = "is_empty")]
    echoed: &'a [String],
}

fn is_empty(lines: &&[String]) -> bool {
    lines.is_empty()
}

/// Writes one input's listing as a single JSON line.
pub fn write_json_listing(
    out: &mut impl Write,
    input: &str,
    classification: &Classification,
) -> io::Result<()> {
    let listing = Listing {
        input,
        streams: &classification.streams,
        echoed: &classification.echoed,
    };
    serde_json::to_writer(&mut *out, &listing)?;
    writeln!(out)
}

/// Renders one progress event the way it goes to the terminal.
///
/// Progress lines end in a carriage return so the next one overwrites them.
pub fn render_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Progress { percent, line } => format!("{:5.1}% >> {}\r", percent, line),
        ProgressEvent::Status { line } => format!("{}\r\n", line),
        ProgressEvent::RunTimeDiscovered { run_time, .. } => format!("Run time: {}\n", run_time),
    }
}

/// Spawns the task that owns stdout while a tool runs.
///
/// The task ends once the sender is dropped, after moving past the last
/// progress line.
pub fn spawn_progress_printer() -> (mpsc::Sender<ProgressEvent>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<ProgressEvent>(PROGRESS_BUFFER);

    let handle = tokio::spawn(async move {
        let mut stdout = io::stdout();
        while let Some(event) = rx.recv().await {
            let rendered = render_event(&event);
            if stdout
                .write_all(rendered.as_bytes())
                .and_then(|_| stdout.flush())
                .is_err()
            {
                tracing::debug!("stdout closed, dropping progress output");
                break;
            }
        }
        let _ = writeln!(stdout);
    });

    (tx, handle)
}

/// Waits for the progress printer to drain. Returns false if it panicked
/// or was cancelled.
pub async fn finish_progress_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Progress printer failed");
            false
        }
    }
}
