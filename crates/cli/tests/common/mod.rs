//! Common helpers for running the `recoder` binary in tests.
//!
//! Tests that need ffmpeg or ffprobe get small shell scripts standing in for
//! them, wired up through a temporary config file.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

static SERIAL: Mutex<()> = Mutex::new(());

/// Serializes tests that write and then execute scripts, so no freshly
/// written script is still open in a forked child when it gets executed.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// A `recoder` command isolated from the caller's environment.
pub fn recoder() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_recoder"));
    cmd.env_remove("RECODER_CONFIG")
        .env("RUST_LOG", "error");
    cmd
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// A scratch directory holding fake tools and a config pointing at them.
pub struct ToolFixture {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

impl ToolFixture {
    /// Creates fake `ffmpeg` and `ffprobe` running the given shell bodies.
    #[cfg(unix)]
    pub fn new(ffmpeg_body: &str, ffprobe_body: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let ffmpeg = write_script(dir.path(), "ffmpeg", ffmpeg_body);
        let ffprobe = write_script(dir.path(), "ffprobe", ffprobe_body);

        let config_path = dir.path().join("recoder.toml");
        std::fs::write(
            &config_path,
            format!(
                "[tools]\nffmpeg_path = {:?}\nffprobe_path = {:?}\n",
                ffmpeg.display().to_string(),
                ffprobe.display().to_string()
            ),
        )
        .expect("Failed to write config");

        Self { dir, config_path }
    }

    /// A `recoder` command using this fixture's config.
    pub fn recoder(&self) -> Command {
        let mut cmd = recoder();
        cmd.arg("--config")
            .arg(&self.config_path)
            .current_dir(self.dir.path());
        cmd
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

/// Shell body printing an ffprobe report of a DVB-T recording.
pub const FFPROBE_DVB_T: &str = r#"cat >&2 <<'EOF'
Input #0, mpegts, from 'news.m2t':
  Duration: 00:29:40.32, start: 41077.161267, bitrate: 3124 kb/s
    Stream #0:0[0xd3]: Video: h264 (High) ([27][0][0][0] / 0x001B), yuv420p(tv, bt470bg), 704x576
    Stream #0:1[0xdd](dan): Audio: aac_latm (HE-AAC) ([17][0][0][0] / 0x0011), 48000 Hz, stereo, fltp
    Stream #0:2[0xe7](dan): Subtitle: dvb_teletext ([6][0][0][0] / 0x0006)
    Stream #0:3[0xeb](dan): Subtitle: dvb_subtitle ([6][0][0][0] / 0x0006)
EOF"#;

/// Shell body of an ffmpeg that reports a 10 second input and succeeds.
pub const FFMPEG_OK: &str = r#"printf 'Input #0, mpegts:\n  Duration: 00:00:10.00, start: 0.0\nframe=1 time=00:00:05.00 bitrate=1\rframe=2 time=00:00:10.00 bitrate=1\r' >&2"#;

/// Shell body of an ffmpeg that fails.
pub const FFMPEG_FAIL: &str =
    r#"printf 'in.ts: Invalid data found when processing input\nConversion failed: error\n' >&2; exit 1"#;

/// Shell body of a tool that fails without output.
pub const FAIL: &str = "exit 1";
