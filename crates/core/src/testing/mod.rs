//! Testing utilities and a mock tool implementation.
//!
//! [`MockMediaTool`] stands in for ffprobe and ffmpeg so job orchestration
//! can be exercised without the real binaries.
//!
//! # Example
//!
//! ```rust,ignore
//! use recoder_core::testing::{fixtures, MockMediaTool};
//!
//! let tool = MockMediaTool::new();
//! tool.set_probe_output("/film/news.m2t", fixtures::DVB_T_PROBE).await;
//! tool.set_run_output(fixtures::status_output("00:00:10", &["00:00:05"])).await;
//! ```

mod mock_tool;

pub use mock_tool::{MockMediaTool, RecordedRun};

/// Test fixtures and helper functions.
pub mod fixtures {
    /// ffprobe report of a DVB-T recording.
    pub const DVB_T_PROBE: &str = "\
Input #0, mpegts, from '/film/news.m2t':
  Duration: 00:29:40.32, start: 41077.161267, bitrate: 3124 kb/s
  Program 1403
    Stream #0:0[0xd3]: Video: h264 (High) ([27][0][0][0] / 0x001B), yuv420p(tv, bt470bg), 704x576 [SAR 16:11 DAR 16:9], 25 fps, 50 tbr, 90k tbn, 50 tbc
    Stream #0:1[0xdd](dan): Audio: aac_latm (HE-AAC) ([17][0][0][0] / 0x0011), 48000 Hz, stereo, fltp
    Stream #0:2[0xe7](dan): Subtitle: dvb_teletext ([6][0][0][0] / 0x0006)
    Stream #0:3[0xeb](dan): Subtitle: dvb_subtitle ([6][0][0][0] / 0x0006)
    Stream #0:4[0xec](dan): Subtitle: dvb_subtitle ([6][0][0][0] / 0x0006) (hearing impaired)
";

    /// ffprobe report of a ripped film with two audio tracks.
    pub const DVD_RIP_PROBE: &str = "\
Input #0, matroska,webm, from '/film/rip.mkv':
  Duration: 01:42:17.02, start: 0.000000, bitrate: 1311 kb/s
    Stream #0:0(eng): Video: h264 (High), yuv420p(tv, smpte170m/smpte170m/bt709), 706x300, 23.98 fps (default)
    Stream #0:1(eng): Audio: aac (LC), 48000 Hz, mono, fltp (default)
    Stream #0:2(eng): Audio: ac3, 48000 Hz, mono, fltp, 192 kb/s
    Stream #0:3(eng): Subtitle: subrip
";

    /// Builds ffmpeg status output: a `Duration:` announcement followed by
    /// one `\r`-terminated status line per elapsed time code.
    pub fn status_output(duration: &str, elapsed: &[&str]) -> Vec<u8> {
        let mut out = format!(
            "Input #0, mpegts, from 'in.ts':\n  Duration: {}.00, start: 0.000000, bitrate: 2500 kb/s\n",
            duration
        );
        for time in elapsed {
            out.push_str(&format!(
                "frame=  100 fps=0.0 q=-1.0 size=    1024kB time={}.00 bitrate=1000.0kbits/s speed=10x\r",
                time
            ));
        }
        out.into_bytes()
    }
}
