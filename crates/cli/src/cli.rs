use clap::Parser;
use std::path::PathBuf;

use recoder_core::ExplicitStreams;

#[derive(Parser, Debug)]
#[command(name = "recoder")]
#[command(
    version,
    about = "Extract, trim and concatenate media streams with ffmpeg",
    after_help = "OUTPUT may be a file name, a directory ('/tmp/'), an extension ('.mkv'), \
                  a directory plus extension ('/tmp/.mkv'), or start with '+' to be placed \
                  relative to each input's directory ('+cut/.mkv')."
)]
pub struct Cli {
    /// Print the ffmpeg commands instead of running them
    #[arg(short, long)]
    pub dryrun: bool,

    /// Output file, directory or extension (see below)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Time (hh:mm:ss) in the input at which the output begins
    #[arg(short, long, value_name = "TIME")]
    pub begin: Option<String>,

    /// Time (hh:mm:ss) in the input at which the output ends
    #[arg(short, long, value_name = "TIME")]
    pub end: Option<String>,

    /// Index of the video stream (counting from 0)
    #[arg(short, long, value_name = "INDEX")]
    pub video: Option<u32>,

    /// Index of the audio stream (counting from 0)
    #[arg(short, long, value_name = "INDEX")]
    pub audio: Option<u32>,

    /// Index of the subtitle stream (counting from 0)
    #[arg(short, long, value_name = "INDEX")]
    pub subtitle: Option<u32>,

    /// Without an output, list the streams of each input and quit. With an
    /// output, auto-detect the streams; an explicitly given kind is then the
    /// only stream of that kind
    #[arg(short = 'z', long)]
    pub streams: bool,

    /// Re-encode the video stream instead of copying it
    #[arg(short = 'x', long)]
    pub transcode: bool,

    /// Concatenate the inputs into one output. Without an output a file
    /// named after the configured base name is created
    #[arg(short, long)]
    pub concat: bool,

    /// Print stream listings as JSON
    #[arg(long)]
    pub json: bool,

    /// Check that ffmpeg and ffprobe can be started, then quit
    #[arg(long)]
    pub check_tools: bool,

    /// Path to config file (defaults to $RECODER_CONFIG)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input media files
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,
}

/// What a command line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Nothing usable was given.
    Help,
    CheckTools,
    Concat,
    ListStreams,
    Transcode,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.check_tools {
            return Mode::CheckTools;
        }
        if self.files.is_empty() {
            return Mode::Help;
        }
        if self.concat {
            Mode::Concat
        } else if self.output.is_some() {
            Mode::Transcode
        } else if self.streams {
            Mode::ListStreams
        } else {
            Mode::Help
        }
    }

    pub fn explicit_streams(&self) -> ExplicitStreams {
        ExplicitStreams {
            video: self.video,
            audio: self.audio,
            subtitle: self.subtitle,
        }
    }

    /// Whether each input gets a name banner.
    pub fn several_inputs(&self) -> bool {
        self.files.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("recoder").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_modes() {
        assert_eq!(parse(&[]).mode(), Mode::Help);
        assert_eq!(parse(&["-z"]).mode(), Mode::Help);
        assert_eq!(parse(&["in.ts"]).mode(), Mode::Help);
        assert_eq!(parse(&["-z", "in.ts"]).mode(), Mode::ListStreams);
        assert_eq!(parse(&["-z", "-o", ".mkv", "in.ts"]).mode(), Mode::Transcode);
        assert_eq!(parse(&["-c", "-o", "x.mkv", "a.ts", "b.ts"]).mode(), Mode::Concat);
        assert_eq!(parse(&["--check-tools"]).mode(), Mode::CheckTools);
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&[
            "-d", "-x", "-b", "00:01:00", "-e", "00:02:00", "-v", "0", "-a", "2", "-o", "/tmp/",
            "a.ts", "b.ts",
        ]);
        assert!(cli.dryrun);
        assert!(cli.transcode);
        assert_eq!(cli.begin.as_deref(), Some("00:01:00"));
        assert_eq!(cli.end.as_deref(), Some("00:02:00"));
        assert_eq!(
            cli.explicit_streams(),
            ExplicitStreams {
                video: Some(0),
                audio: Some(2),
                subtitle: None,
            }
        );
        assert!(cli.several_inputs());
    }

    #[test]
    fn test_negative_index_is_rejected() {
        let result = Cli::try_parse_from(["recoder", "-a", "-1", "-o", "x.mkv", "in.ts"]);
        assert!(result.is_err());
    }
}
