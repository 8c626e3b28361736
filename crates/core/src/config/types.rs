use serde::{Deserialize, Serialize};

use crate::output::DEFAULT_CONCAT_NAME;
use crate::streams::SelectionPolicy;
use crate::tool::ToolConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolConfig,
    #[serde(default)]
    pub transcode: TranscodeConfig,
    #[serde(default)]
    pub selection: SelectionPolicy,
    #[serde(default)]
    pub concat: ConcatConfig,
}

/// Transcoding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscodeConfig {
    /// Video codec used when transcoding is requested (otherwise `copy`).
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
        }
    }
}

fn default_video_codec() -> String {
    "h264".to_string()
}

/// Concatenation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConcatConfig {
    /// Base name of the joined file when no output is given.
    #[serde(default = "default_base_name")]
    pub base_name: String,
}

impl Default for ConcatConfig {
    fn default() -> Self {
        Self {
            base_name: default_base_name(),
        }
    }
}

fn default_base_name() -> String {
    DEFAULT_CONCAT_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tools.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.tools.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.transcode.video_codec, "h264");
        assert_eq!(config.concat.base_name, "concat");
        assert_eq!(config.selection, SelectionPolicy::default());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[tools]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
ffprobe_path = "/opt/ffmpeg/bin/ffprobe"
timeout_secs = 7200
extra_ffmpeg_args = ["-hide_banner"]

[transcode]
video_codec = "libx265"

[selection]
audio_languages = ["nor", "eng"]
subtitle_codecs = ["subrip"]
max_audio = 1

[concat]
base_name = "joined"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tools.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.tools.timeout_secs, Some(7200));
        assert_eq!(config.tools.extra_ffmpeg_args, vec!["-hide_banner".to_string()]);
        assert_eq!(config.transcode.video_codec, "libx265");
        assert_eq!(config.selection.audio_languages, vec!["nor", "eng"]);
        assert_eq!(config.selection.subtitle_codecs, vec!["subrip"]);
        assert_eq!(config.selection.max_audio, 1);
        assert_eq!(config.selection.max_video, 1);
        assert_eq!(config.concat.base_name, "joined");
    }

    #[test]
    fn test_deserialize_unknown_section_is_ignored() {
        let toml = r#"
[server]
port = 8080
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.transcode.video_codec, "h264");
    }

    #[test]
    fn test_deserialize_wrong_type_fails() {
        let toml = r#"
[selection]
max_audio = "two"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.selection, config.selection);
        assert_eq!(parsed.concat.base_name, config.concat.base_name);
    }
}
