use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Tool paths are not empty
/// - Transcode video codec is not empty
/// - Concat base name is a plain, non-empty file name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.tools.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "tools.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    if config.tools.ffprobe_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "tools.ffprobe_path cannot be empty".to_string(),
        ));
    }

    if config.tools.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "tools.timeout_secs cannot be 0 (omit it to disable the timeout)".to_string(),
        ));
    }

    if config.transcode.video_codec.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "transcode.video_codec cannot be empty".to_string(),
        ));
    }

    let base_name = &config.concat.base_name;
    if base_name.is_empty() || base_name.contains('/') {
        return Err(ConfigError::ValidationError(format!(
            "concat.base_name must be a plain file name, got '{}'",
            base_name
        )));
    }

    Ok(())
}
