use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "RECODER_CONFIG";

/// Prefix of environment overrides, e.g. `RECODER_TOOLS__FFMPEG_PATH`.
const ENV_PREFIX: &str = "RECODER_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(base_figment().merge(Toml::file(path)))
}

/// Load configuration from an explicit path, `RECODER_CONFIG`, or defaults.
///
/// An explicitly named file must exist. Without one, built-in defaults are
/// used, still subject to environment overrides.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);

    match path.map(Path::to_path_buf).or(env_path) {
        Some(path) => load_config(&path),
        None => extract(base_figment()),
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
