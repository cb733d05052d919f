use crate::config::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "envprompt.yaml";
pub const STATE_DIR: &str = ".envprompt";
pub const SESSION_LOG_FILE_NAME: &str = "session.log";

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE_NAME)
}

pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home)
        .join(STATE_DIR)
        .join("logs")
        .join(SESSION_LOG_FILE_NAME))
}
