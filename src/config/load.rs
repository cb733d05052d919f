use super::{default_config_path, ConfigError, Settings};
use std::path::Path;

/// Reads and validates the settings file, falling back to `./envprompt.yaml`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path(),
    };
    let settings = Settings::from_path(&path)?;
    settings.validate()?;
    Ok(settings)
}
