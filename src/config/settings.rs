use super::{default_log_path, resolve_field, ConfigError, FieldSchema};
use crate::prompt::render::DEFAULT_MAX_DISPLAY_LENGTH;
use crate::prompt::{FieldSpec, RenderOptions, Theme, ThemeName};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SECRET_PATTERNS: [&str; 4] = ["*_KEY", "*SECRET*", "*TOKEN*", "*PASSWORD*"];
const DEFAULT_ENV_FILE: &str = ".env";
const MIN_DISPLAY_LENGTH: usize = 8;

/// Where prompted values are read from and written to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelConfig {
    #[default]
    File,
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default = "default_secret_patterns")]
    pub secret_patterns: Vec<String>,
    #[serde(default = "default_max_display_length")]
    pub max_display_length: usize,
    #[serde(default)]
    pub theme: ThemeName,
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub fields: serde_yaml::Mapping,
    #[serde(skip)]
    source_dir: Option<PathBuf>,
}

fn default_env_file() -> PathBuf {
    PathBuf::from(DEFAULT_ENV_FILE)
}

fn default_secret_patterns() -> Vec<String> {
    DEFAULT_SECRET_PATTERNS
        .iter()
        .map(|pattern| pattern.to_string())
        .collect()
}

fn default_max_display_length() -> usize {
    DEFAULT_MAX_DISPLAY_LENGTH
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut settings: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        settings.source_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.env_file.as_os_str().is_empty() {
            return Err(ConfigError::Settings(
                "`env_file` must be non-empty".to_string(),
            ));
        }
        if let ChannelConfig::Command { program, .. } = &self.channel {
            if program.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "`channel.program` must be non-empty when `channel.kind=command`".to_string(),
                ));
            }
        }
        if self
            .secret_patterns
            .iter()
            .any(|pattern| pattern.trim().is_empty())
        {
            return Err(ConfigError::Settings(
                "`secret_patterns` entries must be non-empty".to_string(),
            ));
        }
        if self.max_display_length < MIN_DISPLAY_LENGTH {
            return Err(ConfigError::Settings(format!(
                "`max_display_length` must be at least {MIN_DISPLAY_LENGTH}"
            )));
        }
        if self.fields.is_empty() {
            return Err(ConfigError::Settings(
                "`fields` must declare at least one field".to_string(),
            ));
        }
        self.field_specs().map(|_| ())
    }

    /// Resolves `fields:` into prompt specs, keeping declaration order.
    pub fn field_specs(&self) -> Result<Vec<FieldSpec>, ConfigError> {
        let mut specs = Vec::with_capacity(self.fields.len());
        for (key, value) in &self.fields {
            let Some(key) = key.as_str() else {
                return Err(ConfigError::Settings(
                    "`fields` keys must be strings".to_string(),
                ));
            };
            let schema = match value {
                serde_yaml::Value::Null => FieldSchema::default(),
                serde_yaml::Value::String(description) => FieldSchema::described(description),
                other => serde_yaml::from_value(other.clone()).map_err(|source| {
                    ConfigError::InvalidField {
                        key: key.to_string(),
                        reason: source.to_string(),
                    }
                })?,
            };
            specs.push(resolve_field(key, &schema, &self.secret_patterns)?);
        }
        Ok(specs)
    }

    /// Relative paths in the file are taken from the config file's directory.
    pub fn resolve_env_file(&self) -> PathBuf {
        self.relative_to_source(&self.env_file)
    }

    pub fn resolve_log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_file {
            Some(path) => Ok(self.relative_to_source(path)),
            None => default_log_path(),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            theme: Theme::from_name(self.theme),
            max_display_length: self.max_display_length,
        }
    }

    fn relative_to_source(&self, path: &Path) -> PathBuf {
        match &self.source_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
