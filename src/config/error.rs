#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("field `{key}` is invalid: {reason}")]
    InvalidField { key: String, reason: String },
    #[error("field `{key}` has an invalid pattern: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },
    #[error("settings validation failed: {0}")]
    Settings(String),
    #[error("failed to resolve home directory for the session log path")]
    HomeDirectoryUnavailable,
}
