pub mod error;
pub mod load;
pub mod paths;
pub mod schema;
pub mod settings;

pub use error::ConfigError;
pub use load::load_settings;
pub use paths::{
    default_config_path, default_log_path, DEFAULT_CONFIG_FILE_NAME, SESSION_LOG_FILE_NAME,
    STATE_DIR,
};
pub use schema::{matches_secret_pattern, resolve_field, FieldSchema};
pub use settings::{ChannelConfig, Settings, DEFAULT_SECRET_PATTERNS};
