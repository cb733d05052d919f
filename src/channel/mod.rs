use crate::config::ChannelConfig;
use std::collections::BTreeMap;
use std::path::Path;

pub mod command;
pub mod dotenv;
pub mod file;
pub mod memory;

pub use command::CommandChannel;
pub use file::FileChannel;
pub use memory::MemoryChannel;

/// Full key→value view of a store at one point in time.
pub type Snapshot = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("failed to read env file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write env file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program} {action}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        action: String,
        status: String,
        stderr: String,
    },
    #[error("`{program}` returned invalid json: {source}")]
    Decode {
        program: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode values for `{program}`: {source}")]
    Encode {
        program: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store rejected the write: {0}")]
    Rejected(String),
}

/// Backing key-value store. `get` always returns the full snapshot; `set` writes a partial
/// map and leaves other keys alone.
pub trait Channel {
    fn get(&self) -> Result<Snapshot, ChannelError>;
    fn set(&mut self, values: &Snapshot) -> Result<(), ChannelError>;
    fn describe(&self) -> String;
}

pub fn open_channel(config: &ChannelConfig, env_file: &Path) -> Box<dyn Channel> {
    match config {
        ChannelConfig::File => Box::new(FileChannel::new(env_file)),
        ChannelConfig::Command { program, args } => {
            Box::new(CommandChannel::new(program.clone(), args.clone()))
        }
    }
}
