pub mod app;
pub mod channel;
pub mod config;
pub mod prompt;
pub mod session;
pub mod shared;
pub mod tui;
