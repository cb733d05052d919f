pub mod terminal;

pub use terminal::{run_session_tui, CrosstermTerminal};
