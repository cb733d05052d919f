pub mod display;
pub mod ids;
pub mod logging;
