//! egram command-line support
//!
//! Config file loading and error reporting used by the `egram` binary.

pub mod config;
pub mod report;

pub use config::{ConfigError, EgramConfig, DEFAULT_CONFIG_FILE};
pub use report::render_parse_error;
