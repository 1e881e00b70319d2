//! `egram.toml`
//!
//! ```toml
//! [parser]
//! statement_calls = ["notice", "include"]
//! extend_defaults = true
//! ```

use egram_parser::{ParserConfig, ParserSettings};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Looked up in the current directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "egram.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EgramConfig {
    #[serde(default)]
    pub parser: ParserSettings,
}

impl EgramConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Load `explicit` if given, else `egram.toml` from `dir` if it exists,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading config");
            Self::from_file(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parser configuration with `extra` statement calls added on top
    pub fn parser_config(self, extra: &[String]) -> ParserConfig {
        let mut config = ParserConfig::from(self.parser);
        config.extend_statement_calls(extra);
        config
    }
}
