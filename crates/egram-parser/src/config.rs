//! Parser configuration
//!
//! The statement-call whitelist decides which functions may be invoked in
//! statement position with several unparenthesized arguments
//! (`notice 10, 3`). Everything else needs parentheses for more than one
//! argument.

use rustc_hash::FxHashSet;
use serde::Deserialize;
use smol_str::SmolStr;

/// Functions that take unparenthesized argument lists out of the box
pub const DEFAULT_STATEMENT_CALLS: &[&str] = &[
    "require", "realize", "include", "contain", "tag", "debug", "info", "notice", "warning", "err",
    "fail", "import",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    statement_calls: FxHashSet<SmolStr>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::with_statement_calls(DEFAULT_STATEMENT_CALLS.iter().copied())
    }
}

impl ParserConfig {
    /// Configuration with no statement calls at all
    pub fn empty() -> Self {
        Self {
            statement_calls: FxHashSet::default(),
        }
    }

    /// Configuration whose whitelist is exactly `names`
    pub fn with_statement_calls<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::empty();
        config.extend_statement_calls(names);
        config
    }

    pub fn allow_statement_call(&mut self, name: impl AsRef<str>) {
        self.statement_calls.insert(SmolStr::new(name.as_ref()));
    }

    pub fn extend_statement_calls<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.allow_statement_call(name);
        }
    }

    pub fn is_statement_call(&self, name: &str) -> bool {
        self.statement_calls.contains(name)
    }

    /// Whitelisted names in sorted order
    pub fn statement_calls(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.statement_calls.iter().map(SmolStr::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// The `[parser]` table of a config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserSettings {
    #[serde(default)]
    pub statement_calls: Vec<String>,
    /// Add `statement_calls` to the defaults instead of replacing them
    #[serde(default = "default_extend")]
    pub extend_defaults: bool,
}

fn default_extend() -> bool {
    true
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            statement_calls: Vec::new(),
            extend_defaults: true,
        }
    }
}

impl From<ParserSettings> for ParserConfig {
    fn from(settings: ParserSettings) -> Self {
        let mut config = if settings.extend_defaults {
            ParserConfig::default()
        } else {
            ParserConfig::empty()
        };
        config.extend_statement_calls(settings.statement_calls);
        config
    }
}
