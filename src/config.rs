//! TOML configuration.
//!
//! ```toml
//! indent_offset = 2
//! lookback_window = 10000
//! tab_width = 8
//!
//! [servers.mlx]
//! command = ["ocamllsp"]
//! language_id = "ocaml"
//! ```
//!
//! Every key is optional. The `servers` table maps an editor mode to the
//! language server to launch for it; a table given here replaces the
//! default entry for that mode and leaves the others alone.

use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::jsx::ScanOptions;
use crate::limits::{
    DEFAULT_INDENT_OFFSET, DEFAULT_LOOKBACK_WINDOW, DEFAULT_TAB_WIDTH, MAX_INDENT_OFFSET,
    MAX_LOOKBACK_WINDOW,
};

/// Mode the default server entry is registered under.
pub const DEFAULT_MODE: &str = "mlx";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// Parsed, but a value is out of range.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read config: {err}"),
            ConfigError::Parse(err) => write!(f, "invalid config: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// A language server launch entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Program followed by its arguments.
    pub command: Vec<String>,
    /// Language id sent to the server, when it differs from the mode name.
    #[serde(default)]
    pub language_id: Option<String>,
}

impl ServerConfig {
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }
}

/// Language servers by editor mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRegistry {
    servers: FxHashMap<String, ServerConfig>,
}

impl Default for ServerRegistry {
    fn default() -> Self {
        let mut servers = FxHashMap::default();
        servers.insert(
            DEFAULT_MODE.to_owned(),
            ServerConfig {
                command: vec!["ocamllsp".to_owned()],
                language_id: Some("ocaml".to_owned()),
            },
        );
        Self { servers }
    }
}

impl ServerRegistry {
    pub fn server_for(&self, mode: &str) -> Option<&ServerConfig> {
        self.servers.get(mode)
    }

    pub fn register(&mut self, mode: impl Into<String>, server: ServerConfig) {
        self.servers.insert(mode.into(), server);
    }

    /// Modes with a registered server, sorted.
    pub fn modes(&self) -> Vec<&str> {
        let mut modes: Vec<&str> = self.servers.keys().map(String::as_str).collect();
        modes.sort_unstable();
        modes
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    indent_offset: Option<usize>,
    lookback_window: Option<usize>,
    tab_width: Option<usize>,
    servers: FxHashMap<String, ServerConfig>,
}

/// Validated settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub indent_offset: usize,
    pub lookback_window: usize,
    pub tab_width: usize,
    pub servers: ServerRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_offset: DEFAULT_INDENT_OFFSET,
            lookback_window: DEFAULT_LOOKBACK_WINDOW,
            tab_width: DEFAULT_TAB_WIDTH,
            servers: ServerRegistry::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(input)?;
        let mut config = Config::default();
        if let Some(v) = raw.indent_offset {
            config.indent_offset = v;
        }
        if let Some(v) = raw.lookback_window {
            config.lookback_window = v;
        }
        if let Some(v) = raw.tab_width {
            config.tab_width = v;
        }
        for (mode, server) in raw.servers {
            config.servers.register(mode, server);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_offset > MAX_INDENT_OFFSET {
            return Err(ConfigError::Invalid("indent_offset must be at most 16"));
        }
        if self.lookback_window == 0 || self.lookback_window > MAX_LOOKBACK_WINDOW {
            return Err(ConfigError::Invalid(
                "lookback_window must be between 1 and 1048576",
            ));
        }
        if self.tab_width == 0 {
            return Err(ConfigError::Invalid("tab_width must be at least 1"));
        }
        if self.servers.servers.values().any(|s| s.command.is_empty()) {
            return Err(ConfigError::Invalid("server command must not be empty"));
        }
        Ok(())
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            indent_offset: self.indent_offset,
            lookback_window: self.lookback_window,
            tab_width: self.tab_width,
        }
    }
}
