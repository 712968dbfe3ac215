//! Layered configuration.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`filebot.toml` shipped with the crate)
//! 2. `~/.config/filebot/filebot.toml`
//! 3. `./filebot.toml`, or the file passed with `--config`
//! 4. `FILEBOT_*` environment variables, `__` between section and key
//!    (`FILEBOT_BOT__TOKEN`, `FILEBOT_SOURCE__DIR`, `FILEBOT_BOT__ADMINS=1,2`)
//!
//! The loaded configuration is immutable for the life of the process.

use config::{Config, Environment, File, FileFormat};
use filebot_error::{ConfigError, FilebotError, FilebotResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../filebot.toml");

/// Chat platform credentials and access control.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BotSection {
    /// Platform API token, read by the embedding application's transport
    #[serde(default)]
    pub token: String,
    /// User ids allowed to run restricted commands
    #[serde(default)]
    pub admins: Vec<i64>,
}

/// Where the file library lives.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceSection {
    /// Library root directory
    pub dir: PathBuf,
}

/// Where the library is published.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DestSection {
    /// URL prefix under which library files are reachable
    pub public_url: String,
}

/// Handle store settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheSection {
    /// JSON file holding digest → handle records
    pub path: PathBuf,
    /// Write the store after every new record
    #[serde(default = "default_auto_flush")]
    pub auto_flush: bool,
}

fn default_auto_flush() -> bool {
    true
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset (e.g. "info", "filebot=debug")
    pub level: String,
    /// Log file written outside debug mode and served by `/log`
    pub file: PathBuf,
}

/// Complete process configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilebotConfig {
    /// `[bot]` section
    pub bot: BotSection,
    /// `[source]` section
    pub source: SourceSection,
    /// `[dest]` section
    pub dest: DestSection,
    /// `[cache]` section
    pub cache: CacheSection,
    /// `[logging]` section
    pub logging: LoggingConfig,
}

impl FilebotConfig {
    /// Load configuration from every source.
    ///
    /// `explicit` replaces `./filebot.toml` and must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be read or the merged
    /// result does not deserialize.
    #[instrument(skip(explicit), fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> FilebotResult<Self> {
        debug!("Loading configuration: env > file > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("filebot").join("filebot.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("filebot").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("FILEBOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("bot.admins"),
        );

        builder
            .build()
            .map_err(|e| {
                FilebotError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FilebotError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load only the bundled defaults overlaid with one TOML document.
    ///
    /// Ignores the home directory and the environment.
    pub fn from_toml_str(toml: &str) -> FilebotResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| {
                FilebotError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FilebotError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Check the settings every command needs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first missing setting.
    pub fn validate(&self) -> FilebotResult<()> {
        if self.source.dir.as_os_str().is_empty() {
            return Err(ConfigError::new("source.dir must be set").into());
        }
        if self.dest.public_url.trim().is_empty() {
            return Err(ConfigError::new("dest.public_url must be set").into());
        }
        Ok(())
    }
}
