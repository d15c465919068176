//! Global daybook configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, DaybookResult};
use crate::layout::{OverlapMode, WeekStart};

static DEFAULT_CALENDAR_PATH: &str = "~/calendar";
static DEFAULT_LOG_LEVEL: &str = "info";
static DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4096;

fn default_calendar_path() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_PATH)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Global configuration at ~/.config/daybook/config.toml
///
/// Every field may be overridden from the environment with a `DAYBOOK_`
/// prefix, nested keys joined by `__` (e.g. `DAYBOOK_SERVER__PORT`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DaybookConfig {
    #[serde(default = "default_calendar_path")]
    pub calendar_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_calendar: Option<String>,

    /// IANA zone name; the system zone when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default)]
    pub week_start: WeekStart,

    #[serde(default)]
    pub overlap: OverlapMode,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for DaybookConfig {
    fn default() -> Self {
        DaybookConfig {
            calendar_dir: default_calendar_path(),
            default_calendar: None,
            timezone: None,
            week_start: WeekStart::default(),
            overlap: OverlapMode::default(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
        }
    }
}

impl DaybookConfig {
    pub fn config_path() -> DaybookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DaybookError::Config("Could not determine config directory".into()))?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/daybook/config.toml, writing it with defaults on first run.
    pub fn load() -> DaybookResult<Self> {
        Self::load_or_create(&Self::config_path()?)
    }

    pub fn load_or_create(path: &Path) -> DaybookResult<Self> {
        if !path.exists() {
            Self::create_default_config(path)?;
        }
        Self::load_from(path)
    }

    /// Load the config file at `path` (optional) layered under `DAYBOOK_*` variables.
    pub fn load_from(path: &Path) -> DaybookResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("DAYBOOK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DaybookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DaybookError::Config(e.to_string()))
    }

    /// Save the current config to ~/.config/daybook/config.toml
    pub fn save(&self) -> DaybookResult<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).map_err(|e| DaybookError::Config(e.to_string()))?;

        std::fs::write(&config_path, content)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DaybookResult<()> {
        let contents = format!(
            "\
# daybook configuration

# Where your calendars live:
# calendar_dir = \"{}\"

# Default calendar for new events:
# default_calendar = \"personal\"

# Time zone used for days and clock times (defaults to the system zone):
# timezone = \"Europe/Paris\"

# First day of the week: \"monday\" or \"sunday\"
# week_start = \"monday\"

# How the day view decides two events overlap: \"slot\" (30-minute slots)
# or \"continuous\" (exact times)
# overlap = \"slot\"

# log_level = \"{}\"

# [server]
# host = \"{}\"
# port = {}
",
            DEFAULT_CALENDAR_PATH, DEFAULT_LOG_LEVEL, DEFAULT_HOST, DEFAULT_PORT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DaybookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
