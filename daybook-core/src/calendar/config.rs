//! Per-calendar local configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::METADATA_DIR;
use crate::error::{DaybookError, DaybookResult};

/// Configuration stored in each calendar's .daybook/config.toml
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct CalendarConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CalendarConfig {
    /// Load config from .daybook/config.toml
    pub fn load(calendar_dir: &Path) -> DaybookResult<Self> {
        let path = calendar_dir.join(METADATA_DIR).join("config.toml");

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: CalendarConfig =
                toml::from_str(&content).map_err(|e| DaybookError::Config(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to .daybook/config.toml
    pub fn save(&self, calendar_dir: &Path) -> DaybookResult<()> {
        let dir = calendar_dir.join(METADATA_DIR);
        std::fs::create_dir_all(&dir)?;

        let content =
            toml::to_string_pretty(self).map_err(|e| DaybookError::Config(e.to_string()))?;

        std::fs::write(dir.join("config.toml"), content)?;

        Ok(())
    }
}
