//! TOML-backed lists kept under a calendar's .daybook directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::constants::METADATA_DIR;
use crate::error::{DaybookError, DaybookResult};
use crate::period::Period;
use crate::recurrence::RecurrenceRule;

pub(crate) const RECURRENCES_FILE: &str = "recurrences.toml";
pub(crate) const CATEGORIES_FILE: &str = "categories.toml";
pub(crate) const PERIODS_FILE: &str = "periods.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct RecurrenceFile {
    #[serde(default)]
    pub recurrences: Vec<RecurrenceRule>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct CategoryFile {
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct PeriodFile {
    #[serde(default)]
    pub periods: Vec<Period>,
}

fn metadata_path(calendar_dir: &Path, file: &str) -> PathBuf {
    calendar_dir.join(METADATA_DIR).join(file)
}

/// Read `.daybook/<file>`, or the empty default when it doesn't exist yet.
pub(crate) fn load<T>(calendar_dir: &Path, file: &str) -> DaybookResult<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    let path = metadata_path(calendar_dir, file);

    if !path.exists() {
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| DaybookError::Serialization(format!("{}: {}", path.display(), e)))
}

/// Write `.daybook/<file>` via a temp file and rename.
pub(crate) fn save<T: Serialize>(calendar_dir: &Path, file: &str, value: &T) -> DaybookResult<()> {
    let dir = calendar_dir.join(METADATA_DIR);
    std::fs::create_dir_all(&dir)?;

    let content =
        toml::to_string_pretty(value).map_err(|e| DaybookError::Serialization(e.to_string()))?;

    let path = metadata_path(calendar_dir, file);
    let temp = dir.join(format!("{}.tmp", file));

    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, &path)?;
    Ok(())
}
