//! Daybook root directory management.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::calendar::Calendar;
use crate::constants::METADATA_DIR;
use crate::daybook_config::DaybookConfig;
use crate::error::{DaybookError, DaybookResult};
use crate::time::resolve_timezone;

#[derive(Debug, Clone)]
pub struct Daybook {
    config: DaybookConfig,
    tz: Tz,
}

impl Daybook {
    /// Resolves the zone only; calendars are read on demand.
    pub fn from_config(config: DaybookConfig) -> DaybookResult<Self> {
        let tz = resolve_timezone(config.timezone.as_deref()).map_err(DaybookError::Config)?;
        Ok(Daybook { config, tz })
    }

    pub fn config(&self) -> &DaybookConfig {
        &self.config
    }

    /// Zone used for every wall-clock computation
    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.config.calendar_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Returns the calendar directory path in display-friendly form,
    /// keeping `~` instead of expanding to the full home directory.
    pub fn display_path(&self) -> &Path {
        &self.config.calendar_dir
    }

    /// Discover calendars by scanning calendar_dir for subdirectories
    /// with a .daybook directory.
    pub fn calendars(&self) -> Vec<Calendar> {
        let Ok(entries) = std::fs::read_dir(self.data_path()) else {
            return Vec::new();
        };

        let mut calendars: Vec<Calendar> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && path.join(METADATA_DIR).exists())
            .filter_map(|path| match Calendar::load(path) {
                Ok(calendar) => Some(calendar),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable calendar");
                    None
                }
            })
            .collect();

        calendars.sort_by(|a, b| a.slug.cmp(&b.slug));
        calendars
    }

    pub fn calendar(&self, slug: &str) -> DaybookResult<Calendar> {
        self.calendars()
            .into_iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| DaybookError::not_found("Calendar", slug))
    }

    pub fn create_calendar(&self, name: &str, color: Option<String>) -> DaybookResult<Calendar> {
        let data_path = self.data_path();
        std::fs::create_dir_all(&data_path)?;
        Calendar::create(&data_path, name, color)
    }

    pub fn default_calendar(&self) -> Option<Calendar> {
        let name = self.config.default_calendar.as_ref()?;
        self.calendars().into_iter().find(|c| &c.slug == name)
    }

    /// The calendar named by `slug`, else the configured default, else the
    /// only calendar there is.
    pub fn resolve_calendar(&self, slug: Option<&str>) -> DaybookResult<Calendar> {
        if let Some(slug) = slug {
            return self.calendar(slug);
        }

        if let Some(calendar) = self.default_calendar() {
            return Ok(calendar);
        }

        let mut calendars = self.calendars();
        match calendars.len() {
            0 => Err(DaybookError::Config(
                "No calendars found. Create one with `daybook init <name>`".into(),
            )),
            1 => Ok(calendars.remove(0)),
            _ => Err(DaybookError::Config(
                "Several calendars exist; pick one with --calendar or set default_calendar".into(),
            )),
        }
    }

    /// Set the default calendar if one isn't already configured.
    /// Returns true if the default was set.
    pub fn set_default_calendar_if_unset(&mut self, slug: &str) -> DaybookResult<bool> {
        if self.config.default_calendar.is_some() {
            return Ok(false);
        }
        self.config.default_calendar = Some(slug.to_string());
        self.config.save()?;
        Ok(true)
    }
}
