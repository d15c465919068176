//! Calendar directory management.
//!
//! A calendar is a directory of `.ics` files, one per event, plus a
//! `.daybook/` directory holding its config and the TOML lists for
//! recurrence rules, categories and periods.

pub mod config;
mod categories;
mod event_file;
mod metadata;
mod periods;
mod recurrences;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::calendar::config::CalendarConfig;
use crate::calendar::event_file::EventFile;
use crate::constants::METADATA_DIR;
use crate::date_range::DateRange;
use crate::error::{DaybookError, DaybookResult};
use crate::event::Event;
use crate::reschedule::{DropTarget, plan_reschedule};

const MAX_SLUG_COLLISIONS: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Calendar {
    pub slug: String,
    #[serde(skip)]
    pub path: PathBuf,
    pub config: CalendarConfig,
}

/// Outcome of dropping an event on a target
#[derive(Debug, Clone, PartialEq)]
pub enum Rescheduled {
    /// Nothing to change; the stored event
    Unchanged(Event),
    /// The event as persisted after the move
    Moved(Event),
}

impl Rescheduled {
    pub fn event(&self) -> &Event {
        match self {
            Rescheduled::Unchanged(event) | Rescheduled::Moved(event) => event,
        }
    }

    pub fn into_event(self) -> Event {
        match self {
            Rescheduled::Unchanged(event) | Rescheduled::Moved(event) => event,
        }
    }
}

impl Calendar {
    /// Generate a unique slug that doesn't conflict with existing calendar directories.
    /// If the base slug exists, tries slug-2, slug-3, etc.
    pub fn unique_slug_for(name: &str, data_path: &Path) -> DaybookResult<String> {
        let mut base = slug::slugify(name);
        if base.is_empty() {
            base = "calendar".to_string();
        }

        if !data_path.join(&base).exists() {
            return Ok(base);
        }

        for n in 2..=MAX_SLUG_COLLISIONS {
            let suffixed = format!("{}-{}", base, n);
            if !data_path.join(&suffixed).exists() {
                return Ok(suffixed);
            }
        }

        Err(DaybookError::Config(format!(
            "Too many calendar name collisions for '{}'",
            base
        )))
    }

    /// Create a new calendar directory under `data_path`.
    pub fn create(data_path: &Path, name: &str, color: Option<String>) -> DaybookResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DaybookError::validation("Calendar name cannot be empty"));
        }

        let slug = Self::unique_slug_for(name, data_path)?;
        let path = data_path.join(&slug);
        std::fs::create_dir_all(&path)?;

        let calendar = Calendar {
            slug,
            path,
            config: CalendarConfig {
                name: Some(name.to_string()),
                color,
            },
        };
        calendar.save_config()?;

        tracing::info!(calendar = %calendar.slug, "created calendar");
        Ok(calendar)
    }

    pub fn load(path: PathBuf) -> DaybookResult<Self> {
        let slug = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| DaybookError::Config(format!("Invalid calendar path {}", path.display())))?;

        if !path.join(METADATA_DIR).is_dir() {
            return Err(DaybookError::not_found("Calendar", slug));
        }

        let config = CalendarConfig::load(&path)?;

        Ok(Calendar { slug, path, config })
    }

    /// Display name, falling back to the slug
    pub fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or(&self.slug)
    }

    pub fn save_config(&self) -> DaybookResult<()> {
        self.config.save(&self.path)
    }

    // EVENTS:

    fn event_files(&self) -> DaybookResult<Vec<EventFile>> {
        let entries = std::fs::read_dir(&self.path)?;

        let files = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "ics"))
            .filter_map(|path| match EventFile::from_file(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable event file");
                    None
                }
            })
            .collect();

        Ok(files)
    }

    fn event_file(&self, id: &str) -> DaybookResult<EventFile> {
        self.event_files()?
            .into_iter()
            .find(|f| f.event.id == id)
            .ok_or_else(|| DaybookError::not_found("Event", id))
    }

    /// All events, ordered by start.
    pub fn events(&self) -> DaybookResult<Vec<Event>> {
        let mut events: Vec<Event> = self.event_files()?.into_iter().map(|f| f.event).collect();
        events.sort_by(|a, b| a.datetime.cmp(&b.datetime).then_with(|| a.title.cmp(&b.title)));
        Ok(events)
    }

    /// Events starting within `range`, ordered by start.
    pub fn events_in_range(&self, range: &DateRange) -> DaybookResult<Vec<Event>> {
        let mut events = self.events()?;
        events.retain(|e| range.contains(e.datetime));
        Ok(events)
    }

    /// Events starting on the local days `first` through `last`.
    pub fn events_between(&self, first: NaiveDate, last: NaiveDate, tz: &Tz) -> DaybookResult<Vec<Event>> {
        self.events_in_range(&DateRange::days(first, last, tz))
    }

    pub fn event(&self, id: &str) -> DaybookResult<Event> {
        self.event_file(id).map(|f| f.event)
    }

    pub fn create_event(&self, event: &Event) -> DaybookResult<Event> {
        if event.title.trim().is_empty() {
            return Err(DaybookError::validation("Title cannot be empty"));
        }
        if self.event_files()?.iter().any(|f| f.event.id == event.id) {
            return Err(DaybookError::validation(format!(
                "Event {} already exists",
                event.id
            )));
        }
        self.write_event(event)
    }

    fn write_event(&self, event: &Event) -> DaybookResult<Event> {
        std::fs::create_dir_all(&self.path)?;

        let mut event = event.clone();
        event.updated = Some(Utc::now());

        let path = EventFile::unique_path_for(&event, &self.path)?;
        let file = EventFile { event, path };
        file.save()?;

        tracing::debug!(calendar = %self.slug, event = %file.event.id, path = %file.path.display(), "wrote event");
        Ok(file.event)
    }

    /// Replace the stored event with the same id. The file is renamed when
    /// the event's date or title changed.
    pub fn update_event(&self, event: &Event) -> DaybookResult<Event> {
        if event.title.trim().is_empty() {
            return Err(DaybookError::validation("Title cannot be empty"));
        }
        let existing = self.event_file(&event.id)?;

        let mut event = event.clone();
        event.updated = Some(Utc::now());

        // The old file stays until the new one is on disk.
        let path = if EventFile::name_fits(&existing.path, &event) {
            existing.path.clone()
        } else {
            EventFile::unique_path_for(&event, &self.path)?
        };
        let file = EventFile { event, path };
        file.save()?;

        if file.path != existing.path {
            if let Err(e) = std::fs::remove_file(&existing.path) {
                let _ = std::fs::remove_file(&file.path);
                return Err(e.into());
            }
        }

        tracing::debug!(calendar = %self.slug, event = %file.event.id, path = %file.path.display(), "updated event");
        Ok(file.event)
    }

    pub fn delete_event(&self, id: &str) -> DaybookResult<Event> {
        let existing = self.event_file(id)?;
        std::fs::remove_file(&existing.path)?;
        tracing::info!(calendar = %self.slug, event = %id, "deleted event");
        Ok(existing.event)
    }

    /// Drop event `id` on `target` while viewing `view_date`, persisting the move.
    pub fn reschedule(
        &self,
        id: &str,
        target: DropTarget,
        view_date: NaiveDate,
        tz: &Tz,
    ) -> DaybookResult<Rescheduled> {
        let event = self.event(id)?;

        let Some(patch) = plan_reschedule(&event, target, view_date, tz) else {
            tracing::debug!(event = %id, %target, "drop is a no-op");
            return Ok(Rescheduled::Unchanged(event));
        };

        let mut moved = event;
        patch.apply_to(&mut moved);
        let saved = self.update_event(&moved)?;

        tracing::info!(event = %id, %target, date = %view_date, "rescheduled event");
        Ok(Rescheduled::Moved(saved))
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.slug)
    }
}
