//! An event together with the .ics file it lives in.

use std::path::{Path, PathBuf};

use crate::error::{DaybookError, DaybookResult};
use crate::event::Event;
use crate::ics::{generate_ics, parse_event};

const MAX_SLUG_COLLISIONS: usize = 100;

#[derive(Debug, Clone)]
pub struct EventFile {
    pub event: Event,
    pub path: PathBuf,
}

impl EventFile {
    pub fn from_file(path: PathBuf) -> DaybookResult<Self> {
        let content = std::fs::read_to_string(&path)?;

        let event = parse_event(&content).ok_or_else(|| {
            DaybookError::IcsParse(format!("Failed to parse event from {}", path.display()))
        })?;

        Ok(EventFile { event, path })
    }

    /// Written to a temp file first, then renamed over `path`.
    pub fn save(&self) -> DaybookResult<()> {
        let ics_content = generate_ics(&self.event)?;
        let tmp = self.path.with_extension("ics.tmp");
        std::fs::write(&tmp, ics_content)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Whether `path` is still a valid name for `event` (its base name, or
    /// the base name with a collision suffix).
    pub fn name_fits(path: &Path, event: &Event) -> bool {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return false;
        };
        let base = Self::base_slug_for(event);
        match stem.strip_prefix(base.as_str()) {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix('-')
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
            None => false,
        }
    }

    /// A file name in `dir` not taken by another event.
    pub fn unique_path_for(event: &Event, dir: &Path) -> DaybookResult<PathBuf> {
        let base = Self::base_slug_for(event);

        let candidate = dir.join(format!("{}.ics", base));
        if !candidate.exists() {
            return Ok(candidate);
        }

        for n in 2..=MAX_SLUG_COLLISIONS {
            let candidate = dir.join(format!("{}-{}.ics", base, n));
            if !candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(DaybookError::Config(format!(
            "Too many event name collisions for '{}'",
            base
        )))
    }

    /// Timed events: `YYYY-MM-DDTHHMM__slug`
    /// All-day and untimed events: `YYYY-MM-DD__slug`
    ///
    /// Dates are UTC so names don't depend on the viewer's zone.
    fn base_slug_for(event: &Event) -> String {
        let mut title_slug = slug::slugify(&event.title);
        if title_slug.is_empty() {
            title_slug = "event".to_string();
        }

        let date = if event.is_timed() {
            event.datetime.format("%Y-%m-%dT%H%M")
        } else {
            event.datetime.format("%Y-%m-%d")
        };

        format!("{}__{}", date, title_slug)
    }
}
