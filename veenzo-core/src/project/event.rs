//! Stored event with file metadata.

use std::path::{Path, PathBuf};

use crate::error::{VeenzoError, VeenzoResult};
use crate::ics::{generate_ics, parse_event};
use crate::persisted::PersistedEvent;

/// A project event stored as an ics file
#[derive(Debug, Clone)]
pub struct StoredEvent {
    pub event: PersistedEvent,
    pub path: PathBuf,
}

impl StoredEvent {
    pub fn from_file(path: PathBuf) -> VeenzoResult<Self> {
        let content = std::fs::read_to_string(&path)?;

        let event = parse_event(&content).ok_or_else(|| {
            VeenzoError::IcsParse(format!("Failed to parse event from {}", path.display()))
        })?;

        Ok(StoredEvent { event, path })
    }

    /// Write `event` into `dir` under a file name that doesn't collide.
    pub fn create(dir: &Path, event: &PersistedEvent) -> VeenzoResult<Self> {
        let slug = Self::unique_slug_for(dir, event)?;
        let stored = StoredEvent {
            event: event.clone(),
            path: dir.join(format!("{}.ics", slug)),
        };
        stored.save()?;
        Ok(stored)
    }

    pub fn save(&self) -> VeenzoResult<()> {
        let ics_content = generate_ics(&self.event);
        std::fs::write(&self.path, ics_content)?;
        Ok(())
    }

    pub fn remove(&self) -> VeenzoResult<()> {
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    fn unique_slug_for(dir: &Path, event: &PersistedEvent) -> VeenzoResult<String> {
        let base = Self::base_slug_for(event);

        if !dir.join(format!("{}.ics", base)).exists() {
            return Ok(base);
        }

        for n in 2..=100 {
            let suffixed = format!("{}-{}", base, n);
            if !dir.join(format!("{}.ics", suffixed)).exists() {
                return Ok(suffixed);
            }
        }

        Err(VeenzoError::Config(format!(
            "Too many event file name collisions for '{}'",
            base
        )))
    }

    /// `YYYY-MM-DDTHHMM__slug`, in the event's own zone.
    fn base_slug_for(event: &PersistedEvent) -> String {
        let title_slug = slug::slugify(&event.title);
        let title_slug = if title_slug.is_empty() {
            "event".to_string()
        } else {
            title_slug
        };

        format!(
            "{}__{}",
            event.occurrence.start.format("%Y-%m-%dT%H%M"),
            title_slug
        )
    }
}
