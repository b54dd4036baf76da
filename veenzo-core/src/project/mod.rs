//! Project directory management.
//!
//! A project is a directory under the data dir holding one `.ics` file per
//! stored event, plus `.veenzo/config.toml` for the connected remote.

pub mod config;
mod event;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{VeenzoError, VeenzoResult};
use crate::event_spec::EventSpec;
use crate::persisted::{PersistedEvent, rows_from_spec};
use crate::project::config::{ProjectConfig, RemoteConfig};
use crate::project::event::StoredEvent;
use crate::store::EventStore;

#[derive(Clone)]
pub struct Project {
    pub slug: String,
    pub config: ProjectConfig,
    path: PathBuf,
}

impl Project {
    /// Create the project directory (and its config) if missing.
    pub fn create(data_dir: &Path, slug: &str) -> VeenzoResult<Self> {
        let slug = slug::slugify(slug);
        if slug.is_empty() {
            return Err(VeenzoError::Config("Project name is empty".into()));
        }

        let path = data_dir.join(&slug);
        let config = ProjectConfig::load(&path)?;
        let project = Project { slug, config, path };
        project.save_config()?;
        Ok(project)
    }

    pub fn load(data_dir: &Path, slug: &str) -> VeenzoResult<Self> {
        let path = data_dir.join(slug);
        if !path.join(".veenzo").exists() {
            return Err(VeenzoError::ProjectNotFound(slug.to_string()));
        }

        let config = ProjectConfig::load(&path)?;
        Ok(Project {
            slug: slug.to_string(),
            config,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_config(&self) -> VeenzoResult<()> {
        self.config.save(&self.path)
    }

    /// The connected remote calendar, if any
    pub fn remote(&self) -> Option<&RemoteConfig> {
        self.config.remote.as_ref()
    }

    pub fn set_remote(&mut self, remote: RemoteConfig) -> VeenzoResult<()> {
        self.config.remote = Some(remote);
        self.save_config()
    }

    /// Validate, expand and store every occurrence of `spec`.
    ///
    /// Returns the stored rows, ascending by start.
    pub fn create_from_spec(
        &self,
        spec: &EventSpec,
        creator: &str,
    ) -> VeenzoResult<Vec<PersistedEvent>> {
        spec.validate()?;

        let rows = rows_from_spec(spec, &self.slug, creator);
        for row in &rows {
            self.insert(row)?;
        }

        info!(
            project = %self.slug,
            title = %spec.title,
            count = rows.len(),
            "stored event occurrences"
        );
        Ok(rows)
    }

    pub fn events_on(&self, date: NaiveDate) -> VeenzoResult<Vec<PersistedEvent>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| e.date() == date)
            .collect())
    }

    /// Delete every event starting on `date`. Returns the removed rows.
    pub fn delete_on_date(&self, date: NaiveDate) -> VeenzoResult<Vec<PersistedEvent>> {
        let ids: Vec<String> = self.events_on(date)?.into_iter().map(|e| e.id).collect();
        self.delete_many(&ids)
    }

    fn stored_events(&self) -> VeenzoResult<Vec<StoredEvent>> {
        let entries = std::fs::read_dir(&self.path)?;

        let stored = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "ics"))
            .filter_map(|path| match StoredEvent::from_file(path) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable event file");
                    None
                }
            })
            .collect();

        Ok(stored)
    }
}

impl EventStore for Project {
    fn insert(&self, event: &PersistedEvent) -> VeenzoResult<()> {
        std::fs::create_dir_all(&self.path)?;
        let stored = StoredEvent::create(&self.path, event)?;
        debug!(id = %event.id, path = %stored.path.display(), "inserted event");
        Ok(())
    }

    fn list(&self) -> VeenzoResult<Vec<PersistedEvent>> {
        let mut events: Vec<PersistedEvent> = self
            .stored_events()?
            .into_iter()
            .map(|stored| stored.event)
            .collect();
        events.sort_by(|a, b| {
            a.occurrence
                .start
                .cmp(&b.occurrence.start)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(events)
    }

    fn delete(&self, id: &str) -> VeenzoResult<Option<PersistedEvent>> {
        let Some(stored) = self.stored_events()?.into_iter().find(|s| s.event.id == id) else {
            return Ok(None);
        };
        stored.remove()?;
        debug!(id, "deleted event");
        Ok(Some(stored.event))
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.slug)
    }
}
