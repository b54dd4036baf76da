//! Veenzo root: global configuration plus project discovery.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};

use crate::error::{VeenzoError, VeenzoResult};
use crate::project::Project;
use crate::veenzo_config::VeenzoConfig;

#[derive(Clone)]
pub struct Veenzo {
    config: VeenzoConfig,
}

impl Veenzo {
    /// Load ~/.config/veenzo/config.toml (created with defaults on first run),
    /// with `VEENZO_*` environment overrides.
    pub fn load() -> VeenzoResult<Self> {
        let config_path = VeenzoConfig::config_path()?;

        if !config_path.exists() {
            VeenzoConfig::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> VeenzoResult<Self> {
        let config: VeenzoConfig = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("VEENZO").separator("__"))
            .build()
            .map_err(|e| VeenzoError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| VeenzoError::Config(e.to_string()))?;

        Ok(Veenzo { config })
    }

    pub fn from_config(config: VeenzoConfig) -> Self {
        Veenzo { config }
    }

    pub fn config(&self) -> &VeenzoConfig {
        &self.config
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.config.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Discover projects by scanning data_dir for subdirectories
    /// with .veenzo/ markers.
    pub fn projects(&self) -> Vec<Project> {
        let data_path = self.data_path();

        let Ok(entries) = std::fs::read_dir(&data_path) else {
            return Vec::new();
        };

        let mut projects: Vec<Project> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && path.join(".veenzo").exists())
            .filter_map(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|name| Project::load(&data_path, name).ok())
            })
            .collect();

        projects.sort_by(|a, b| a.slug.cmp(&b.slug));
        projects
    }

    pub fn project(&self, slug: &str) -> VeenzoResult<Project> {
        Project::load(&self.data_path(), slug)
    }

    pub fn create_project(&self, name: &str) -> VeenzoResult<Project> {
        Project::create(&self.data_path(), name)
    }

    /// Pick the project named on the command line, else the configured
    /// default, else the only project there is.
    pub fn resolve_project(&self, slug: Option<&str>) -> VeenzoResult<Project> {
        if let Some(slug) = slug {
            return self.project(slug);
        }

        if let Some(default) = self.config.default_project.as_deref() {
            return self.project(default);
        }

        let mut projects = self.projects();
        match projects.len() {
            0 => Err(VeenzoError::Config(
                "No projects yet. Create one with `veenzo init <name>`".into(),
            )),
            1 => Ok(projects.remove(0)),
            _ => {
                let available: Vec<_> = projects.iter().map(|p| p.slug.as_str()).collect();
                Err(VeenzoError::Config(format!(
                    "Multiple projects found ({}). Use --project to specify one.",
                    available.join(", ")
                )))
            }
        }
    }
}
