//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::config::{ConfigStore, SkillsConfig};

/// Paths and settings shared by every command.
///
/// Frontends create this once and pass it to commands; tests build it over
/// temporary directories.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    project_root: PathBuf,
    config: SkillsConfig,
}

impl AppContext {
    /// Create a new context with explicit paths and default settings.
    pub fn new(home_dir: PathBuf, project_root: PathBuf) -> Self {
        Self {
            home_dir,
            project_root,
            config: SkillsConfig::default(),
        }
    }

    /// Create context from the user's home, the current directory and the
    /// user config file.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let project_root = std::env::current_dir()?;
        let config = ConfigStore::from_defaults()?.load()?;

        Ok(Self::new(home_dir, project_root).with_config(config))
    }

    pub fn with_config(mut self, config: SkillsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &SkillsConfig {
        &self.config
    }
}
