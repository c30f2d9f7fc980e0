//! Config store for loading the user config file.

use std::path::{Path, PathBuf};

use super::{SkillsConfig, parser, paths::config_path};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn from_defaults() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(Self::from_config_dir(&config_dir))
    }

    pub fn from_config_dir(config_dir: &Path) -> Self {
        Self {
            config_path: config_path(config_dir),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> anyhow::Result<SkillsConfig> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(SkillsConfig::default());
        }
        parser::parse_config(&self.config_path)
    }
}
