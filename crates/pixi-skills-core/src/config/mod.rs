//! User configuration for pixi-skills.
//!
//! Read from `<config_dir>/pixi-skills/config.toml`. Every key is optional;
//! a missing file means defaults.

pub mod parser;
pub mod paths;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::backend::Backend;

pub use parser::{parse_config, parse_config_str};
pub use paths::{CONFIG_FILE, config_path};
pub use store::ConfigStore;

pub const DEFAULT_PIXI_PROGRAM: &str = "pixi";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SkillsConfig {
    /// Program used for package-manager calls.
    #[serde(default)]
    pub pixi: Option<String>,

    /// Backend `manage` uses when none is passed.
    #[serde(default)]
    pub default_backend: Option<Backend>,

    /// Channel for global installs when none is passed.
    #[serde(default)]
    pub channel: Option<String>,
}

impl SkillsConfig {
    pub fn pixi_program(&self) -> &str {
        self.pixi.as_deref().unwrap_or(DEFAULT_PIXI_PROGRAM)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(pixi) = &self.pixi
            && pixi.trim().is_empty()
        {
            anyhow::bail!("'pixi' must not be empty");
        }
        if let Some(channel) = &self.channel
            && channel.trim().is_empty()
        {
            anyhow::bail!("'channel' must not be empty");
        }
        Ok(())
    }
}
