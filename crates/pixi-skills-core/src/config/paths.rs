//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join("pixi-skills").join(CONFIG_FILE)
}
