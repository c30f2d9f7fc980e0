//! Skill records and their discovery.

pub mod discovery;
pub mod linker;
pub mod manifest;

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{FormatReason, Result, SkillError};
use crate::types::Scope;

pub use discovery::{Discovery, DiscoveryWarning, SkillDiscovery};
pub use linker::{InstalledLink, LinkStore, SkillLinker};
pub use manifest::{MANIFEST_FILE, Manifest, parse_manifest};

/// A skill package found on disk.
///
/// Equality, hashing and ordering only look at `(scope, name)`.
#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub scope: Scope,
    pub name: String,
    pub description: String,
    /// Directory containing `SKILL.md`.
    pub path: PathBuf,
}

impl Skill {
    pub fn new(
        scope: Scope,
        name: impl Into<String>,
        description: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scope,
            name: name.into(),
            description: description.into(),
            path: path.into(),
        }
    }

    /// Load a skill from a directory containing `SKILL.md`.
    ///
    /// The manifest's `name` wins over the directory name.
    pub fn from_directory(path: &Path, scope: Scope) -> Result<Self> {
        let manifest_path = path.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(SkillError::format(path, FormatReason::NoManifest));
        }

        let manifest = parse_manifest(&manifest_path)?;
        let name = match manifest.name {
            Some(name) => name,
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| SkillError::format(path, FormatReason::NoManifest))?,
        };

        Ok(Self {
            scope,
            name,
            description: manifest.description,
            path: path.to_path_buf(),
        })
    }
}

impl PartialEq for Skill {
    fn eq(&self, other: &Self) -> bool {
        self.scope == other.scope && self.name == other.name
    }
}

impl Eq for Skill {}

impl Hash for Skill {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scope.hash(state);
        self.name.hash(state);
    }
}

impl PartialOrd for Skill {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Skill {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.scope, &self.name).cmp(&(other.scope, &other.name))
    }
}
