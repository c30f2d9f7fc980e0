//! Skill discovery in local and global pixi environments.
//!
//! Local skills live in `<project>/.pixi/envs/<env>/share/agent-skills/*`,
//! global ones in `~/.pixi/envs/agent-skill-*/share/agent-skills/*`. A
//! directory only counts when it directly contains `SKILL.md`; invalid
//! manifests are reported as warnings and never stop the scan.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use super::{MANIFEST_FILE, Skill};
use crate::context::AppContext;
use crate::types::Scope;

pub const PIXI_DIR: &str = ".pixi";
pub const ENVS_DIR: &str = "envs";
pub const SKILLS_SUBDIR: &str = "share/agent-skills";
pub const SKILL_PACKAGE_PREFIX: &str = "agent-skill-";
pub const DEFAULT_ENV: &str = "default";

/// Package name that ships the skill `name`.
pub fn package_name(name: &str) -> String {
    format!("{SKILL_PACKAGE_PREFIX}{name}")
}

/// A skill directory that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for DiscoveryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipping invalid skill at {}: {}",
            self.path.display(),
            self.message
        )
    }
}

/// Outcome of one discovery pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Discovery {
    pub skills: Vec<Skill>,
    pub warnings: Vec<DiscoveryWarning>,
}

impl Discovery {
    /// Skills ordered by `(scope, name)`.
    pub fn sorted(mut self) -> Self {
        self.skills.sort();
        self
    }

    pub fn find(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    fn consider(&mut self, dir: &Path, scope: Scope) {
        if !dir.is_dir() || !dir.join(MANIFEST_FILE).exists() {
            return;
        }
        match Skill::from_directory(dir, scope) {
            Ok(skill) => self.skills.push(skill),
            Err(err) => self.warn(dir, err.to_string()),
        }
    }

    fn warn(&mut self, path: &Path, message: String) {
        tracing::debug!(path = %path.display(), %message, "skipping skill");
        self.warnings.push(DiscoveryWarning {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// Finds skills for the project and user of an [`AppContext`].
#[derive(Debug, Clone)]
pub struct SkillDiscovery {
    home_dir: PathBuf,
    project_root: PathBuf,
}

impl SkillDiscovery {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            home_dir: ctx.home_dir().to_path_buf(),
            project_root: ctx.project_root().to_path_buf(),
        }
    }

    /// `<project>/.pixi/envs/<env>/share/agent-skills`
    pub fn local_skills_dir(&self, env: &str) -> PathBuf {
        self.project_root
            .join(PIXI_DIR)
            .join(ENVS_DIR)
            .join(env)
            .join(SKILLS_SUBDIR)
    }

    /// `~/.pixi/envs`
    pub fn global_envs_dir(&self) -> PathBuf {
        self.home_dir.join(PIXI_DIR).join(ENVS_DIR)
    }

    pub fn discover(&self, scope: Scope, env: &str) -> anyhow::Result<Discovery> {
        match scope {
            Scope::Local => self.discover_local(env),
            Scope::Global => self.discover_global(),
        }
    }

    /// Skills installed into the project environment `env`.
    pub fn discover_local(&self, env: &str) -> anyhow::Result<Discovery> {
        let base = self.local_skills_dir(env);
        let mut discovery = Discovery::default();
        if !base.exists() {
            return Ok(discovery);
        }

        let entries = fs::read_dir(&base)
            .with_context(|| format!("Failed to read skills directory: {}", base.display()))?;
        for entry in entries {
            match entry {
                Ok(entry) => discovery.consider(&entry.path(), Scope::Local),
                Err(err) => discovery.warn(&base, err.to_string()),
            }
        }
        Ok(discovery)
    }

    /// Skills shipped by `agent-skill-*` global environments.
    pub fn discover_global(&self) -> anyhow::Result<Discovery> {
        let envs = self.global_envs_dir();
        let mut discovery = Discovery::default();
        if !envs.exists() {
            return Ok(discovery);
        }

        let root = envs
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Non UTF-8 path: {}", envs.display()))?;
        let pattern = format!(
            "{}/{}*/{}/*",
            glob::Pattern::escape(root),
            SKILL_PACKAGE_PREFIX,
            SKILLS_SUBDIR
        );

        for entry in glob::glob(&pattern).context("Invalid global skills pattern")? {
            match entry {
                Ok(path) => discovery.consider(&path, Scope::Global),
                Err(err) => {
                    let path = err.path().to_path_buf();
                    discovery.warn(&path, err.error().to_string());
                }
            }
        }
        Ok(discovery)
    }

    /// Names of global `agent-skill-*` environments.
    ///
    /// Does not look at manifests, so broken packages are still listed.
    pub fn global_packages(&self) -> anyhow::Result<Vec<String>> {
        let envs = self.global_envs_dir();
        if !envs.exists() {
            return Ok(Vec::new());
        }

        let mut packages = Vec::new();
        for entry in fs::read_dir(&envs)
            .with_context(|| format!("Failed to read environments: {}", envs.display()))?
        {
            let entry =
                entry.with_context(|| format!("Failed to read dir entry: {}", envs.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(SKILL_PACKAGE_PREFIX) && entry.path().is_dir() {
                packages.push(name);
            }
        }
        packages.sort();
        Ok(packages)
    }

    /// Global environment that provides `skill`, if it is a global skill.
    pub fn package_of(&self, skill: &Skill) -> Option<String> {
        if skill.scope != Scope::Global {
            return None;
        }
        let rel = skill.path.strip_prefix(self.global_envs_dir()).ok()?;
        rel.components()
            .next()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
    }
}
