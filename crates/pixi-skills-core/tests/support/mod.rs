//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use pixi_skills_core::context::AppContext;
use pixi_skills_core::skills::discovery::{
    ENVS_DIR, PIXI_DIR, SKILL_PACKAGE_PREFIX, SKILLS_SUBDIR,
};

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create_dir_all should succeed in test temp dirs");
    }
    fs::write(path, content).expect("write should succeed in test temp dirs");
}

/// Manifest text with a description and no name.
pub fn manifest(description: &str) -> String {
    format!("---\ndescription: \"{description}\"\n---\n\n# Instructions\n")
}

/// A home directory and a project directory, both temporary.
pub struct Fixture {
    pub home: TempDir,
    pub project: TempDir,
    pub ctx: AppContext,
}

impl Fixture {
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("tempdir should succeed");
        let project = tempfile::tempdir().expect("tempdir should succeed");
        let ctx = AppContext::new(home.path().to_path_buf(), project.path().to_path_buf());
        Self { home, project, ctx }
    }

    /// `<project>/.pixi/envs/<env>/share/agent-skills`
    pub fn local_root(&self, env: &str) -> PathBuf {
        self.project
            .path()
            .join(PIXI_DIR)
            .join(ENVS_DIR)
            .join(env)
            .join(SKILLS_SUBDIR)
    }

    /// `~/.pixi/envs/agent-skill-<package>/share/agent-skills`
    pub fn global_root(&self, package: &str) -> PathBuf {
        self.home
            .path()
            .join(PIXI_DIR)
            .join(ENVS_DIR)
            .join(format!("{SKILL_PACKAGE_PREFIX}{package}"))
            .join(SKILLS_SUBDIR)
    }

    pub fn local_skill(&self, env: &str, dir: &str, content: &str) -> PathBuf {
        let path = self.local_root(env).join(dir);
        write_file(&path.join("SKILL.md"), content);
        path
    }

    pub fn global_skill(&self, package: &str, dir: &str, content: &str) -> PathBuf {
        let path = self.global_root(package).join(dir);
        write_file(&path.join("SKILL.md"), content);
        path
    }
}

pub fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize should succeed for existing paths")
}
