//! Symlink management inside backend skill directories.
//!
//! Every mutation first checks that the entry it touches is a symlink, so
//! user-owned files and directories are never removed or overwritten.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use super::Skill;
use crate::backend::Backend;
use crate::context::AppContext;
use crate::error::{Result, SkillError};
use crate::types::Scope;

/// A symlink observed in a backend skills directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct InstalledLink {
    pub name: String,
    /// Canonical target, or the lexically resolved one when `dangling`.
    pub target: PathBuf,
    pub dangling: bool,
}

/// Link operations the reconciliation code drives.
pub trait LinkStore {
    fn backend(&self) -> Backend;

    /// Names of the symlinks present for `scope`.
    fn installed_names(&self, scope: Scope) -> Result<BTreeSet<String>>;

    /// Link `skill`, returning the symlink path.
    fn install(&self, skill: &Skill) -> Result<PathBuf>;

    /// Remove the symlink `name`; `false` when there was none.
    fn uninstall(&self, name: &str, scope: Scope) -> Result<bool>;
}

/// Creates and removes relative skill symlinks for one backend.
#[derive(Debug, Clone)]
pub struct SkillLinker {
    backend: Backend,
    local_dir: PathBuf,
    global_dir: PathBuf,
}

impl SkillLinker {
    pub fn new(backend: Backend, ctx: &AppContext) -> Self {
        Self {
            backend,
            local_dir: backend.skills_dir(Scope::Local, ctx),
            global_dir: backend.skills_dir(Scope::Global, ctx),
        }
    }

    /// One linker per backend.
    pub fn for_backends(backends: &[Backend], ctx: &AppContext) -> Vec<Self> {
        backends.iter().map(|b| Self::new(*b, ctx)).collect()
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn skills_dir(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Local => &self.local_dir,
            Scope::Global => &self.global_dir,
        }
    }

    /// Symlinks in the scope's skills directory, sorted by name.
    ///
    /// Regular files and directories are ignored.
    pub fn list_installed(&self, scope: Scope) -> Result<Vec<InstalledLink>> {
        let dir = self.skills_dir(scope);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut links = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| SkillError::io_at("read", dir, e))? {
            let entry = entry.map_err(|e| SkillError::io_at("read entry in", dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| SkillError::io_at("stat", &entry.path(), e))?;
            if !file_type.is_symlink() {
                continue;
            }

            let path = entry.path();
            let (target, dangling) = resolve_link(&path)?;
            links.push(InstalledLink {
                name: entry.file_name().to_string_lossy().into_owned(),
                target,
                dangling,
            });
        }
        links.sort();
        Ok(links)
    }

    /// Link `skill` into its scope's skills directory.
    ///
    /// Idempotent when the link already points at the skill; replaces a
    /// symlink pointing anywhere else; refuses to touch anything that is
    /// not a symlink.
    pub fn install(&self, skill: &Skill) -> Result<PathBuf> {
        ensure_entry_name(&skill.name)?;

        let dir = self.skills_dir(skill.scope);
        fs::create_dir_all(dir).map_err(|e| SkillError::io_at("create", dir, e))?;

        let link = dir.join(&skill.name);
        let target = fs::canonicalize(&skill.path)
            .map_err(|e| SkillError::io_at("resolve skill directory", &skill.path, e))?;

        match fs::symlink_metadata(&link) {
            Ok(meta) if meta.file_type().is_symlink() => {
                if fs::canonicalize(&link).is_ok_and(|current| current == target) {
                    tracing::debug!(link = %link.display(), "skill already linked");
                    return Ok(link);
                }
                tracing::debug!(link = %link.display(), "replacing existing symlink");
                remove_symlink(&link).map_err(|e| SkillError::io_at("remove", &link, e))?;
            }
            Ok(_) => return Err(SkillError::Conflict { path: link }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(SkillError::io_at("inspect", &link, e)),
        }

        let base = fs::canonicalize(dir).map_err(|e| SkillError::io_at("resolve", dir, e))?;
        let relative = pathdiff::diff_paths(&target, &base).ok_or_else(|| {
            SkillError::io(
                format!(
                    "Failed to compute relative path from {} to {}",
                    base.display(),
                    target.display()
                ),
                io::Error::from(io::ErrorKind::InvalidInput),
            )
        })?;

        create_dir_symlink(&relative, &link)
            .map_err(|e| SkillError::io_at("create symlink", &link, e))?;
        tracing::debug!(
            backend = %self.backend,
            link = %link.display(),
            target = %relative.display(),
            "linked skill"
        );
        Ok(link)
    }

    /// Remove the symlink `name` from the scope's skills directory.
    ///
    /// Returns `false` when there is no entry or the entry is not a symlink.
    pub fn uninstall(&self, name: &str, scope: Scope) -> Result<bool> {
        ensure_entry_name(name)?;

        let link = self.skills_dir(scope).join(name);
        match fs::symlink_metadata(&link) {
            Ok(meta) if meta.file_type().is_symlink() => {
                remove_symlink(&link).map_err(|e| SkillError::io_at("remove", &link, e))?;
                tracing::debug!(backend = %self.backend, link = %link.display(), "unlinked skill");
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SkillError::io_at("inspect", &link, e)),
        }
    }

    /// Whether a symlink for `skill` exists and resolves to its directory.
    pub fn is_installed(&self, skill: &Skill) -> bool {
        let link = self.skills_dir(skill.scope).join(&skill.name);
        let is_symlink = fs::symlink_metadata(&link)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if !is_symlink {
            return false;
        }
        match (fs::canonicalize(&link), fs::canonicalize(&skill.path)) {
            (Ok(current), Ok(expected)) => current == expected,
            _ => false,
        }
    }
}

impl LinkStore for SkillLinker {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn installed_names(&self, scope: Scope) -> Result<BTreeSet<String>> {
        Ok(self
            .list_installed(scope)?
            .into_iter()
            .map(|link| link.name)
            .collect())
    }

    fn install(&self, skill: &Skill) -> Result<PathBuf> {
        SkillLinker::install(self, skill)
    }

    fn uninstall(&self, name: &str, scope: Scope) -> Result<bool> {
        SkillLinker::uninstall(self, name, scope)
    }
}

fn ensure_entry_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SkillError::InvalidName {
            name: name.to_string(),
        }),
    }
}

/// Canonical target of `link`, falling back to a lexical resolution for
/// dangling links.
fn resolve_link(link: &Path) -> Result<(PathBuf, bool)> {
    if let Ok(target) = fs::canonicalize(link) {
        return Ok((target, false));
    }

    let raw = fs::read_link(link).map_err(|e| SkillError::io_at("read link", link, e))?;
    let joined = match link.parent() {
        Some(parent) if raw.is_relative() => parent.join(&raw),
        _ => raw,
    };
    Ok((normalize_lexically(&joined), true))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(unix)]
fn create_dir_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_dir_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_dir_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Symlinks are not supported on this platform",
    ))
}

#[cfg(windows)]
fn remove_symlink(link: &Path) -> io::Result<()> {
    fs::remove_dir(link).or_else(|_| fs::remove_file(link))
}

#[cfg(not(windows))]
fn remove_symlink(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}
