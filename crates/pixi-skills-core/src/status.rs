//! Status collection for linked skills.
//!
//! Reports, per backend and scope, which symlinks exist and where they
//! resolve to.

use std::path::PathBuf;

use serde::Serialize;

use crate::backend::{Backend, BackendRegistry};
use crate::context::AppContext;
use crate::skills::{InstalledLink, SkillLinker};
use crate::types::Scope;

/// Options for the status command
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Only report this backend
    pub backend: Option<Backend>,
}

impl StatusOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopeStatus {
    pub scope: Scope,
    pub skills_dir: PathBuf,
    pub installed: Vec<InstalledLink>,
    /// Set when the directory could not be read; `installed` is then empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackendStatus {
    pub backend: Backend,
    pub scopes: Vec<ScopeStatus>,
}

impl BackendStatus {
    pub fn scope(&self, scope: Scope) -> Option<&ScopeStatus> {
        self.scopes.iter().find(|s| s.scope == scope)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub backends: Vec<BackendStatus>,
}

impl StatusReport {
    pub fn backend(&self, backend: Backend) -> Option<&BackendStatus> {
        self.backends.iter().find(|b| b.backend == backend)
    }

    /// Backend directories that could not be read.
    pub fn errors(&self) -> usize {
        self.backends
            .iter()
            .flat_map(|b| &b.scopes)
            .filter(|s| s.error.is_some())
            .count()
    }

    /// Links whose target no longer exists.
    pub fn dangling(&self) -> usize {
        self.backends
            .iter()
            .flat_map(|b| &b.scopes)
            .flat_map(|s| &s.installed)
            .filter(|link| link.dangling)
            .count()
    }
}

#[derive(Debug)]
pub struct StatusCommand {
    ctx: AppContext,
    registry: BackendRegistry,
}

impl StatusCommand {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            registry: BackendRegistry::with_default_backends(),
        }
    }

    pub fn execute(&self, options: &StatusOptions) -> anyhow::Result<StatusReport> {
        let mut backends = Vec::new();

        for backend in self.registry.selected(options.backend) {
            let linker = SkillLinker::new(backend, &self.ctx);
            let mut scopes = Vec::new();
            for scope in Scope::ALL {
                let (installed, error) = match linker.list_installed(scope) {
                    Ok(installed) => (installed, None),
                    Err(err) => {
                        tracing::warn!(%backend, %scope, error = %err, "cannot list links");
                        (Vec::new(), Some(err.to_string()))
                    }
                };
                scopes.push(ScopeStatus {
                    scope,
                    skills_dir: linker.skills_dir(scope).to_path_buf(),
                    installed,
                    error,
                });
            }
            backends.push(BackendStatus { backend, scopes });
        }

        Ok(StatusReport { backends })
    }
}
