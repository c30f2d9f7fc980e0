//! Manage command implementation.
//!
//! Lets the user pick which skills of a scope are linked into a backend,
//! then installs and uninstalls symlinks to match the selection.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::backend::Backend;
use crate::commands::scope::resolve_env_scope;
use crate::context::AppContext;
use crate::orchestration::{ReconcilePlan, ReconcileReport, apply_plan};
use crate::skills::discovery::DEFAULT_ENV;
use crate::skills::{DiscoveryWarning, LinkStore, Skill, SkillDiscovery, SkillLinker};
use crate::types::Scope;

/// Interactive choices the manage flow needs from the user.
///
/// Every method returns `Ok(None)` when the user aborts.
pub trait ManagePrompter {
    fn select_backend(&mut self, backends: &[Backend]) -> anyhow::Result<Option<Backend>>;

    fn select_scope(&mut self, scopes: &[Scope]) -> anyhow::Result<Option<Scope>>;

    /// `checked[i]` is the initial state of `skills[i]`.
    fn select_skills(
        &mut self,
        skills: &[Skill],
        checked: &[bool],
    ) -> anyhow::Result<Option<Vec<Skill>>>;

    /// Progress message shown between prompts.
    fn notify(&mut self, _message: &str) {}
}

/// Which skills start checked in the selector.
///
/// Installed skills are pre-checked; with nothing installed yet, all are.
pub fn initial_selection(skills: &[Skill], installed: &BTreeSet<String>) -> Vec<bool> {
    skills
        .iter()
        .map(|s| installed.is_empty() || installed.contains(&s.name))
        .collect()
}

/// Options for the manage command
#[derive(Debug, Clone)]
pub struct ManageOptions {
    /// Backend to manage; prompted (or taken from config) when absent
    pub backend: Option<Backend>,
    /// Scope to manage; prompted when absent
    pub scope: Option<Scope>,
    /// Pixi environment searched for local skills
    pub env: String,
}

impl Default for ManageOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ManageOptions {
    pub fn new() -> Self {
        Self {
            backend: None,
            scope: None,
            env: DEFAULT_ENV.to_string(),
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = env.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum ManageOutcome {
    /// The user aborted a prompt; nothing was changed.
    Cancelled,
    /// The selection already matches the installed links.
    NoChanges,
    Applied(ReconcileReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct ManageReport {
    pub backend: Option<Backend>,
    pub scope: Option<Scope>,
    pub skills_dir: Option<PathBuf>,
    pub warnings: Vec<DiscoveryWarning>,
    pub outcome: ManageOutcome,
}

impl ManageReport {
    fn cancelled(backend: Option<Backend>, scope: Option<Scope>) -> Self {
        Self {
            backend,
            scope,
            skills_dir: None,
            warnings: Vec::new(),
            outcome: ManageOutcome::Cancelled,
        }
    }
}

#[derive(Debug)]
pub struct ManageCommand {
    ctx: AppContext,
}

impl ManageCommand {
    pub fn new(ctx: &AppContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    pub fn execute(
        &self,
        options: &ManageOptions,
        prompter: &mut dyn ManagePrompter,
    ) -> anyhow::Result<ManageReport> {
        let requested_scope = resolve_env_scope(options.scope, &options.env)?;

        let backend = match options.backend.or(self.ctx.config().default_backend) {
            Some(backend) => backend,
            None => match prompter.select_backend(&Backend::ALL)? {
                Some(backend) => backend,
                None => return Ok(ManageReport::cancelled(None, None)),
            },
        };

        let scope = match requested_scope {
            Some(scope) => {
                if options.scope.is_none() {
                    prompter.notify("Using the local scope as environment was requested");
                }
                scope
            }
            None => match prompter.select_scope(&Scope::ALL)? {
                Some(scope) => scope,
                None => return Ok(ManageReport::cancelled(Some(backend), None)),
            },
        };

        let linker = SkillLinker::new(backend, &self.ctx);
        let skills_dir = linker.skills_dir(scope).to_path_buf();
        prompter.notify(&format!("Managing {}", skills_dir.display()));

        let found = SkillDiscovery::new(&self.ctx)
            .discover(scope, &options.env)?
            .sorted();
        if found.is_empty() {
            for warning in &found.warnings {
                prompter.notify(&warning.to_string());
            }
            anyhow::bail!("No {} skills available.", scope);
        }

        let installed = linker.installed_names(scope)?;
        let checked = initial_selection(&found.skills, &installed);

        let Some(selected) = prompter.select_skills(&found.skills, &checked)? else {
            return Ok(ManageReport {
                skills_dir: Some(skills_dir),
                warnings: found.warnings,
                ..ManageReport::cancelled(Some(backend), Some(scope))
            });
        };

        let plan = ReconcilePlan::new(&selected, &installed);
        let outcome = if plan.is_empty() {
            ManageOutcome::NoChanges
        } else {
            ManageOutcome::Applied(apply_plan(&linker, scope, &plan))
        };

        Ok(ManageReport {
            backend: Some(backend),
            scope: Some(scope),
            skills_dir: Some(skills_dir),
            warnings: found.warnings,
            outcome,
        })
    }
}
