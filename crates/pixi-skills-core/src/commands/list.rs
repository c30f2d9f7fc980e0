//! List command implementation.
//!
//! Shows the skills discovered per scope without touching any backend.

use serde::Serialize;

use crate::commands::scope::{resolve_env_scope, scopes_for};
use crate::context::AppContext;
use crate::skills::discovery::DEFAULT_ENV;
use crate::skills::{DiscoveryWarning, Skill, SkillDiscovery};
use crate::types::Scope;

/// Options for the list command
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Only list this scope
    pub scope: Option<Scope>,
    /// Pixi environment searched for local skills
    pub env: String,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self {
            scope: None,
            env: DEFAULT_ENV.to_string(),
        }
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

/// Skills found for one scope.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeListing {
    pub scope: Scope,
    pub skills: Vec<Skill>,
    pub warnings: Vec<DiscoveryWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListReport {
    pub sections: Vec<ScopeListing>,
}

impl ListReport {
    pub fn warnings(&self) -> impl Iterator<Item = &DiscoveryWarning> {
        self.sections.iter().flat_map(|s| s.warnings.iter())
    }
}

#[derive(Debug)]
pub struct ListCommand {
    discovery: SkillDiscovery,
}

impl ListCommand {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            discovery: SkillDiscovery::new(ctx),
        }
    }

    pub fn execute(&self, options: &ListOptions) -> anyhow::Result<ListReport> {
        let filter = resolve_env_scope(options.scope, &options.env)?;

        let mut sections = Vec::new();
        for scope in scopes_for(filter) {
            let found = self.discovery.discover(scope, &options.env)?.sorted();
            sections.push(ScopeListing {
                scope,
                skills: found.skills,
                warnings: found.warnings,
            });
        }

        Ok(ListReport { sections })
    }
}
