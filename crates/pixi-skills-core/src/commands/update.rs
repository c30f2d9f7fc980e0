//! Update command implementation.
//!
//! Updates skill packages, then re-points existing backend links at the
//! updated skill directories.

use serde::Serialize;

use crate::backend::BackendRegistry;
use crate::context::AppContext;
use crate::orchestration::{ListingError, RelinkOutcome, relink};
use crate::package::{PackageManager, PackageRequest, PixiCli};
use crate::skills::discovery::{DEFAULT_ENV, package_name};
use crate::skills::{Skill, SkillDiscovery, SkillLinker};
use crate::types::Scope;

/// Options for the update command
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Skill to update; all skill packages when absent
    pub name: Option<String>,
    pub scope: Scope,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateOptions {
    /// Update every global skill package
    pub fn new() -> Self {
        Self {
            name: None,
            scope: Scope::Global,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.scope = if local { Scope::Local } else { Scope::Global };
        self
    }
}

/// Result of one package-manager call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutcome {
    /// `None` for a project-wide upgrade
    pub package: Option<String>,
    pub error: Option<String>,
}

impl PackageOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Report from an update operation
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub scope: Scope,
    pub packages: Vec<PackageOutcome>,
    pub relinked: Vec<RelinkOutcome>,
    /// Backend directories that could not be listed while re-linking
    pub listing_errors: Vec<ListingError>,
    pub warnings: Vec<String>,
}

impl UpdateReport {
    pub fn failures(&self) -> usize {
        self.packages.iter().filter(|p| !p.succeeded()).count()
            + self
                .relinked
                .iter()
                .filter(|r| r.action.is_failure())
                .count()
            + self.listing_errors.len()
    }
}

/// Update command orchestrator
#[derive(Debug)]
pub struct UpdateCommand<P = PixiCli> {
    ctx: AppContext,
    package_manager: P,
    registry: BackendRegistry,
}

impl UpdateCommand<PixiCli> {
    /// Update command driving the configured `pixi` executable
    pub fn with_context(ctx: &AppContext) -> Self {
        let pixi = PixiCli::new(ctx.config().pixi_program(), ctx.project_root());
        Self::new(ctx, pixi)
    }
}

impl<P: PackageManager> UpdateCommand<P> {
    pub fn new(ctx: &AppContext, package_manager: P) -> Self {
        Self {
            ctx: ctx.clone(),
            package_manager,
            registry: BackendRegistry::with_default_backends(),
        }
    }

    /// Execute the update command
    ///
    /// A failing package does not stop the others; failures are reported.
    pub fn execute(&self, options: &UpdateOptions) -> anyhow::Result<UpdateReport> {
        let discovery = SkillDiscovery::new(&self.ctx);
        let mut warnings = Vec::new();

        let (packages, skills) = match options.scope {
            Scope::Global => self.update_global(&discovery, options, &mut warnings)?,
            Scope::Local => self.update_local(&discovery, options, &mut warnings)?,
        };

        let linkers = SkillLinker::for_backends(self.registry.all(), &self.ctx);
        let relinked = relink(&skills, &linkers);

        Ok(UpdateReport {
            scope: options.scope,
            packages,
            relinked: relinked.outcomes,
            listing_errors: relinked.listing_errors,
            warnings,
        })
    }

    fn update_global(
        &self,
        discovery: &SkillDiscovery,
        options: &UpdateOptions,
        warnings: &mut Vec<String>,
    ) -> anyhow::Result<(Vec<PackageOutcome>, Vec<Skill>)> {
        let targets = match &options.name {
            Some(name) => vec![package_name(name)],
            None => discovery.global_packages()?,
        };
        if targets.is_empty() {
            warnings.push("No global skill packages installed".to_string());
            return Ok((Vec::new(), Vec::new()));
        }

        let outcomes: Vec<PackageOutcome> = targets
            .into_iter()
            .map(|package| {
                let request = PackageRequest::GlobalUpdate {
                    package: package.clone(),
                };
                self.outcome(Some(package), &request)
            })
            .collect();

        let found = discovery.discover_global()?;
        warnings.extend(found.warnings.iter().map(|w| w.to_string()));

        let updated: Vec<&str> = outcomes
            .iter()
            .filter(|o| o.succeeded())
            .filter_map(|o| o.package.as_deref())
            .collect();
        let skills = found
            .skills
            .into_iter()
            .filter(|skill| {
                discovery
                    .package_of(skill)
                    .is_some_and(|p| updated.contains(&p.as_str()))
            })
            .collect();

        Ok((outcomes, skills))
    }

    fn update_local(
        &self,
        discovery: &SkillDiscovery,
        options: &UpdateOptions,
        warnings: &mut Vec<String>,
    ) -> anyhow::Result<(Vec<PackageOutcome>, Vec<Skill>)> {
        let package = options.name.as_deref().map(package_name);
        let request = PackageRequest::LocalUpgrade {
            package: package.clone(),
        };
        let outcome = self.outcome(package, &request);
        if !outcome.succeeded() {
            return Ok((vec![outcome], Vec::new()));
        }

        let found = discovery.discover_local(DEFAULT_ENV)?;
        warnings.extend(found.warnings.iter().map(|w| w.to_string()));
        let skills = found
            .skills
            .into_iter()
            .filter(|skill| options.name.as_ref().is_none_or(|name| &skill.name == name))
            .collect();

        Ok((vec![outcome], skills))
    }

    fn outcome(&self, package: Option<String>, request: &PackageRequest) -> PackageOutcome {
        let error = self.package_manager.run(request).err().map(|e| {
            tracing::warn!(?package, error = %e, "package update failed");
            e.to_string()
        });
        PackageOutcome { package, error }
    }
}
