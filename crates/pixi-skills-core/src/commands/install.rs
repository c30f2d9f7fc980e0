//! Install command implementation.
//!
//! Installs a skill package with the package manager and optionally links
//! the freshly installed skill into one backend.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use crate::backend::Backend;
use crate::context::AppContext;
use crate::error::SkillError;
use crate::package::{PackageManager, PackageRequest, PixiCli};
use crate::skills::discovery::{DEFAULT_ENV, package_name};
use crate::skills::{SkillDiscovery, SkillLinker};
use crate::types::Scope;

/// Options for the install command
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Skill name; the package is `agent-skill-<name>`
    pub name: String,
    /// Install into the project (local) or as a global environment
    pub scope: Scope,
    /// Backend to link the skill into after installing
    pub backend: Option<Backend>,
    /// Channel for global installs
    pub channel: Option<String>,
}

impl InstallOptions {
    /// Create new install options for a global skill package
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: Scope::Global,
            backend: None,
            channel: None,
        }
    }

    /// Install into the project environment instead
    pub fn local(mut self, local: bool) -> Self {
        self.scope = if local { Scope::Local } else { Scope::Global };
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

/// Report from an install operation
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    /// Package handed to the package manager
    pub package: String,
    pub scope: Scope,
    /// Symlink created when a backend was requested
    pub linked: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Install command orchestrator
#[derive(Debug)]
pub struct InstallCommand<P = PixiCli> {
    ctx: AppContext,
    package_manager: P,
}

impl InstallCommand<PixiCli> {
    /// Install command driving the configured `pixi` executable
    pub fn with_context(ctx: &AppContext) -> Self {
        let pixi = PixiCli::new(ctx.config().pixi_program(), ctx.project_root());
        Self::new(ctx, pixi)
    }
}

impl<P: PackageManager> InstallCommand<P> {
    pub fn new(ctx: &AppContext, package_manager: P) -> Self {
        Self {
            ctx: ctx.clone(),
            package_manager,
        }
    }

    /// Execute the install command
    pub fn execute(&self, options: &InstallOptions) -> anyhow::Result<InstallReport> {
        let request = self.request_for(options)?;
        let package = package_name(&options.name);

        self.package_manager
            .run(&request)
            .with_context(|| format!("Failed to install '{}'", package))?;

        let mut report = InstallReport {
            package,
            scope: options.scope,
            linked: None,
            warnings: Vec::new(),
        };

        if let Some(backend) = options.backend {
            let discovery = SkillDiscovery::new(&self.ctx);
            let found = discovery.discover(options.scope, DEFAULT_ENV)?;
            match found.find(&options.name) {
                Some(skill) => {
                    let link = SkillLinker::new(backend, &self.ctx)
                        .install(skill)
                        .with_context(|| {
                            format!("Installed '{}' but failed to link it", report.package)
                        })?;
                    report.linked = Some(link);
                }
                None => {
                    report.warnings.extend(found.warnings.iter().map(|w| w.to_string()));
                    report.warnings.push(format!(
                        "Skill '{}' was not found after installing; nothing linked for {}",
                        options.name, backend
                    ));
                }
            }
        }

        Ok(report)
    }

    /// Validate options and build the package-manager call.
    ///
    /// Fails before anything runs on bad input.
    fn request_for(&self, options: &InstallOptions) -> Result<PackageRequest, SkillError> {
        let name = options.name.as_str();
        if name.is_empty()
            || name.starts_with('-')
            || name.contains(['/', '\\'])
            || name.contains(char::is_whitespace)
        {
            return Err(SkillError::usage(format!(
                "Invalid skill name '{}'",
                options.name
            )));
        }
        let package = package_name(name);

        match options.scope {
            Scope::Global => Ok(PackageRequest::GlobalInstall {
                package,
                channel: options
                    .channel
                    .clone()
                    .or_else(|| self.ctx.config().channel.clone()),
            }),
            Scope::Local if options.channel.is_some() => Err(SkillError::usage(
                "--channel can only be used for global installs; add the channel to the project manifest instead",
            )),
            Scope::Local => Ok(PackageRequest::LocalAdd { package }),
        }
    }
}
