//! Install/uninstall delta between a selection and the installed links.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::skills::{LinkStore, Skill};
use crate::types::Scope;

/// What happened to one skill during a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum LinkAction {
    Installed { path: PathBuf },
    Uninstalled,
    /// Nothing to uninstall under that name.
    NotFound,
    Failed { reason: String },
}

impl LinkAction {
    pub fn is_failure(&self) -> bool {
        matches!(self, LinkAction::Failed { .. } | LinkAction::NotFound)
    }
}

/// Which half of a plan produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkOperation {
    Install,
    Uninstall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub name: String,
    pub operation: LinkOperation,
    pub action: LinkAction,
}

/// Changes needed to make the installed set match the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_install: Vec<Skill>,
    pub to_uninstall: Vec<String>,
}

impl ReconcilePlan {
    /// Skills already installed under their name and still selected are left
    /// out of both lists.
    pub fn new(desired: &[Skill], installed: &BTreeSet<String>) -> Self {
        let desired_names: BTreeSet<&str> = desired.iter().map(|s| s.name.as_str()).collect();

        let to_install = desired
            .iter()
            .filter(|s| !installed.contains(&s.name))
            .cloned()
            .collect();
        let to_uninstall = installed
            .iter()
            .filter(|name| !desired_names.contains(name.as_str()))
            .cloned()
            .collect();

        Self {
            to_install,
            to_uninstall,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_install.is_empty() && self.to_uninstall.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub outcomes: Vec<LinkOutcome>,
}

impl ReconcileReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.action.is_failure()).count()
    }
}

/// Apply `plan`: installs first, then uninstalls.
///
/// Best effort: a failure is recorded and the remaining items still run.
/// Nothing is rolled back.
pub fn apply_plan<S: LinkStore + ?Sized>(
    store: &S,
    scope: Scope,
    plan: &ReconcilePlan,
) -> ReconcileReport {
    let mut outcomes = Vec::with_capacity(plan.to_install.len() + plan.to_uninstall.len());

    for skill in &plan.to_install {
        let action = match store.install(skill) {
            Ok(path) => LinkAction::Installed { path },
            Err(err) => LinkAction::Failed {
                reason: err.to_string(),
            },
        };
        outcomes.push(LinkOutcome {
            name: skill.name.clone(),
            operation: LinkOperation::Install,
            action,
        });
    }

    for name in &plan.to_uninstall {
        let action = match store.uninstall(name, scope) {
            Ok(true) => LinkAction::Uninstalled,
            Ok(false) => LinkAction::NotFound,
            Err(err) => LinkAction::Failed {
                reason: err.to_string(),
            },
        };
        outcomes.push(LinkOutcome {
            name: name.clone(),
            operation: LinkOperation::Uninstall,
            action,
        });
    }

    ReconcileReport { outcomes }
}
