//! Re-pointing existing links after skill directories moved.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::reconcile::LinkAction;
use crate::backend::Backend;
use crate::skills::{LinkStore, Skill};
use crate::types::Scope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelinkOutcome {
    pub backend: Backend,
    pub scope: Scope,
    pub name: String,
    pub action: LinkAction,
}

/// A backend directory whose links could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingError {
    pub backend: Backend,
    pub scope: Scope,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelinkReport {
    pub outcomes: Vec<RelinkOutcome>,
    pub listing_errors: Vec<ListingError>,
}

impl RelinkReport {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action.is_failure())
            .count()
            + self.listing_errors.len()
    }
}

/// Re-run `install` for every `(store, skill)` pair where the store already
/// has a link named after the skill in the skill's scope.
///
/// Skills that are not linked for a backend stay unlinked there. A scope
/// whose links cannot be listed is reported once and its skills skipped.
pub fn relink<S: LinkStore>(skills: &[Skill], stores: &[S]) -> RelinkReport {
    let mut report = RelinkReport::default();

    for store in stores {
        let mut installed: BTreeMap<Scope, Option<BTreeSet<String>>> = BTreeMap::new();

        for skill in skills {
            let names = installed.entry(skill.scope).or_insert_with(|| {
                match store.installed_names(skill.scope) {
                    Ok(names) => Some(names),
                    Err(err) => {
                        tracing::warn!(backend = %store.backend(), scope = %skill.scope, error = %err, "cannot list links");
                        report.listing_errors.push(ListingError {
                            backend: store.backend(),
                            scope: skill.scope,
                            reason: err.to_string(),
                        });
                        None
                    }
                }
            });

            let Some(names) = names else { continue };
            if !names.contains(&skill.name) {
                continue;
            }

            let action = match store.install(skill) {
                Ok(path) => LinkAction::Installed { path },
                Err(err) => LinkAction::Failed {
                    reason: err.to_string(),
                },
            };

            tracing::debug!(backend = %store.backend(), skill = %skill.name, ?action, "relinked");
            report.outcomes.push(RelinkOutcome {
                backend: store.backend(),
                scope: skill.scope,
                name: skill.name.clone(),
                action,
            });
        }
    }

    report
}
