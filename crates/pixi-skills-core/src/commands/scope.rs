//! Scope and environment validation shared by scope-aware commands.

use crate::error::SkillError;
use crate::skills::discovery::DEFAULT_ENV;
use crate::types::Scope;

/// Check the `--scope`/`--env` combination.
///
/// A non-default environment only exists for local skills: combined with
/// global scope it is a usage error, and without an explicit scope it
/// narrows the scope to local.
pub fn resolve_env_scope(scope: Option<Scope>, env: &str) -> Result<Option<Scope>, SkillError> {
    let custom_env = env != DEFAULT_ENV;
    match scope {
        Some(Scope::Global) if custom_env => Err(SkillError::usage(
            "--env can only be used with local scope",
        )),
        None if custom_env => Ok(Some(Scope::Local)),
        other => Ok(other),
    }
}

/// The scopes a command should cover for an optional filter.
pub fn scopes_for(filter: Option<Scope>) -> Vec<Scope> {
    match filter {
        Some(scope) => vec![scope],
        None => Scope::ALL.to_vec(),
    }
}
