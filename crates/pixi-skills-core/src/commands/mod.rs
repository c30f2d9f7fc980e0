//! High-level commands for pixi-skills operations.
//!
//! These are called by the CLI frontend and return serializable reports.

pub mod install;
pub mod list;
pub mod manage;
pub mod scope;
pub mod update;

pub use install::{InstallCommand, InstallOptions, InstallReport};
pub use list::{ListCommand, ListOptions, ListReport, ScopeListing};
pub use manage::{
    ManageCommand, ManageOptions, ManageOutcome, ManagePrompter, ManageReport, initial_selection,
};
pub use scope::{resolve_env_scope, scopes_for};
pub use update::{PackageOutcome, UpdateCommand, UpdateOptions, UpdateReport};

// Re-export status command types from the status module
pub use crate::status::{BackendStatus, ScopeStatus, StatusCommand, StatusOptions, StatusReport};
