//! pixi-skills core library
//!
//! Discovers agent skills installed through pixi environments and links them
//! into the skill directories of coding-agent backends.

pub mod backend;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestration;
pub mod package;
pub mod skills;
pub mod status;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::backend::{Backend, BackendRegistry};
    pub use crate::config::SkillsConfig;
    pub use crate::context::AppContext;
    pub use crate::error::{FormatReason, SkillError};
    pub use crate::skills::{Skill, SkillDiscovery, SkillLinker};
    pub use crate::types::Scope;
}
