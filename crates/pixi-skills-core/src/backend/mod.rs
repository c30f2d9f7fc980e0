//! Agent backends and where each one expects linked skills.
//!
//! Every backend keeps its skills under one fixed relative directory,
//! anchored at the project root for local scope and at the home directory
//! for global scope.

pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::types::Scope;

pub use registry::BackendRegistry;

/// Supported agent tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Claude,
    Codex,
    Copilot,
    Crush,
    Cursor,
    Gemini,
    Opencode,
}

impl Backend {
    pub const ALL: [Backend; 7] = [
        Backend::Claude,
        Backend::Codex,
        Backend::Copilot,
        Backend::Crush,
        Backend::Cursor,
        Backend::Gemini,
        Backend::Opencode,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Backend::Claude => "claude",
            Backend::Codex => "codex",
            Backend::Copilot => "copilot",
            Backend::Crush => "crush",
            Backend::Cursor => "cursor",
            Backend::Gemini => "gemini",
            Backend::Opencode => "opencode",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Backend::Claude => "Claude Code",
            Backend::Codex => "Codex",
            Backend::Copilot => "GitHub Copilot",
            Backend::Crush => "Crush",
            Backend::Cursor => "Cursor",
            Backend::Gemini => "Gemini CLI",
            Backend::Opencode => "OpenCode",
        }
    }

    /// Skills directory relative to the scope root.
    pub fn relative_skills_dir(self) -> &'static str {
        match self {
            Backend::Claude => ".claude/skills",
            Backend::Codex => ".codex/skills",
            Backend::Copilot => ".github/skills",
            Backend::Crush => ".crush/skills",
            Backend::Cursor => ".cursor/skills",
            Backend::Gemini => ".gemini/skills",
            Backend::Opencode => ".opencode/skills",
        }
    }

    /// Directory the backend reads skills from for `scope`.
    pub fn skills_dir(self, scope: Scope, ctx: &AppContext) -> PathBuf {
        scope_root(scope, ctx).join(self.relative_skills_dir())
    }

    pub fn resolve(id: &str) -> Option<Backend> {
        Backend::ALL.into_iter().find(|b| b.id() == id)
    }
}

fn scope_root(scope: Scope, ctx: &AppContext) -> &Path {
    match scope {
        Scope::Local => ctx.project_root(),
        Scope::Global => ctx.home_dir(),
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::resolve(&s.to_lowercase()).ok_or_else(|| {
            let known: Vec<_> = Backend::ALL.iter().map(|b| b.id()).collect();
            anyhow::anyhow!("Unknown backend: '{}'. Use one of: {}", s, known.join(", "))
        })
    }
}
