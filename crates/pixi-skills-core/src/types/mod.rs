//! Shared core types used across discovery, linking and commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a skill comes from and where it gets linked.
///
/// Variants are declared in display order, so the derived ordering puts
/// `Local` before `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Project-specific pixi environment.
    Local,
    /// User-wide pixi global environments.
    Global,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::Local, Scope::Global];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Global => "global",
        }
    }

    /// Capitalized label used in headings ("Local", "Global").
    pub fn title(self) -> &'static str {
        match self {
            Scope::Local => "Local",
            Scope::Global => "Global",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "l" => Ok(Scope::Local),
            "global" | "g" => Ok(Scope::Global),
            _ => anyhow::bail!("Invalid scope: '{}'. Use 'local' or 'global'", s),
        }
    }
}
