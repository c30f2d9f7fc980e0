//! Error types shared by the manifest parser, discovery and the linker.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a `SKILL.md` manifest was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatReason {
    #[error("no SKILL.md found")]
    NoManifest,
    #[error("SKILL.md must start with YAML frontmatter")]
    MissingFrontmatter,
    #[error("invalid YAML frontmatter: no closing '---'")]
    UnterminatedFrontmatter,
    #[error("invalid YAML frontmatter")]
    InvalidYaml,
    #[error("invalid YAML frontmatter: not a mapping")]
    NotAMapping,
    #[error("missing 'description' in SKILL.md frontmatter")]
    MissingDescription,
}

#[derive(Debug, Error)]
pub enum SkillError {
    /// Malformed or incomplete manifest.
    #[error("{reason}: {}", path.display())]
    Format { path: PathBuf, reason: FormatReason },

    /// A non-symlink entry already occupies the link location.
    #[error("Cannot install: {} exists and is not a symlink", path.display())]
    Conflict { path: PathBuf },

    /// Skill names become directory entries and must be a single path component.
    #[error("Invalid skill name '{name}'")]
    InvalidName { name: String },

    /// The package manager exited unsuccessfully.
    #[error("`{command}` failed ({}): {stderr}", describe_status(*status))]
    ExternalProcess {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Invalid combination of options, reported before anything is touched.
    #[error("{0}")]
    Usage(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl SkillError {
    pub fn format(path: impl Into<PathBuf>, reason: FormatReason) -> Self {
        SkillError::Format {
            path: path.into(),
            reason,
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        SkillError::Usage(message.into())
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SkillError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io_at(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("Failed to {} {}", action, path.display()), source)
    }

    pub fn is_format(&self) -> bool {
        matches!(self, SkillError::Format { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SkillError::Conflict { .. })
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, SkillError::Usage(_))
    }
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T, E = SkillError> = std::result::Result<T, E>;
