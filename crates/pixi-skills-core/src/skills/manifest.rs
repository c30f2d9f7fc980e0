//! `SKILL.md` front-matter parsing.
//!
//! The block between the delimiters is read with `serde_yaml` and must be a
//! mapping. Block scalars (`description: |`) yield an empty string.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{FormatReason, Result, SkillError};

pub const MANIFEST_FILE: &str = "SKILL.md";

const DELIMITER: &str = "---";

/// The fields pixi-skills reads from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Explicit skill name; callers fall back to the directory name.
    pub name: Option<String>,
    pub description: String,
}

/// Read and parse the manifest at `path`.
pub fn parse_manifest(path: &Path) -> Result<Manifest> {
    let content =
        fs::read_to_string(path).map_err(|e| SkillError::io_at("read", path, e))?;
    parse_manifest_str(&content, path)
}

/// Parse manifest `content`; `path` is only used for error reporting.
pub fn parse_manifest_str(content: &str, path: &Path) -> Result<Manifest> {
    let fail = |reason| SkillError::format(path, reason);

    if !content.starts_with(DELIMITER) {
        return Err(fail(FormatReason::MissingFrontmatter));
    }
    let rest = &content[DELIMITER.len()..];
    let end = find_closing_delimiter(rest).ok_or_else(|| fail(FormatReason::UnterminatedFrontmatter))?;
    let block = &rest[..end];

    let value: Value = serde_yaml::from_str(block).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "front matter is not valid YAML");
        fail(FormatReason::InvalidYaml)
    })?;
    let Value::Mapping(fields) = value else {
        return Err(fail(FormatReason::NotAMapping));
    };

    let name = field(&fields, "name");
    let description = if is_block_scalar(block, "description") {
        String::new()
    } else {
        field(&fields, "description").ok_or_else(|| fail(FormatReason::MissingDescription))?
    };

    Ok(Manifest { name, description })
}

/// Offset of the `\n---` that closes the front matter.
///
/// The delimiter may carry trailing whitespace but must end its line.
fn find_closing_delimiter(rest: &str) -> Option<usize> {
    let marker = "\n---";
    let mut offset = 0;
    while let Some(pos) = rest[offset..].find(marker) {
        let start = offset + pos;
        let closes_line = rest[start + marker.len()..]
            .chars()
            .take_while(|c| c.is_whitespace())
            .any(|c| c == '\n');
        if closes_line {
            return Some(start);
        }
        offset = start + 1;
    }
    None
}

/// String form of a top-level value; `None` for a missing key or a null.
fn field(fields: &Mapping, key: &str) -> Option<String> {
    fields.get(key).and_then(scalar_string)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        other => serde_yaml::to_string(other)
            .ok()
            .map(|s| s.trim_end().to_string()),
    }
}

/// Whether the top-level `key` holds a `|` or `>` block scalar.
fn is_block_scalar(block: &str, key: &str) -> bool {
    block
        .lines()
        .filter(|line| !line.starts_with([' ', '\t']))
        .filter_map(|line| line.strip_prefix(key))
        .filter_map(|rest| rest.trim_start().strip_prefix(':'))
        .any(|value| value.trim_start().starts_with(['|', '>']))
}
