//! Terminal prompts for the manage command.
//!
//! Uses dialoguer for the selectors. Escape or `q` cancels any prompt.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{MultiSelect, Select, theme::ColorfulTheme};

use pixi_skills_core::backend::Backend;
use pixi_skills_core::commands::ManagePrompter;
use pixi_skills_core::skills::Skill;
use pixi_skills_core::types::Scope;

/// [`ManagePrompter`] backed by dialoguer prompts.
pub struct DialoguerPrompter<W: Write = io::Stdout> {
    /// Output writer for progress messages (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl DialoguerPrompter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for DialoguerPrompter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DialoguerPrompter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            theme: ColorfulTheme::default(),
        }
    }
}

/// Selector label for a skill.
pub fn skill_label(skill: &Skill) -> String {
    if skill.description.is_empty() {
        skill.name.clone()
    } else {
        format!("{} ({})", skill.name, skill.description)
    }
}

impl<W: Write> ManagePrompter for DialoguerPrompter<W> {
    fn select_backend(&mut self, backends: &[Backend]) -> Result<Option<Backend>> {
        let items: Vec<String> = backends
            .iter()
            .map(|b| format!("{:<10} {}", b.id(), style(b.display_name()).dim()))
            .collect();

        let selection = Select::with_theme(&self.theme)
            .with_prompt("Select backend")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(selection.map(|i| backends[i]))
    }

    fn select_scope(&mut self, scopes: &[Scope]) -> Result<Option<Scope>> {
        let items: Vec<&str> = scopes.iter().map(|s| s.title()).collect();

        let selection = Select::with_theme(&self.theme)
            .with_prompt("Select scope")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(selection.map(|i| scopes[i]))
    }

    fn select_skills(&mut self, skills: &[Skill], checked: &[bool]) -> Result<Option<Vec<Skill>>> {
        let items: Vec<String> = skills.iter().map(skill_label).collect();

        let selection = MultiSelect::with_theme(&self.theme)
            .with_prompt("Select skills to link (space to toggle, enter to confirm)")
            .items(&items)
            .defaults(checked)
            .interact_opt()?;

        Ok(selection.map(|indices| indices.into_iter().map(|i| skills[i].clone()).collect()))
    }

    fn notify(&mut self, message: &str) {
        let _ = writeln!(self.writer, "{}", style(message).cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_includes_description() {
        let skill = Skill::new(Scope::Local, "pdf", "Read PDFs", "/s/pdf");
        assert_eq!(skill_label(&skill), "pdf (Read PDFs)");
    }

    #[test]
    fn label_without_description_is_the_name() {
        let skill = Skill::new(Scope::Global, "notes", "", "/s/notes");
        assert_eq!(skill_label(&skill), "notes");
    }

    #[test]
    fn notify_writes_message_line() {
        let mut prompter = DialoguerPrompter::with_writer(Vec::new());
        prompter.notify("Managing /tmp/skills");

        let output = String::from_utf8(prompter.writer).expect("utf8 output");
        assert!(output.contains("Managing /tmp/skills"));
        assert!(output.ends_with('\n'));
    }
}
