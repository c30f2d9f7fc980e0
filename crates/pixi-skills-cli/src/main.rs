//! pixi-skills - link agent skills from pixi environments into coding agents
//!
//! Usage:
//!   pixi-skills list              # Skills available per scope
//!   pixi-skills manage            # Choose which skills a backend sees
//!   pixi-skills status            # Installed links per backend
//!   pixi-skills install <name>    # Install a skill package
//!   pixi-skills update [<name>]   # Update skill packages and re-link

mod interactive;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixi_skills_core::backend::Backend;
use pixi_skills_core::commands::{
    InstallCommand, InstallOptions, InstallReport, ListCommand, ListOptions, ListReport,
    ManageCommand, ManageOptions, ManageOutcome, ManageReport, StatusCommand, StatusOptions,
    StatusReport, UpdateCommand, UpdateOptions, UpdateReport,
};
use pixi_skills_core::context::AppContext;
use pixi_skills_core::orchestration::{LinkAction, LinkOperation, LinkOutcome};
use pixi_skills_core::skills::discovery::DEFAULT_ENV;
use pixi_skills_core::types::Scope;

use crate::interactive::DialoguerPrompter;

#[derive(Parser)]
#[command(name = "pixi-skills", version)]
#[command(about = "Manage agent skills for LLM agents like Claude and Codex", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List skills available in pixi environments
    #[command(alias = "ls")]
    List {
        /// Only list this scope
        #[arg(short, long)]
        scope: Option<ScopeArg>,

        /// Pixi environment searched for local skills
        #[arg(short, long, default_value = DEFAULT_ENV)]
        env: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Interactively choose which skills are linked into a backend
    Manage {
        /// Backend to manage (prompted when absent)
        #[arg(short, long)]
        backend: Option<BackendArg>,

        /// Scope to manage (prompted when absent)
        #[arg(short, long)]
        scope: Option<ScopeArg>,

        /// Pixi environment searched for local skills
        #[arg(short, long, default_value = DEFAULT_ENV)]
        env: String,
    },

    /// Show installed skills for all or a specific backend
    Status {
        /// Filter by backend
        #[arg(short, long)]
        backend: Option<BackendArg>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Install a skill package (`agent-skill-<name>`)
    Install {
        /// Skill name
        name: String,

        /// Add the package to the current project instead of a global environment
        #[arg(short, long)]
        local: bool,

        /// Link the installed skill into this backend
        #[arg(short, long)]
        backend: Option<BackendArg>,

        /// Channel to install from (global installs only)
        #[arg(short, long)]
        channel: Option<String>,
    },

    /// Update skill packages and re-link updated skills
    Update {
        /// Skill to update (all skill packages when omitted)
        name: Option<String>,

        /// Upgrade the project environment instead of global environments
        #[arg(short, long)]
        local: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Local,
    Global,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Local => Scope::Local,
            ScopeArg::Global => Scope::Global,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Claude,
    Codex,
    Copilot,
    Crush,
    Cursor,
    Gemini,
    Opencode,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Claude => Backend::Claude,
            BackendArg::Codex => Backend::Codex,
            BackendArg::Copilot => Backend::Copilot,
            BackendArg::Crush => Backend::Crush,
            BackendArg::Cursor => Backend::Cursor,
            BackendArg::Gemini => Backend::Gemini,
            BackendArg::Opencode => Backend::Opencode,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::with_defaults()?;
    tracing::debug!(
        home = %ctx.home_dir().display(),
        project = %ctx.project_root().display(),
        "resolved context"
    );
    run_cli(cli.command, &ctx)
}

fn run_cli(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::List { scope, env, format } => {
            let mut options = ListOptions::new().with_env(env);
            if let Some(scope) = scope {
                options = options.with_scope(scope.into());
            }
            let report = ListCommand::new(ctx).execute(&options)?;
            print_list(&report, format)?;
        }
        Commands::Manage {
            backend,
            scope,
            env,
        } => {
            let mut options = ManageOptions::new().with_env(env);
            if let Some(backend) = backend {
                options = options.with_backend(backend.into());
            }
            if let Some(scope) = scope {
                options = options.with_scope(scope.into());
            }
            let mut prompter = DialoguerPrompter::new();
            let report = ManageCommand::new(ctx).execute(&options, &mut prompter)?;
            print_manage(&report);
        }
        Commands::Status { backend, format } => {
            let mut options = StatusOptions::new();
            if let Some(backend) = backend {
                options = options.with_backend(backend.into());
            }
            let report = StatusCommand::new(ctx).execute(&options)?;
            print_status(&report, format)?;
        }
        Commands::Install {
            name,
            local,
            backend,
            channel,
        } => {
            let mut options = InstallOptions::new(name).local(local);
            if let Some(backend) = backend {
                options = options.with_backend(backend.into());
            }
            if let Some(channel) = channel {
                options = options.with_channel(channel);
            }
            let report = InstallCommand::with_context(ctx).execute(&options)?;
            print_install(&report, backend.map(Backend::from));
        }
        Commands::Update { name, local } => {
            let mut options = UpdateOptions::new().local(local);
            if let Some(name) = name {
                options = options.with_name(name);
            }
            let report = UpdateCommand::with_context(ctx).execute(&options)?;
            let failures = print_update(&report);
            if failures > 0 {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn print_list(report: &ListReport, format: OutputFormat) -> Result<()> {
    for warning in report.warnings() {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    match format {
        OutputFormat::Table => {
            for section in &report.sections {
                let title = format!("{} Skills", section.scope.title());
                if section.skills.is_empty() {
                    println!("{}", style(format!("No {} found.", title.to_lowercase())).dim());
                    continue;
                }

                println!("{} ({}):", style(&title).bold(), section.skills.len());
                println!("  {:<24} {:<60} Path", "Name", "Description");
                println!("  {}", "-".repeat(100));
                for skill in &section.skills {
                    println!(
                        "  {} {:<60} {}",
                        style(format!("{:<24}", truncate(&skill.name, 24))).cyan(),
                        truncate(&skill.description, 60),
                        style(skill.path.display()).dim()
                    );
                }
                println!();
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

fn print_manage(report: &ManageReport) {
    for warning in &report.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    match &report.outcome {
        ManageOutcome::Cancelled => println!("{}", style("Cancelled.").dim()),
        ManageOutcome::NoChanges => println!("{}", style("No changes.").dim()),
        ManageOutcome::Applied(applied) => {
            for outcome in &applied.outcomes {
                let line = manage_line(outcome);
                match &outcome.action {
                    LinkAction::Installed { .. } => println!("{}", style(line).green()),
                    LinkAction::Uninstalled => println!("{}", style(line).yellow()),
                    LinkAction::NotFound | LinkAction::Failed { .. } => {
                        println!("{}", style(line).red())
                    }
                }
            }
        }
    }
}

fn manage_line(outcome: &LinkOutcome) -> String {
    match (&outcome.action, outcome.operation) {
        (LinkAction::Installed { path }, _) => {
            format!("Installed '{}' at {}", outcome.name, path.display())
        }
        (LinkAction::Uninstalled, _) => format!("Uninstalled '{}'", outcome.name),
        (LinkAction::NotFound, _) => format!("Failed to uninstall '{}': not found", outcome.name),
        (LinkAction::Failed { reason }, LinkOperation::Install) => {
            format!("Failed to link '{}': {}", outcome.name, reason)
        }
        (LinkAction::Failed { reason }, LinkOperation::Uninstall) => {
            format!("Failed to uninstall '{}': {}", outcome.name, reason)
        }
    }
}

fn print_status(report: &StatusReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for backend in &report.backends {
                println!("\n{}", style(backend.backend.display_name()).bold());

                for scope in &backend.scopes {
                    if let Some(error) = &scope.error {
                        println!(
                            "  {}",
                            style(format!("Cannot read {} skills: {}", scope.scope, error)).red()
                        );
                        continue;
                    }
                    if scope.installed.is_empty() {
                        println!(
                            "  {}",
                            style(format!("No {} skills installed", scope.scope)).dim()
                        );
                        continue;
                    }

                    println!(
                        "  {} Skills ({})",
                        scope.scope.title(),
                        style(scope.skills_dir.display()).dim()
                    );
                    for link in &scope.installed {
                        let marker = if link.dangling {
                            style(" (dangling)").red().to_string()
                        } else {
                            String::new()
                        };
                        println!(
                            "    {} {}{}",
                            style(format!("{:<24}", truncate(&link.name, 24))).cyan(),
                            style(link.target.display()).dim(),
                            marker
                        );
                    }
                }
            }

            let dangling = report.dangling();
            if dangling > 0 {
                println!(
                    "\n{} {} dangling link(s); run 'pixi-skills manage' to clean up",
                    style("⚠").yellow(),
                    dangling
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

fn print_install(report: &InstallReport, backend: Option<Backend>) {
    println!(
        "{} Installed '{}' ({})",
        style("✓").green(),
        report.package,
        report.scope
    );
    if let (Some(path), Some(backend)) = (&report.linked, backend) {
        println!("  Linked into {} at {}", backend.display_name(), path.display());
    }
    for warning in &report.warnings {
        println!("  {} {}", style("⚠").yellow(), warning);
    }
}

/// Print the update report and return its failure count.
fn print_update(report: &UpdateReport) -> usize {
    for warning in &report.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    for package in &report.packages {
        let label = package
            .package
            .as_deref()
            .unwrap_or("project environment");
        match &package.error {
            None => println!("{} Updated '{}'", style("✓").green(), label),
            Some(error) => println!(
                "{} Failed to update '{}': {}",
                style("✗").red(),
                label,
                error
            ),
        }
    }

    for relinked in &report.relinked {
        match &relinked.action {
            LinkAction::Failed { reason } => println!(
                "  {} Failed to re-link '{}' for {} ({}): {}",
                style("✗").red(),
                relinked.name,
                relinked.backend,
                relinked.scope,
                reason
            ),
            _ => println!(
                "  Re-linked '{}' for {} ({})",
                relinked.name, relinked.backend, relinked.scope
            ),
        }
    }

    for listing in &report.listing_errors {
        println!(
            "  {} Cannot re-link for {} ({}): {}",
            style("✗").red(),
            listing.backend,
            listing.scope,
            listing.reason
        );
    }

    let failures = report.failures();
    if failures > 0 {
        eprintln!("{} {} update step(s) failed", style("✗").red(), failures);
    }
    failures
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("CLI parsing should succeed")
    }

    #[test]
    fn list_defaults_to_all_scopes_and_default_env() {
        let cli = parse(&["pixi-skills", "list"]);
        match cli.command {
            Commands::List { scope, env, format } => {
                assert!(scope.is_none());
                assert_eq!(env, DEFAULT_ENV);
                assert!(matches!(format, OutputFormat::Table));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn list_with_scope_env_and_json_parses() {
        let cli = parse(&[
            "pixi-skills",
            "list",
            "--scope",
            "local",
            "--env",
            "docs",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::List { scope, env, format } => {
                assert!(matches!(scope, Some(ScopeArg::Local)));
                assert_eq!(env, "docs");
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn manage_with_backend_and_scope_parses() {
        let cli = parse(&["pixi-skills", "manage", "-b", "claude", "-s", "global"]);
        match cli.command {
            Commands::Manage { backend, scope, .. } => {
                assert_eq!(backend.map(Backend::from), Some(Backend::Claude));
                assert_eq!(scope.map(Scope::from), Some(Scope::Global));
            }
            _ => panic!("expected manage"),
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["pixi-skills", "manage", "--backend", "vim"]).is_err());
    }

    #[test]
    fn status_with_backend_parses() {
        let cli = parse(&["pixi-skills", "status", "--backend", "copilot"]);
        match cli.command {
            Commands::Status { backend, .. } => {
                assert_eq!(backend.map(Backend::from), Some(Backend::Copilot));
            }
            _ => panic!("expected status"),
        }
    }

    #[test]
    fn install_with_all_flags_parses() {
        let cli = parse(&[
            "pixi-skills",
            "install",
            "pdf",
            "--backend",
            "codex",
            "--channel",
            "https://prefix.dev/skill-forge",
        ]);
        match cli.command {
            Commands::Install {
                name,
                local,
                backend,
                channel,
            } => {
                assert_eq!(name, "pdf");
                assert!(!local);
                assert_eq!(backend.map(Backend::from), Some(Backend::Codex));
                assert_eq!(channel.as_deref(), Some("https://prefix.dev/skill-forge"));
            }
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn install_requires_a_name() {
        assert!(Cli::try_parse_from(["pixi-skills", "install"]).is_err());
    }

    #[test]
    fn update_without_name_parses() {
        let cli = parse(&["pixi-skills", "update", "--local"]);
        match cli.command {
            Commands::Update { name, local } => {
                assert!(name.is_none());
                assert!(local);
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn every_backend_has_a_flag_value() {
        for backend in Backend::ALL {
            let cli = parse(&["pixi-skills", "status", "--backend", backend.id()]);
            match cli.command {
                Commands::Status { backend: arg, .. } => {
                    assert_eq!(arg.map(Backend::from), Some(backend));
                }
                _ => panic!("expected status"),
            }
        }
    }

    #[test]
    fn version_flag_is_available() {
        let err = match Cli::try_parse_from(["pixi-skills", "--version"]) {
            Ok(_) => panic!("--version should short-circuit parsing"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn failed_uninstall_is_not_reported_as_link_failure() {
        let outcome = LinkOutcome {
            name: "pdf".into(),
            operation: LinkOperation::Uninstall,
            action: LinkAction::Failed {
                reason: "permission denied".into(),
            },
        };
        assert_eq!(
            manage_line(&outcome),
            "Failed to uninstall 'pdf': permission denied"
        );

        let install = LinkOutcome {
            operation: LinkOperation::Install,
            ..outcome
        };
        assert_eq!(manage_line(&install), "Failed to link 'pdf': permission denied");
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("pdf", 10), "pdf");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
