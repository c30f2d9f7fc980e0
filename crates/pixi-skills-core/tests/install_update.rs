#![cfg(unix)]

use std::cell::RefCell;
use std::collections::BTreeSet;

use pixi_skills_core::backend::Backend;
use pixi_skills_core::commands::{InstallCommand, InstallOptions, UpdateCommand, UpdateOptions};
use pixi_skills_core::config::SkillsConfig;
use pixi_skills_core::error::{Result, SkillError};
use pixi_skills_core::orchestration::LinkAction;
use pixi_skills_core::package::{PackageManager, PackageRequest};
use pixi_skills_core::skills::discovery::DEFAULT_ENV;
use pixi_skills_core::skills::{Skill, SkillLinker};
use pixi_skills_core::types::Scope;

mod support;

use support::{Fixture, canonical, manifest};

/// Records requests; fails for the listed packages.
#[derive(Default)]
struct FakePixi {
    requests: RefCell<Vec<PackageRequest>>,
    failing: BTreeSet<String>,
}

impl FakePixi {
    fn failing(packages: &[&str]) -> Self {
        Self {
            failing: packages.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<PackageRequest> {
        self.requests.borrow().clone()
    }
}

impl PackageManager for FakePixi {
    fn run(&self, request: &PackageRequest) -> Result<()> {
        self.requests.borrow_mut().push(request.clone());
        let package = match request {
            PackageRequest::GlobalInstall { package, .. }
            | PackageRequest::LocalAdd { package }
            | PackageRequest::GlobalUpdate { package } => Some(package.as_str()),
            PackageRequest::LocalUpgrade { package } => package.as_deref(),
        };
        match package {
            Some(p) if self.failing.contains(p) => Err(SkillError::ExternalProcess {
                command: format!("pixi {}", request.args().join(" ")),
                status: Some(1),
                stderr: "No candidates were found".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

fn usage_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SkillError>().is_some_and(SkillError::is_usage)
}

#[test]
fn global_install_runs_pixi_global_install() {
    let fx = Fixture::new();
    let pixi = FakePixi::default();
    let command = InstallCommand::new(&fx.ctx, pixi);

    let report = command
        .execute(&InstallOptions::new("pdf").with_channel("https://prefix.dev/skills"))
        .expect("install should succeed");

    assert_eq!(report.package, "agent-skill-pdf");
    assert_eq!(report.scope, Scope::Global);
    assert_eq!(report.linked, None);
}

#[test]
fn install_requests_match_scope() {
    let fx = Fixture::new();
    let pixi = FakePixi::default();
    let command = InstallCommand::new(&fx.ctx, &pixi);

    command
        .execute(&InstallOptions::new("pdf").with_channel("conda-forge"))
        .unwrap();
    command.execute(&InstallOptions::new("git").local(true)).unwrap();

    assert_eq!(
        pixi.requests(),
        vec![
            PackageRequest::GlobalInstall {
                package: "agent-skill-pdf".into(),
                channel: Some("conda-forge".into()),
            },
            PackageRequest::LocalAdd {
                package: "agent-skill-git".into(),
            },
        ]
    );
}

#[test]
fn configured_channel_is_the_global_default() {
    let fx = Fixture::new();
    let ctx = fx.ctx.clone().with_config(SkillsConfig {
        channel: Some("https://prefix.dev/skill-forge".into()),
        ..SkillsConfig::default()
    });
    let pixi = FakePixi::default();

    InstallCommand::new(&ctx, &pixi)
        .execute(&InstallOptions::new("pdf"))
        .unwrap();

    assert_eq!(
        pixi.requests(),
        vec![PackageRequest::GlobalInstall {
            package: "agent-skill-pdf".into(),
            channel: Some("https://prefix.dev/skill-forge".into()),
        }]
    );
}

#[test]
fn channel_with_local_install_is_a_usage_error() {
    let fx = Fixture::new();
    let pixi = FakePixi::default();

    let err = InstallCommand::new(&fx.ctx, &pixi)
        .execute(&InstallOptions::new("pdf").local(true).with_channel("conda-forge"))
        .unwrap_err();

    assert!(usage_error(&err));
    assert!(pixi.requests().is_empty());
}

#[test]
fn invalid_names_never_reach_pixi() {
    let fx = Fixture::new();
    let pixi = FakePixi::default();
    let command = InstallCommand::new(&fx.ctx, &pixi);

    for name in ["", "  ", "--force", "../etc", " pdf", "pdf ", "my skill"] {
        let err = command.execute(&InstallOptions::new(name)).unwrap_err();
        assert!(usage_error(&err), "{name:?} should be rejected");
    }
    assert!(pixi.requests().is_empty());
}

#[test]
fn failed_install_surfaces_pixi_error() {
    let fx = Fixture::new();
    let pixi = FakePixi::failing(&["agent-skill-missing"]);

    let err = InstallCommand::new(&fx.ctx, &pixi)
        .execute(&InstallOptions::new("missing").with_backend(Backend::Claude))
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("Failed to install 'agent-skill-missing'"), "{message}");
    assert!(message.contains("No candidates were found"), "{message}");
    assert!(!fx.home.path().join(".claude").exists());
}

#[test]
fn install_with_backend_links_the_new_skill() {
    let fx = Fixture::new();
    let path = fx.global_skill("pdf", "pdf", &manifest("PDF"));

    let report = InstallCommand::new(&fx.ctx, FakePixi::default())
        .execute(&InstallOptions::new("pdf").with_backend(Backend::Claude))
        .expect("install should succeed");

    let link = report.linked.expect("skill should be linked");
    assert_eq!(link, fx.home.path().join(".claude/skills/pdf"));
    assert_eq!(canonical(&link), canonical(&path));
    assert!(report.warnings.is_empty());
}

#[test]
fn local_install_with_backend_links_into_project() {
    let fx = Fixture::new();
    fx.local_skill(DEFAULT_ENV, "git", &manifest("Git"));

    let report = InstallCommand::new(&fx.ctx, FakePixi::default())
        .execute(
            &InstallOptions::new("git")
                .local(true)
                .with_backend(Backend::Cursor),
        )
        .expect("install should succeed");

    assert_eq!(report.linked, Some(fx.project.path().join(".cursor/skills/git")));
}

#[test]
fn install_warns_when_skill_is_not_found() {
    let fx = Fixture::new();

    let report = InstallCommand::new(&fx.ctx, FakePixi::default())
        .execute(&InstallOptions::new("ghost").with_backend(Backend::Claude))
        .expect("a missing skill is only a warning");

    assert_eq!(report.linked, None);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("'ghost' was not found"));
}

fn link(fx: &Fixture, backend: Backend, skill: Skill) {
    SkillLinker::new(backend, &fx.ctx)
        .install(&skill)
        .expect("link should succeed");
}

#[test]
fn update_all_updates_every_skill_package() {
    let fx = Fixture::new();
    fx.global_skill("pdf", "pdf", &manifest("PDF"));
    fx.global_skill("git", "git", &manifest("Git"));
    let pixi = FakePixi::default();

    let report = UpdateCommand::new(&fx.ctx, &pixi)
        .execute(&UpdateOptions::new())
        .expect("update should succeed");

    assert_eq!(
        pixi.requests(),
        vec![
            PackageRequest::GlobalUpdate {
                package: "agent-skill-git".into()
            },
            PackageRequest::GlobalUpdate {
                package: "agent-skill-pdf".into()
            },
        ]
    );
    assert_eq!(report.failures(), 0);
    assert!(report.relinked.is_empty());
}

#[test]
fn update_relinks_only_where_already_linked() {
    let fx = Fixture::new();
    let pdf = fx.global_skill("pdf", "pdf", &manifest("PDF"));
    link(&fx, Backend::Claude, Skill::new(Scope::Global, "pdf", "PDF", pdf));

    let report = UpdateCommand::new(&fx.ctx, FakePixi::default())
        .execute(&UpdateOptions::new().with_name("pdf"))
        .expect("update should succeed");

    assert_eq!(report.relinked.len(), 1);
    assert_eq!(report.relinked[0].backend, Backend::Claude);
    assert!(matches!(report.relinked[0].action, LinkAction::Installed { .. }));
    assert!(!fx.home.path().join(".codex").exists());
}

#[test]
fn update_continues_past_failing_packages() {
    let fx = Fixture::new();
    let broken = fx.global_skill("broken", "broken", &manifest("Broken"));
    let pdf = fx.global_skill("pdf", "pdf", &manifest("PDF"));
    link(&fx, Backend::Claude, Skill::new(Scope::Global, "broken", "B", broken));
    link(&fx, Backend::Claude, Skill::new(Scope::Global, "pdf", "PDF", pdf));
    let pixi = FakePixi::failing(&["agent-skill-broken"]);

    let report = UpdateCommand::new(&fx.ctx, &pixi)
        .execute(&UpdateOptions::new())
        .expect("per-package failures are reported");

    assert_eq!(pixi.requests().len(), 2);
    assert_eq!(report.failures(), 1);
    let failed: Vec<_> = report
        .packages
        .iter()
        .filter(|p| !p.succeeded())
        .filter_map(|p| p.package.as_deref())
        .collect();
    assert_eq!(failed, vec!["agent-skill-broken"]);

    let relinked: Vec<_> = report.relinked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(relinked, vec!["pdf"]);
}

#[test]
fn update_reports_unreadable_backend_once() {
    let fx = Fixture::new();
    let pdf = fx.global_skill("pdf", "pdf", &manifest("PDF"));
    fx.global_skill("git", "git", &manifest("Git"));
    link(&fx, Backend::Codex, Skill::new(Scope::Global, "pdf", "PDF", pdf));
    support::write_file(&fx.home.path().join(".claude/skills"), "not a directory");

    let report = UpdateCommand::new(&fx.ctx, FakePixi::default())
        .execute(&UpdateOptions::new())
        .expect("update should succeed");

    assert_eq!(report.listing_errors.len(), 1);
    assert_eq!(report.listing_errors[0].backend, Backend::Claude);
    assert_eq!(report.listing_errors[0].scope, Scope::Global);
    let relinked: Vec<_> = report
        .relinked
        .iter()
        .map(|r| (r.backend, r.name.as_str()))
        .collect();
    assert_eq!(relinked, vec![(Backend::Codex, "pdf")]);
    assert_eq!(report.failures(), 1);
}

#[test]
fn update_without_packages_warns() {
    let fx = Fixture::new();
    let pixi = FakePixi::default();

    let report = UpdateCommand::new(&fx.ctx, &pixi)
        .execute(&UpdateOptions::new())
        .expect("update should succeed");

    assert!(pixi.requests().is_empty());
    assert_eq!(report.warnings, vec!["No global skill packages installed".to_string()]);
}

#[test]
fn local_update_runs_one_upgrade_and_relinks() {
    let fx = Fixture::new();
    let a = fx.local_skill(DEFAULT_ENV, "a", &manifest("A"));
    let b = fx.local_skill(DEFAULT_ENV, "b", &manifest("B"));
    link(&fx, Backend::Claude, Skill::new(Scope::Local, "a", "A", a));
    link(&fx, Backend::Codex, Skill::new(Scope::Local, "b", "B", b));
    let pixi = FakePixi::default();

    let report = UpdateCommand::new(&fx.ctx, &pixi)
        .execute(&UpdateOptions::new().local(true))
        .expect("update should succeed");

    assert_eq!(
        pixi.requests(),
        vec![PackageRequest::LocalUpgrade { package: None }]
    );
    let relinked: Vec<_> = report
        .relinked
        .iter()
        .map(|r| (r.backend, r.name.as_str()))
        .collect();
    assert_eq!(relinked, vec![(Backend::Claude, "a"), (Backend::Codex, "b")]);
}

#[test]
fn local_update_of_one_skill_targets_its_package() {
    let fx = Fixture::new();
    let a = fx.local_skill(DEFAULT_ENV, "a", &manifest("A"));
    let b = fx.local_skill(DEFAULT_ENV, "b", &manifest("B"));
    link(&fx, Backend::Claude, Skill::new(Scope::Local, "a", "A", a));
    link(&fx, Backend::Claude, Skill::new(Scope::Local, "b", "B", b));
    let pixi = FakePixi::default();

    let report = UpdateCommand::new(&fx.ctx, &pixi)
        .execute(&UpdateOptions::new().with_name("a").local(true))
        .expect("update should succeed");

    assert_eq!(
        pixi.requests(),
        vec![PackageRequest::LocalUpgrade {
            package: Some("agent-skill-a".into())
        }]
    );
    assert_eq!(report.relinked.len(), 1);
    assert_eq!(report.relinked[0].name, "a");
}

#[test]
fn failed_local_upgrade_skips_relink() {
    let fx = Fixture::new();
    let a = fx.local_skill(DEFAULT_ENV, "a", &manifest("A"));
    link(&fx, Backend::Claude, Skill::new(Scope::Local, "a", "A", a));
    let pixi = FakePixi::failing(&["agent-skill-a"]);

    let report = UpdateCommand::new(&fx.ctx, &pixi)
        .execute(&UpdateOptions::new().with_name("a").local(true))
        .expect("failure is reported");

    assert_eq!(report.failures(), 1);
    assert!(report.relinked.is_empty());
}
