//! Package-manager calls that install and update skill packages.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Result, SkillError};

/// One invocation of the package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageRequest {
    /// `pixi global install [--channel <c>] <package>`
    GlobalInstall {
        package: String,
        channel: Option<String>,
    },
    /// `pixi add <package>`
    LocalAdd { package: String },
    /// `pixi global update <package>`
    GlobalUpdate { package: String },
    /// `pixi upgrade [<package>]`
    LocalUpgrade { package: Option<String> },
}

impl PackageRequest {
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            PackageRequest::GlobalInstall { package, channel } => {
                args.extend(["global".into(), "install".into()]);
                if let Some(channel) = channel {
                    args.extend(["--channel".into(), channel.clone()]);
                }
                args.push(package.clone());
            }
            PackageRequest::LocalAdd { package } => {
                args.extend(["add".into(), package.clone()]);
            }
            PackageRequest::GlobalUpdate { package } => {
                args.extend(["global".into(), "update".into(), package.clone()]);
            }
            PackageRequest::LocalUpgrade { package } => {
                args.push("upgrade".into());
                args.extend(package.clone());
            }
        }
        args
    }
}

/// Runs package requests to completion.
pub trait PackageManager {
    fn run(&self, request: &PackageRequest) -> Result<()>;
}

impl<P: PackageManager + ?Sized> PackageManager for &P {
    fn run(&self, request: &PackageRequest) -> Result<()> {
        (**self).run(request)
    }
}

/// [`PackageManager`] backed by the `pixi` executable.
#[derive(Debug, Clone)]
pub struct PixiCli {
    program: String,
    working_dir: PathBuf,
}

impl PixiCli {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    fn command_line(&self, request: &PackageRequest) -> String {
        std::iter::once(self.program.clone())
            .chain(request.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PackageManager for PixiCli {
    fn run(&self, request: &PackageRequest) -> Result<()> {
        let command_line = self.command_line(request);
        tracing::debug!(command = %command_line, "running package manager");

        let output = Command::new(&self.program)
            .args(request.args())
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SkillError::io(format!("Failed to invoke `{}`", self.program), e))?;

        if !output.stdout.is_empty() {
            tracing::debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "package manager output");
        }

        if output.status.success() {
            return Ok(());
        }

        Err(SkillError::ExternalProcess {
            command: command_line,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_install_args_with_channel() {
        let request = PackageRequest::GlobalInstall {
            package: "agent-skill-pdf".into(),
            channel: Some("https://prefix.dev/skills".into()),
        };
        assert_eq!(
            request.args(),
            vec![
                "global",
                "install",
                "--channel",
                "https://prefix.dev/skills",
                "agent-skill-pdf"
            ]
        );
    }

    #[test]
    fn local_requests() {
        let add = PackageRequest::LocalAdd {
            package: "agent-skill-pdf".into(),
        };
        assert_eq!(add.args(), vec!["add", "agent-skill-pdf"]);

        let upgrade_all = PackageRequest::LocalUpgrade { package: None };
        assert_eq!(upgrade_all.args(), vec!["upgrade"]);
    }

    #[test]
    fn global_update_args() {
        let request = PackageRequest::GlobalUpdate {
            package: "agent-skill-git".into(),
        };
        assert_eq!(request.args(), vec!["global", "update", "agent-skill-git"]);
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_becomes_external_process_error() {
        let tmp = tempfile::tempdir().expect("tempdir should succeed");
        let cli = PixiCli::new("false", tmp.path());

        let err = cli
            .run(&PackageRequest::LocalUpgrade { package: None })
            .unwrap_err();
        assert!(matches!(
            err,
            SkillError::ExternalProcess { status: Some(1), .. }
        ));
    }

    #[test]
    fn missing_program_is_io_error() {
        let tmp = tempfile::tempdir().expect("tempdir should succeed");
        let cli = PixiCli::new("pixi-skills-definitely-missing-binary", tmp.path());

        let err = cli
            .run(&PackageRequest::LocalUpgrade { package: None })
            .unwrap_err();
        assert!(matches!(err, SkillError::Io { .. }));
    }
}
