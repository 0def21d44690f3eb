//! Template installation
//!
//! Each resolved item becomes one installer invocation of the shape
//! `<installer> --<category-singular> <item>`. Items are installed one at a
//! time; a failing item is recorded and the rest still run.
//!
//! The actual process launch sits behind the [`Installer`] trait so the plan
//! runner can be exercised without spawning anything.

use std::fmt;
use std::process::{Command, Stdio};

use crate::config::Settings;
use crate::error::{AitmplError, Result};
use crate::logic::set_resolver::ResolvedSet;
use crate::types::Category;

/// One template to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    pub category: Category,
    pub item: String,
}

impl InstallCommand {
    pub fn new(category: Category, item: impl Into<String>) -> Self {
        Self {
            category,
            item: item.into(),
        }
    }

    /// Arguments appended to the installer command.
    pub fn to_cli_args(&self) -> Vec<String> {
        vec![format!("--{}", self.category.singular()), self.item.clone()]
    }

    /// Full command line as shown to the user.
    pub fn display_with(&self, installer_command: &str) -> String {
        format!(
            "{} --{} {}",
            installer_command,
            self.category.singular(),
            self.item
        )
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category.singular(), self.item)
    }
}

/// Every item of a resolved set, in category order then item order.
pub fn plan_install(resolved: &ResolvedSet) -> Vec<InstallCommand> {
    resolved
        .iter()
        .flat_map(|(category, items)| {
            items
                .iter()
                .map(move |item| InstallCommand::new(category, item.clone()))
        })
        .collect()
}

/// Output from one installer invocation.
#[derive(Debug, Clone, Default)]
pub struct InstallOutput {
    /// Standard output from the installer.
    pub stdout: String,
    /// Standard error from the installer.
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the installer exited successfully (exit code 0).
    pub success: bool,
}

impl InstallOutput {
    /// Short reason for a failed run.
    pub fn failure_reason(&self) -> String {
        let code = self.exit_code.unwrap_or(-1);
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exit code {}", code)
        } else {
            format!("exit code {}: {}", code, stderr)
        }
    }
}

/// Capability to install a single template.
///
/// `Ok` with `success: false` is a clean failure reported by the installer;
/// `Err` means the installer could not be run at all. Both are recorded as
/// per-item failures by [`run_install_plan`].
pub trait Installer {
    fn install(&self, command: &InstallCommand) -> Result<InstallOutput>;
}

/// Runs an external installer program, e.g. `npx claude-code-templates@latest`.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
    base_args: Vec<String>,
}

impl CommandInstaller {
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let (program, base_args) = settings.installer_argv()?;
        Ok(Self::new(program, base_args))
    }
}

impl Installer for CommandInstaller {
    fn install(&self, command: &InstallCommand) -> Result<InstallOutput> {
        let cli_args = command.to_cli_args();
        tracing::info!(
            program = %self.program,
            args = ?self.base_args,
            item = ?cli_args,
            "running installer"
        );

        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(&cli_args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                AitmplError::installer(format!("failed to run {}: {}", self.program, e))
            })?;

        let result = InstallOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
        };

        if result.success {
            tracing::debug!(item = %command.item, "installed");
        } else {
            tracing::warn!(item = %command.item, code = ?result.exit_code, "installer failed");
        }
        Ok(result)
    }
}

/// How one item went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { stdout: String },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct InstallRecord {
    pub command: InstallCommand,
    pub outcome: InstallOutcome,
}

/// Result of running a whole plan.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub records: Vec<InstallRecord>,
}

impl InstallReport {
    pub fn succeeded(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, InstallOutcome::Installed { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Install every command in order, recording each outcome.
///
/// `on_record` sees each record as soon as it is known, so callers can
/// print progress.
pub fn run_install_plan<F>(
    installer: &dyn Installer,
    plan: &[InstallCommand],
    mut on_record: F,
) -> InstallReport
where
    F: FnMut(&InstallRecord),
{
    let mut report = InstallReport::default();

    for command in plan {
        let outcome = match installer.install(command) {
            Ok(output) if output.success => InstallOutcome::Installed {
                stdout: output.stdout,
            },
            Ok(output) => InstallOutcome::Failed(output.failure_reason()),
            Err(e) => InstallOutcome::Failed(e.to_string()),
        };
        let record = InstallRecord {
            command: command.clone(),
            outcome,
        };
        on_record(&record);
        report.records.push(record);
    }

    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "install plan finished"
    );
    report
}
