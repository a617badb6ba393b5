use anyhow::Result;
use colored::Colorize;

use crate::application::use_cases::{RepositoryState, StatusCheckUseCase, StatusReport};
use crate::infrastructure::filesystem::DeploySettings;
use crate::infrastructure::git::GitCli;
use crate::presentation::cli::OutputFormat;

/// Handler for the status command
pub struct StatusCommand {
    pub settings: DeploySettings,
    pub output: OutputFormat,
}

impl StatusCommand {
    pub fn new(settings: DeploySettings, output: OutputFormat) -> Self {
        Self { settings, output }
    }

    pub async fn execute(&self, git: GitCli) -> Result<()> {
        let config = self.settings.to_deployer_config()?;
        let report = StatusCheckUseCase::new(config, git)
            .execute()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to check status: {}", e))?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => self.print_text(&report),
        }

        Ok(())
    }

    fn print_text(&self, report: &StatusReport) {
        let state_text = match report.state {
            RepositoryState::Uninitialized => "uninitialized".cyan(),
            RepositoryState::Clean => "clean".green(),
            RepositoryState::Dirty => "dirty".yellow(),
        };

        println!("{}: {}", report.local_path.bold(), state_text);
        println!("  remote: {} ({})", report.remote, report.remote_name);

        let current = report.current_branch.as_deref().unwrap_or("-");
        if report.needs_branch_switch() {
            println!(
                "  branch: {} -> {}",
                current.blue(),
                report.target_branch.as_str().blue().bold()
            );
        } else {
            println!("  branch: {}", current.blue());
        }

        if report.has_pending_changes() {
            println!("  changes:");
            for change in &report.changes {
                println!("    {}", change);
            }
        }

        match report.state {
            RepositoryState::Uninitialized => {
                println!("deploy will initialize the repository and push everything")
            }
            RepositoryState::Clean => println!("deploy has nothing to commit"),
            RepositoryState::Dirty => println!(
                "deploy will commit and push {} change(s)",
                report.changes.len()
            ),
        }
    }
}
