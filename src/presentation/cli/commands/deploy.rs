use anyhow::Result;
use colored::Colorize;

use crate::application::use_cases::{BranchOutcome, DeployOutcome, DeployReport, Deployer};
use crate::infrastructure::filesystem::DeploySettings;
use crate::infrastructure::git::GitCli;

/// Handler for the deploy command
pub struct DeployCommand {
    pub settings: DeploySettings,
    pub message: Option<String>,
}

impl DeployCommand {
    pub fn new(settings: DeploySettings, message: Option<String>) -> Self {
        Self { settings, message }
    }

    pub async fn execute(&self, git: GitCli) -> Result<()> {
        let config = self.settings.to_deployer_config()?;

        println!(
            "{} {} -> {} ({})",
            "Deploying".bold(),
            config.local_path().display(),
            config.remote_url(),
            config.branch().as_str().blue()
        );

        let deployer = Deployer::new(config, git);
        let report = deployer.deploy(self.message.as_deref()).await?;
        self.print_report(&report);

        Ok(())
    }

    fn print_report(&self, report: &DeployReport) {
        if report.initialized {
            println!("  {} initialized repository", "✓".green());
        }

        match &report.branch {
            BranchOutcome::Created => println!("  {} created branch", "✓".green()),
            BranchOutcome::AlreadyExists => println!("  {} branch already exists", "·".dimmed()),
            BranchOutcome::Failed(reason) => println!("  {} branch: {}", "✗".red(), reason),
        }

        match &report.outcome {
            DeployOutcome::NothingToCommit => {
                println!("{}", "Nothing to commit, working tree clean".yellow());
            }
            DeployOutcome::Pushed { message, commit } => {
                match commit {
                    Some(hash) => println!("  {} committed {} \"{}\"", "✓".green(), hash.cyan(), message),
                    None => println!("  {} committed \"{}\"", "✓".green(), message),
                }
                println!("{}", "Changes pushed successfully".green().bold());
            }
        }
    }
}
