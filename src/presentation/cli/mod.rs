pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;

use crate::infrastructure::filesystem::{ConfigStore, DeploySettings};
use crate::infrastructure::git::{GitCli, GIT_EXECUTABLE};
use crate::infrastructure::process::ProcessCommandRunner;

use commands::{DeployCommand, InitCommand, StatusCommand};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GITDEPLOY_GIT_HASH"),
    " ",
    env!("GITDEPLOY_BUILD_DATE"),
    ")"
);

/// Output format options for status command
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
}

/// gitdeploy - Publish local changes to a git remote
#[derive(Parser, Debug)]
#[command(name = "gitdeploy")]
#[command(about = "Initialize, commit and push a working tree in one step")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<String>,

    /// Configuration file (defaults to ./gitdeploy.yaml when present)
    #[arg(short, long, global = true, env = "GITDEPLOY_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where and what to publish; every value may also come from the config file
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Local working tree to publish
    #[arg(short, long, env = "GITDEPLOY_PATH")]
    pub path: Option<PathBuf>,

    /// Remote repository URL
    #[arg(short, long, env = "GITDEPLOY_REMOTE")]
    pub remote: Option<String>,

    /// Branch to create and push (default: main)
    #[arg(short, long, env = "GITDEPLOY_BRANCH")]
    pub branch: Option<String>,

    /// Name the remote is registered under on init (default: origin)
    #[arg(long)]
    pub remote_name: Option<String>,

    /// git executable to use
    #[arg(long = "git")]
    pub git_executable: Option<String>,

    /// Abort a single git command after this many seconds
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,
}

impl TargetArgs {
    /// Command-line layer of the settings
    pub fn to_settings(&self) -> DeploySettings {
        DeploySettings {
            local_path: self.path.clone(),
            remote_url: self.remote.clone(),
            branch: self.branch.clone(),
            remote_name: self.remote_name.clone(),
            git_executable: self.git_executable.clone(),
            timeout_secs: self.timeout_secs,
            ..Default::default()
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize if needed, then stage, commit and push all changes
    Deploy {
        #[command(flatten)]
        target: TargetArgs,

        /// Commit message (default: "Auto-update: <local timestamp>")
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show what deploy would do, without changing anything
    Status {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Write a gitdeploy.yaml template
    Init {
        /// Directory where to create gitdeploy.yaml (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Remote URL to put in the template
        #[arg(short, long)]
        remote: Option<String>,

        /// Branch to put in the template
        #[arg(short, long)]
        branch: Option<String>,

        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    /// Parse the process arguments
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    /// Use already parsed arguments
    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected subcommand; exits with status 1 on failure
    pub async fn run(self) -> anyhow::Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        // Change directory if specified
        if let Some(ref dir) = self.cli.directory {
            env::set_current_dir(dir)?;
        }

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        match &self.cli.command {
            Commands::Deploy { target, message } => {
                let settings = self.resolve_settings(target).await?;
                let git = self.git_for(&settings)?;
                DeployCommand::new(settings, message.clone())
                    .execute(git)
                    .await
            }
            Commands::Status { target, output } => {
                let settings = self.resolve_settings(target).await?;
                let git = self.git_for(&settings)?;
                StatusCommand::new(settings, output.clone())
                    .execute(git)
                    .await
            }
            Commands::Init {
                path,
                remote,
                branch,
                force,
            } => {
                InitCommand::new(path.clone(), remote.clone(), branch.clone(), *force)
                    .execute()
                    .await
            }
        }
    }

    /// Config file settings with command-line values layered on top
    async fn resolve_settings(&self, target: &TargetArgs) -> anyhow::Result<DeploySettings> {
        let store = ConfigStore::new();

        let file_settings = match &self.cli.config {
            Some(path) => store.load(Path::new(path)).await?,
            None => match store.find_default(&env::current_dir()?) {
                Some(path) => store.load(&path).await?,
                None => DeploySettings::default(),
            },
        };

        Ok(file_settings.merge(target.to_settings()))
    }

    fn git_for(&self, settings: &DeploySettings) -> anyhow::Result<GitCli> {
        let runner = ProcessCommandRunner::with_config(settings.execution_config()?);
        let executable = settings
            .git_executable
            .clone()
            .unwrap_or_else(|| GIT_EXECUTABLE.to_string());
        Ok(GitCli::new(Arc::new(runner)).with_executable(executable))
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
