use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::deployer_config::METADATA_DIR;
use crate::domain::value_objects::{BranchName, CommitMessage, RemoteUrl};
use crate::infrastructure::process::{CommandError, CommandResult, CommandRunner};

/// Default git executable
pub const GIT_EXECUTABLE: &str = "git";

/// Typed git operations over an external `git` executable
///
/// Every method maps to exactly one git invocation in the given working
/// tree. Methods returning `String` yield stdout with trailing whitespace
/// trimmed; a non-zero exit becomes [`CommandError::CommandFailed`].
#[derive(Clone)]
pub struct GitCli {
    runner: Arc<dyn CommandRunner>,
    git_executable: String,
}

impl GitCli {
    /// Create a git wrapper over the given runner
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            git_executable: GIT_EXECUTABLE.to_string(),
        }
    }

    /// Use a custom git executable path
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.git_executable = executable.into();
        self
    }

    /// Configured git executable
    pub fn executable(&self) -> &str {
        &self.git_executable
    }

    /// Run git and return the raw result, whatever the exit code
    async fn execute(&self, args: &[&str], working_dir: &Path) -> Result<CommandResult, CommandError> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        self.runner
            .execute(&self.git_executable, &args, working_dir)
            .await
    }

    /// Run git and fail on a non-zero exit
    async fn execute_checked(&self, args: &[&str], working_dir: &Path) -> Result<String, CommandError> {
        self.execute(args, working_dir).await?.into_stdout()
    }

    /// Whether `path` already holds version-control metadata
    pub fn is_repository(&self, path: &Path) -> bool {
        path.join(METADATA_DIR).exists()
    }

    /// `git init`
    pub async fn init(&self, working_dir: &Path) -> Result<String, CommandError> {
        self.execute_checked(&["init"], working_dir).await
    }

    /// `git remote add <name> <url>`
    pub async fn add_remote(
        &self,
        working_dir: &Path,
        name: &str,
        url: &RemoteUrl,
    ) -> Result<(), CommandError> {
        self.execute_checked(&["remote", "add", name, url.as_str()], working_dir)
            .await
            .map(|_| ())
    }

    /// Name of the checked-out branch, `None` on a detached HEAD.
    ///
    /// Works on an unborn branch right after `git init`.
    pub async fn current_branch(&self, working_dir: &Path) -> Result<Option<String>, CommandError> {
        let result = self
            .execute(&["symbolic-ref", "--quiet", "--short", "HEAD"], working_dir)
            .await?;

        // exit 1 with --quiet means detached HEAD
        if result.exit_code == 1 && result.stderr.trim().is_empty() {
            return Ok(None);
        }

        let name = result.into_stdout()?;
        Ok(Some(name).filter(|n| !n.is_empty()))
    }

    /// Whether `refs/heads/<branch>` exists
    pub async fn branch_exists(
        &self,
        working_dir: &Path,
        branch: &BranchName,
    ) -> Result<bool, CommandError> {
        let full_ref = branch.full_ref();
        let result = self
            .execute(&["rev-parse", "--verify", "--quiet", &full_ref], working_dir)
            .await?;

        match result.exit_code {
            0 => Ok(true),
            1 => Ok(false),
            _ => result.into_stdout().map(|_| false),
        }
    }

    /// `git checkout -b <branch>`
    pub async fn create_branch(
        &self,
        working_dir: &Path,
        branch: &BranchName,
    ) -> Result<(), CommandError> {
        self.execute_checked(&["checkout", "-b", branch.as_str()], working_dir)
            .await
            .map(|_| ())
    }

    /// `git checkout <branch>`
    pub async fn switch_branch(
        &self,
        working_dir: &Path,
        branch: &BranchName,
    ) -> Result<(), CommandError> {
        self.execute_checked(&["checkout", branch.as_str()], working_dir)
            .await
            .map(|_| ())
    }

    /// `git add .`
    pub async fn stage_all(&self, working_dir: &Path) -> Result<(), CommandError> {
        self.execute_checked(&["add", "."], working_dir)
            .await
            .map(|_| ())
    }

    /// `git status --porcelain`
    pub async fn status_porcelain(&self, working_dir: &Path) -> Result<String, CommandError> {
        self.execute_checked(&["status", "--porcelain"], working_dir)
            .await
    }

    /// Whether the porcelain status reports any change
    pub async fn has_changes(&self, working_dir: &Path) -> Result<bool, CommandError> {
        let status = self.status_porcelain(working_dir).await?;
        debug!(entries = status.lines().count(), "porcelain status");
        Ok(!status.trim().is_empty())
    }

    /// `git commit -m <message>`
    pub async fn commit(
        &self,
        working_dir: &Path,
        message: &CommitMessage,
    ) -> Result<String, CommandError> {
        self.execute_checked(&["commit", "-m", message.as_str()], working_dir)
            .await
    }

    /// `git push -u <remote> <branch>`
    pub async fn push(
        &self,
        working_dir: &Path,
        remote: &str,
        branch: &BranchName,
    ) -> Result<(), CommandError> {
        self.execute_checked(&["push", "-u", remote, branch.as_str()], working_dir)
            .await
            .map(|_| ())
    }

    /// Subjects of the last `max_count` commits, newest first
    pub async fn log_subjects(
        &self,
        working_dir: &Path,
        max_count: usize,
    ) -> Result<Vec<String>, CommandError> {
        let max_count = format!("--max-count={}", max_count);
        let output = self
            .execute_checked(&["log", &max_count, "--format=%s"], working_dir)
            .await?;
        Ok(output.lines().map(str::to_string).collect())
    }
}
