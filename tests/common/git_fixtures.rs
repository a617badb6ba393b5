//! Fixtures driving a real `git` executable
//!
//! A working directory plus a local bare repository acting as the remote.
//! Global and system git configuration is ignored so results do not depend
//! on the machine running the tests.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;
use gitdeploy::application::use_cases::Deployer;
use gitdeploy::domain::entities::DeployerConfig;
use gitdeploy::infrastructure::git::GitCli;
use gitdeploy::infrastructure::process::{ExecutionConfig, ProcessCommandRunner};

/// Whether a usable git executable is on PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Working tree and bare remote in temporary directories
pub struct GitFixture {
    root: TempDir,
}

impl GitFixture {
    /// Create `work/` and an initialized bare `remote.git/`
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(root.path().join("work")).expect("Failed to create work dir");
        std::fs::write(root.path().join("gitconfig"), "").expect("Failed to write gitconfig");

        let fixture = Self { root };
        fixture.git_in(fixture.root.path(), &["init", "--bare", "remote.git"]);
        fixture
    }

    /// Directory being deployed
    pub fn work_dir(&self) -> PathBuf {
        self.root.path().join("work")
    }

    /// Path of the bare remote repository
    pub fn remote_path(&self) -> PathBuf {
        self.root.path().join("remote.git")
    }

    /// Remote locator as accepted by `DeployerConfig`
    pub fn remote_url(&self) -> String {
        self.remote_path().display().to_string()
    }

    /// Write a file relative to the working directory
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.work_dir().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Environment for every git invocation made by the code under test
    pub fn environment(&self) -> Vec<(String, String)> {
        let gitconfig = self.root.path().join("gitconfig").display().to_string();
        vec![
            ("GIT_AUTHOR_NAME".to_string(), "Deploy Bot".to_string()),
            ("GIT_AUTHOR_EMAIL".to_string(), "bot@example.com".to_string()),
            ("GIT_COMMITTER_NAME".to_string(), "Deploy Bot".to_string()),
            ("GIT_COMMITTER_EMAIL".to_string(), "bot@example.com".to_string()),
            ("GIT_CONFIG_GLOBAL".to_string(), gitconfig),
            ("GIT_CONFIG_NOSYSTEM".to_string(), "1".to_string()),
        ]
    }

    /// Runner configured with [`GitFixture::environment`]
    pub fn runner(&self) -> ProcessCommandRunner {
        let config = ExecutionConfig::new()
            .with_environment_variables(self.environment().into_iter().collect())
            .with_timeout(60);
        ProcessCommandRunner::with_config(config)
    }

    /// Git wrapper over a real process runner
    pub fn git(&self) -> GitCli {
        GitCli::new(Arc::new(self.runner()))
    }

    /// Deployer for `work/` pushing to the bare remote
    pub fn deployer(&self, branch: &str) -> Deployer {
        self.deployer_for(&self.remote_url(), branch)
    }

    /// Deployer for `work/` pushing to an arbitrary remote locator
    pub fn deployer_for(&self, remote_url: &str, branch: &str) -> Deployer {
        let config = DeployerConfig::new(self.work_dir(), remote_url)
            .expect("Invalid config")
            .with_branch(branch)
            .expect("Invalid branch");
        Deployer::new(config, self.git())
    }

    /// Run git synchronously for fixture setup and inspection
    pub fn git_in(&self, dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .envs(self.environment())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim_end().to_string()
    }

    /// Commit subjects on `branch` in the bare remote, newest first
    pub fn remote_subjects(&self, branch: &str) -> Vec<String> {
        let output = self.git_in(
            &self.remote_path(),
            &["log", "--format=%s", &format!("refs/heads/{}", branch)],
        );
        output.lines().map(str::to_string).collect()
    }

    /// Whether `branch` exists in the bare remote
    pub fn remote_has_branch(&self, branch: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", branch)])
            .current_dir(self.remote_path())
            .envs(self.environment())
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Files tracked at the tip of `branch` in the bare remote
    pub fn remote_files(&self, branch: &str) -> Vec<String> {
        let output = self.git_in(
            &self.remote_path(),
            &["ls-tree", "-r", "--name-only", &format!("refs/heads/{}", branch)],
        );
        output.lines().map(str::to_string).collect()
    }
}

impl Default for GitFixture {
    fn default() -> Self {
        Self::new()
    }
}
