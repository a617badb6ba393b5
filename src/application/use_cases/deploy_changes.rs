use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::entities::deployer_config::DeployerConfig;
use crate::domain::value_objects::{BranchName, CommitMessage};
use crate::infrastructure::git::GitCli;
use crate::infrastructure::process::{CommandError, CommandRunner};

/// デプロイ処理の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    /// リポジトリの初期化
    Initialize,
    /// ブランチの準備
    Branch,
    /// 全ファイルのステージング
    Stage,
    /// 変更の検出
    DetectChanges,
    /// コミット
    Commit,
    /// プッシュ
    Push,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialize => "initialize",
            Self::Branch => "branch",
            Self::Stage => "stage",
            Self::DetectChanges => "detect-changes",
            Self::Commit => "commit",
            Self::Push => "push",
        };
        f.write_str(name)
    }
}

/// デプロイ関連のエラー
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Repository initialization failed: {0}")]
    Initialize(#[source] CommandError),

    #[error("Could not prepare branch '{branch}': {reason}")]
    Branch { branch: String, reason: String },

    #[error("Staging changes failed: {0}")]
    Stage(#[source] CommandError),

    #[error("Querying working tree status failed: {0}")]
    Status(#[source] CommandError),

    #[error("Commit failed: {0}")]
    Commit(#[source] CommandError),

    #[error("Push failed: {0}")]
    Push(#[source] CommandError),
}

impl DeployError {
    /// 失敗した段階
    pub fn stage(&self) -> DeployStage {
        match self {
            Self::Initialize(_) => DeployStage::Initialize,
            Self::Branch { .. } => DeployStage::Branch,
            Self::Stage(_) => DeployStage::Stage,
            Self::Status(_) => DeployStage::DetectChanges,
            Self::Commit(_) => DeployStage::Commit,
            Self::Push(_) => DeployStage::Push,
        }
    }
}

/// ブランチ準備の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum BranchOutcome {
    /// 新しく作成して切り替えた
    Created,
    /// 既に存在していた（現在のブランチか、既存ブランチへ切り替えた）
    AlreadyExists,
    /// 作成も切り替えもできなかった
    Failed(String),
}

/// デプロイの最終結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DeployOutcome {
    /// 作業ツリーに変更が無く、コミットもプッシュもしなかった
    NothingToCommit,
    /// コミットしてプッシュした
    Pushed {
        /// 使用したコミットメッセージ
        message: String,
        /// 作成したコミットの短縮ハッシュ（取得できた場合）
        commit: Option<String>,
    },
}

/// 一回のデプロイの報告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    /// この呼び出しで `git init` を行ったか
    pub initialized: bool,

    /// ブランチ準備の結果
    pub branch: BranchOutcome,

    /// 最終結果
    pub outcome: DeployOutcome,
}

impl DeployReport {
    /// プッシュまで行ったか
    pub fn pushed(&self) -> bool {
        matches!(self.outcome, DeployOutcome::Pushed { .. })
    }
}

/// ローカルの変更をリモートへ公開するユースケース
///
/// `ensure_initialized → ensure_branch → stage_all → has_changes →
/// commit → push` の順に実行する。各段階は前段の成功を前提とする。
pub struct Deployer {
    config: DeployerConfig,
    git: GitCli,
}

impl Deployer {
    /// 新しいDeployerを作成
    pub fn new(config: DeployerConfig, git: GitCli) -> Self {
        Self { config, git }
    }

    /// 任意のCommandRunnerでDeployerを作成
    pub fn with_runner(config: DeployerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(config, GitCli::new(runner))
    }

    /// 設定を取得
    pub fn config(&self) -> &DeployerConfig {
        &self.config
    }

    fn work_dir(&self) -> &Path {
        self.config.local_path()
    }

    /// メタデータディレクトリが無ければ `git init` とリモート登録を行う
    ///
    /// 初期化した場合は `true` を返す。
    pub async fn ensure_initialized(&self) -> Result<bool, DeployError> {
        if self.git.is_repository(self.work_dir()) {
            info!(path = %self.work_dir().display(), "Git repository already initialized");
            return Ok(false);
        }

        info!(path = %self.work_dir().display(), "Initializing git repository");
        self.git
            .init(self.work_dir())
            .await
            .map_err(DeployError::Initialize)?;

        self.git
            .add_remote(
                self.work_dir(),
                self.config.remote_name(),
                self.config.remote_url(),
            )
            .await
            .map_err(DeployError::Initialize)?;
        info!(
            remote = self.config.remote_name(),
            url = %self.config.remote_url(),
            "Registered remote"
        );

        Ok(true)
    }

    /// 設定されたブランチを作成し、切り替える
    ///
    /// 既に存在する場合はそのブランチへ切り替えて `AlreadyExists` を返す。
    /// それ以外の失敗は握りつぶさず `Failed` として返す。
    pub async fn ensure_branch(&self) -> BranchOutcome {
        let branch = self.config.branch();

        match self.git.current_branch(self.work_dir()).await {
            Ok(Some(current)) if current == branch.as_str() => {
                warn!(branch = %branch, "Branch already exists and is checked out");
                return BranchOutcome::AlreadyExists;
            }
            Ok(current) => debug!(?current, "current branch"),
            Err(e) => return BranchOutcome::Failed(e.message()),
        }

        match self.git.branch_exists(self.work_dir(), branch).await {
            Ok(true) => return self.switch_to_existing(branch).await,
            Ok(false) => {}
            Err(e) => return BranchOutcome::Failed(e.message()),
        }

        match self.git.create_branch(self.work_dir(), branch).await {
            Ok(()) => {
                info!(branch = %branch, "Created branch");
                BranchOutcome::Created
            }
            Err(e) if is_already_exists(&e) => self.switch_to_existing(branch).await,
            Err(e) => BranchOutcome::Failed(e.message()),
        }
    }

    async fn switch_to_existing(&self, branch: &BranchName) -> BranchOutcome {
        match self.git.switch_branch(self.work_dir(), branch).await {
            Ok(()) => {
                warn!(branch = %branch, "Branch already exists, switched to it");
                BranchOutcome::AlreadyExists
            }
            Err(e) => BranchOutcome::Failed(e.message()),
        }
    }

    /// 作業ツリーの全ファイルをステージする
    pub async fn stage_all(&self) -> Result<(), DeployError> {
        info!("Staging all files");
        self.git
            .stage_all(self.work_dir())
            .await
            .map_err(DeployError::Stage)
    }

    /// porcelain形式のステータスが空でなければ `true`
    pub async fn has_changes(&self) -> Result<bool, DeployError> {
        self.git
            .has_changes(self.work_dir())
            .await
            .map_err(DeployError::Status)
    }

    /// コミットを作成し、取得できれば短縮ハッシュを返す
    pub async fn commit(&self, message: &CommitMessage) -> Result<Option<String>, DeployError> {
        info!(message = %message, "Creating commit");
        let output = self
            .git
            .commit(self.work_dir(), message)
            .await
            .map_err(DeployError::Commit)?;
        Ok(parse_commit_hash(&output))
    }

    /// ブランチをリモートへプッシュし、追跡ブランチを設定する
    pub async fn push(&self) -> Result<(), DeployError> {
        info!(
            remote = self.config.remote_name(),
            branch = %self.config.branch(),
            "Pushing changes"
        );
        self.git
            .push(
                self.work_dir(),
                self.config.remote_name(),
                self.config.branch(),
            )
            .await
            .map_err(DeployError::Push)
    }

    /// デプロイ全体を実行する
    ///
    /// 失敗は一度だけログに出力したうえで呼び出し元へ返す。
    /// リトライやロールバックは行わない。
    pub async fn deploy(&self, message: Option<&str>) -> Result<DeployReport, DeployError> {
        match self.run(message).await {
            Ok(report) => Ok(report),
            Err(e) => {
                error!(stage = %e.stage(), "Deploy failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run(&self, message: Option<&str>) -> Result<DeployReport, DeployError> {
        let initialized = self.ensure_initialized().await?;

        let branch = self.ensure_branch().await;
        if let BranchOutcome::Failed(reason) = &branch {
            return Err(DeployError::Branch {
                branch: self.config.branch().to_string(),
                reason: reason.clone(),
            });
        }

        self.stage_all().await?;

        if !self.has_changes().await? {
            info!("Nothing to commit");
            return Ok(DeployReport {
                initialized,
                branch,
                outcome: DeployOutcome::NothingToCommit,
            });
        }

        let message = CommitMessage::or_auto(message);
        let commit = self.commit(&message).await?;
        self.push().await?;

        info!(
            remote = self.config.remote_name(),
            branch = %self.config.branch(),
            "Changes pushed successfully"
        );

        Ok(DeployReport {
            initialized,
            branch,
            outcome: DeployOutcome::Pushed {
                message: message.to_string(),
                commit,
            },
        })
    }
}

/// `git checkout -b` の失敗が「既に存在する」ことによるものか
fn is_already_exists(error: &CommandError) -> bool {
    matches!(error, CommandError::CommandFailed { message, .. } if message.contains("already exists"))
}

/// `[main (root-commit) 1a2b3c4] message` から短縮ハッシュを取り出す
fn parse_commit_hash(commit_output: &str) -> Option<String> {
    let pattern = Regex::new(r"^\[[^\]]*?\b([0-9a-f]{7,40})\]").ok()?;
    commit_output
        .lines()
        .find_map(|line| pattern.captures(line))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::process::{CommandResult, MockCommandRunner};
    use tempfile::TempDir;

    fn deployer_with(temp_dir: &TempDir, mock: MockCommandRunner) -> Deployer {
        let config =
            DeployerConfig::new(temp_dir.path(), "https://github.com/example/site.git").unwrap();
        Deployer::with_runner(config, Arc::new(mock))
    }

    #[test]
    fn test_parse_commit_hash() {
        assert_eq!(
            parse_commit_hash("[main (root-commit) 1a2b3c4] Auto-update: 2024-01-01 00:00:00\n 1 file changed"),
            Some("1a2b3c4".to_string())
        );
        assert_eq!(
            parse_commit_hash("[feature/x 89abcdef0] msg"),
            Some("89abcdef0".to_string())
        );
        assert_eq!(parse_commit_hash("nothing to see"), None);
    }

    #[test]
    fn test_is_already_exists() {
        let exists = CommandError::CommandFailed {
            command: "git checkout -b main".to_string(),
            exit_code: 128,
            message: "fatal: a branch named 'main' already exists".to_string(),
        };
        let other = CommandError::CommandFailed {
            command: "git checkout -b main".to_string(),
            exit_code: 128,
            message: "fatal: cannot lock ref".to_string(),
        };
        assert!(is_already_exists(&exists));
        assert!(!is_already_exists(&other));
    }

    #[test]
    fn test_error_stage_mapping() {
        let push = DeployError::Push(CommandError::CommandFailed {
            command: "git push".to_string(),
            exit_code: 1,
            message: "remote rejected".to_string(),
        });
        assert_eq!(push.stage(), DeployStage::Push);
        assert_eq!(push.to_string(), "Push failed: `git push` failed with exit code 1: remote rejected");
    }

    #[tokio::test]
    async fn test_ensure_initialized_is_noop_with_metadata_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();

        let mut mock = MockCommandRunner::new();
        mock.expect_execute().times(0);

        let deployer = deployer_with(&temp_dir, mock);
        assert!(!deployer.ensure_initialized().await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_initialized_runs_init_then_remote_add() {
        let temp_dir = TempDir::new().unwrap();
        let mut seq = mockall::Sequence::new();

        let mut mock = MockCommandRunner::new();
        mock.expect_execute()
            .withf(|_, args, _| args.join(" ") == "init")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(CommandResult::new("git init", 0, "Initialized", "")));
        mock.expect_execute()
            .withf(|_, args, _| {
                args.join(" ") == "remote add origin https://github.com/example/site.git"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(CommandResult::new("git remote add", 0, "", "")));

        let deployer = deployer_with(&temp_dir, mock);
        assert!(deployer.ensure_initialized().await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_branch_failure_is_reported_not_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        let mut mock = MockCommandRunner::new();
        mock.expect_execute().returning(|_, args, _| {
            let joined = args.join(" ");
            let result = if joined.starts_with("symbolic-ref") {
                CommandResult::new("git symbolic-ref", 0, "master\n", "")
            } else if joined.starts_with("rev-parse") {
                CommandResult::new("git rev-parse", 1, "", "")
            } else {
                CommandResult::new(
                    "git checkout -b main",
                    128,
                    "",
                    "fatal: cannot lock ref 'refs/heads/main': Permission denied",
                )
            };
            Ok(result)
        });

        let deployer = deployer_with(&temp_dir, mock);
        match deployer.ensure_branch().await {
            BranchOutcome::Failed(reason) => assert!(reason.contains("Permission denied")),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }
}
