use serde::Serialize;
use std::sync::Arc;

use crate::domain::entities::deployer_config::DeployerConfig;
use crate::infrastructure::git::GitCli;
use crate::infrastructure::process::{CommandError, CommandRunner};

/// 作業ツリーの状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryState {
    /// メタデータディレクトリが無い（deployで初期化される）
    Uninitialized,
    /// 変更なし
    Clean,
    /// 未コミットの変更あり
    Dirty,
}

/// deployを実行した場合に何が起こるかの報告
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// ローカルパス
    pub local_path: String,

    /// リモート（認証情報は伏せる）
    pub remote: String,

    /// リモート名
    pub remote_name: String,

    /// 状態
    pub state: RepositoryState,

    /// 現在のブランチ
    pub current_branch: Option<String>,

    /// デプロイ先のブランチ
    pub target_branch: String,

    /// porcelain形式の変更行
    pub changes: Vec<String>,
}

impl StatusReport {
    /// ブランチの作成または切り替えが必要か
    pub fn needs_branch_switch(&self) -> bool {
        self.current_branch.as_deref() != Some(self.target_branch.as_str())
    }

    /// deployでコミットが作られるか
    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// 読み取り専用のステータス確認
///
/// ステージ、コミット、プッシュは一切行わない。
pub struct StatusCheckUseCase {
    config: DeployerConfig,
    git: GitCli,
}

impl StatusCheckUseCase {
    /// 新しいStatusCheckUseCaseを作成
    pub fn new(config: DeployerConfig, git: GitCli) -> Self {
        Self { config, git }
    }

    /// 任意のCommandRunnerで作成
    pub fn with_runner(config: DeployerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(config, GitCli::new(runner))
    }

    /// ステータスを確認
    pub async fn execute(&self) -> Result<StatusReport, CommandError> {
        let dir = self.config.local_path();

        let mut report = StatusReport {
            local_path: dir.display().to_string(),
            remote: self.config.remote_url().to_string(),
            remote_name: self.config.remote_name().to_string(),
            state: RepositoryState::Uninitialized,
            current_branch: None,
            target_branch: self.config.branch().to_string(),
            changes: Vec::new(),
        };

        // 親ディレクトリのリポジトリを拾わないよう、未初期化ならgitを呼ばない
        if !self.git.is_repository(dir) {
            return Ok(report);
        }

        report.current_branch = self.git.current_branch(dir).await?;
        report.changes = self
            .git
            .status_porcelain(dir)
            .await?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        report.state = if report.changes.is_empty() {
            RepositoryState::Clean
        } else {
            RepositoryState::Dirty
        };

        Ok(report)
    }
}
