use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::value_objects::{
    branch_name::{BranchName, BranchNameError},
    remote_url::{RemoteUrl, RemoteUrlError},
};

/// リモート名のデフォルト値
pub const DEFAULT_REMOTE_NAME: &str = "origin";

/// gitのメタデータディレクトリ名
pub const METADATA_DIR: &str = ".git";

/// DeployerConfig構築時のエラー
#[derive(Debug, Error)]
pub enum DeployerConfigError {
    #[error("Local path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Local path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid remote URL: {0}")]
    InvalidRemoteUrl(#[from] RemoteUrlError),

    #[error("Invalid branch name: {0}")]
    InvalidBranch(#[from] BranchNameError),

    #[error("Invalid remote name: {0:?}")]
    InvalidRemoteName(String),
}

/// デプロイ設定
///
/// 構築後は不変で、ひとつのDeployerが専有する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployerConfig {
    /// 公開するローカル作業ツリー
    local_path: PathBuf,

    /// プッシュ先のリモート
    remote_url: RemoteUrl,

    /// 作成・プッシュするブランチ
    branch: BranchName,

    /// `git init` 時に登録するリモート名
    remote_name: String,
}

impl DeployerConfig {
    /// 新しい設定を作成（ブランチは `main`、リモート名は `origin`）
    pub fn new(
        local_path: impl Into<PathBuf>,
        remote_url: &str,
    ) -> Result<Self, DeployerConfigError> {
        let local_path = local_path.into();
        Self::validate_local_path(&local_path)?;

        Ok(Self {
            local_path,
            remote_url: RemoteUrl::new(remote_url)?,
            branch: BranchName::default(),
            remote_name: DEFAULT_REMOTE_NAME.to_string(),
        })
    }

    /// ブランチを指定
    pub fn with_branch(mut self, branch: &str) -> Result<Self, DeployerConfigError> {
        self.branch = BranchName::new(branch)?;
        Ok(self)
    }

    /// リモート名を指定
    pub fn with_remote_name(mut self, remote_name: &str) -> Result<Self, DeployerConfigError> {
        let valid = !remote_name.is_empty()
            && !remote_name.starts_with('-')
            && remote_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(DeployerConfigError::InvalidRemoteName(remote_name.to_string()));
        }
        self.remote_name = remote_name.to_string();
        Ok(self)
    }

    fn validate_local_path(path: &Path) -> Result<(), DeployerConfigError> {
        if !path.exists() {
            return Err(DeployerConfigError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(DeployerConfigError::NotADirectory(path.to_path_buf()));
        }
        Ok(())
    }

    /// ローカルパス
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// リモートURL
    pub fn remote_url(&self) -> &RemoteUrl {
        &self.remote_url
    }

    /// ブランチ
    pub fn branch(&self) -> &BranchName {
        &self.branch
    }

    /// リモート名
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }
}
