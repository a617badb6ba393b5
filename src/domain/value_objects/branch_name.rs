use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 設定が省略された場合に使用するブランチ名
pub const DEFAULT_BRANCH: &str = "main";

/// BranchName関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum BranchNameError {
    #[error("Branch name cannot be empty")]
    Empty,

    #[error("Branch name too long: {0} characters (max: 255)")]
    TooLong(usize),

    #[error("Invalid character in branch name: {0:?}")]
    InvalidCharacter(String),

    #[error("Branch name cannot start with '-': {0}")]
    StartsWithHyphen(String),

    #[error("Branch name cannot end with '.lock': {0}")]
    EndsWithLock(String),

    #[error("Branch name contains consecutive dots: {0}")]
    ConsecutiveDots(String),

    #[error("Branch name cannot start or end with '/': {0}")]
    BadSlash(String),

    #[error("Reserved branch name: {0}")]
    Reserved(String),
}

/// Gitブランチ名の値オブジェクト
///
/// `git check-ref-format --branch` が拒否する名前は構築時に弾く。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName {
    /// 検証済みブランチ名
    name: String,
}

impl BranchName {
    /// 新しいBranchNameインスタンスを作成
    pub fn new(name: &str) -> Result<Self, BranchNameError> {
        Self::validate(name)?;
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// ブランチ名の妥当性を検証
    fn validate(name: &str) -> Result<(), BranchNameError> {
        if name.is_empty() {
            return Err(BranchNameError::Empty);
        }

        if name.len() > 255 {
            return Err(BranchNameError::TooLong(name.len()));
        }

        // `git checkout -b -x` はオプションとして解釈される
        if name.starts_with('-') {
            return Err(BranchNameError::StartsWithHyphen(name.to_string()));
        }

        if name.ends_with(".lock") {
            return Err(BranchNameError::EndsWithLock(name.to_string()));
        }

        if name.starts_with('/') || name.ends_with('/') || name.contains("//") {
            return Err(BranchNameError::BadSlash(name.to_string()));
        }

        if matches!(name, "HEAD" | "ORIG_HEAD" | "FETCH_HEAD" | "MERGE_HEAD" | "@") {
            return Err(BranchNameError::Reserved(name.to_string()));
        }

        // ASCII制御文字、スペース、~、^、:、?、*、[、\、DEL
        for ch in name.chars() {
            if ch.is_ascii_control()
                || matches!(ch, ' ' | '~' | '^' | ':' | '?' | '*' | '[' | '\\' | '\x7F')
            {
                return Err(BranchNameError::InvalidCharacter(ch.to_string()));
            }
        }

        if name.contains("..") {
            return Err(BranchNameError::ConsecutiveDots(name.to_string()));
        }

        if name.contains("@{") {
            return Err(BranchNameError::InvalidCharacter("@{".to_string()));
        }

        Ok(())
    }

    /// ブランチ名を文字列として取得
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// `refs/heads/` 付きの完全な参照名を取得
    pub fn full_ref(&self) -> String {
        format!("refs/heads/{}", self.name)
    }
}

impl Default for BranchName {
    fn default() -> Self {
        Self {
            name: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TryFrom<&str> for BranchName {
    type Error = BranchNameError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        BranchName::new(name)
    }
}

impl TryFrom<String> for BranchName {
    type Error = BranchNameError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        BranchName::new(&name)
    }
}

impl From<BranchName> for String {
    fn from(branch: BranchName) -> Self {
        branch.name
    }
}
