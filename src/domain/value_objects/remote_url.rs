use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// RemoteUrl関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum RemoteUrlError {
    #[error("Remote URL cannot be empty")]
    Empty,

    #[error("Invalid remote URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in remote URL: {0}")]
    MissingHost(String),

    #[error("Missing repository path in remote URL: {0}")]
    MissingRepoPath(String),

    #[error("Invalid characters in remote URL: {0}")]
    InvalidCharacters(String),
}

/// リモートの指定形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKind {
    /// `https://host/org/repo.git` などスキーム付きURL
    Url,
    /// `git@host:org/repo.git` 形式
    ScpLike,
    /// ローカルのパス（ベアリポジトリなど）
    LocalPath,
}

/// gitのリモート位置を表す値オブジェクト
///
/// 文字列は正規化せずにそのまま `git remote add` に渡す。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteUrl {
    /// 検証済みのURL文字列（前後の空白は除去済み）
    url: String,

    /// 指定形式
    kind: RemoteKind,
}

impl RemoteUrl {
    /// 新しいRemoteUrlインスタンスを作成
    pub fn new(url: &str) -> Result<Self, RemoteUrlError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(RemoteUrlError::Empty);
        }

        // 制御文字や先頭のハイフン（オプション扱いされる）は拒否
        if let Some(ch) = trimmed.chars().find(|c| c.is_control()) {
            return Err(RemoteUrlError::InvalidCharacters(format!(
                "control character {:?}",
                ch
            )));
        }
        if trimmed.starts_with('-') {
            return Err(RemoteUrlError::InvalidCharacters(
                "leading '-' would be parsed as an option".to_string(),
            ));
        }

        let kind = Self::classify(trimmed)?;

        Ok(Self {
            url: trimmed.to_string(),
            kind,
        })
    }

    /// 形式を判定し、形式ごとの検証を行う
    fn classify(url: &str) -> Result<RemoteKind, RemoteUrlError> {
        if url.contains("://") {
            Self::validate_scheme_url(url)?;
            return Ok(RemoteKind::Url);
        }

        // Windowsのドライブレター（C:\repo）はscp形式と区別する
        let drive_letter = Regex::new(r"^[A-Za-z]:[\\/]")
            .map_err(|e| RemoteUrlError::InvalidFormat(e.to_string()))?;
        if drive_letter.is_match(url) || Path::new(url).is_absolute() {
            return Ok(RemoteKind::LocalPath);
        }

        let scp_like = Regex::new(r"^(?:[A-Za-z0-9._~-]+@)?([A-Za-z0-9.-]+):(.*)$")
            .map_err(|e| RemoteUrlError::InvalidFormat(e.to_string()))?;
        if let Some(captures) = scp_like.captures(url) {
            let path = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
            if path.is_empty() {
                return Err(RemoteUrlError::MissingRepoPath(url.to_string()));
            }
            return Ok(RemoteKind::ScpLike);
        }

        if url.contains(':') {
            return Err(RemoteUrlError::InvalidFormat(url.to_string()));
        }

        Ok(RemoteKind::LocalPath)
    }

    /// スキーム付きURLの検証
    fn validate_scheme_url(url: &str) -> Result<(), RemoteUrlError> {
        let parsed = Url::parse(url).map_err(|_| RemoteUrlError::InvalidFormat(url.to_string()))?;

        match parsed.scheme() {
            "file" => {}
            "https" | "http" | "ssh" | "git" => {
                if parsed.host_str().map_or(true, str::is_empty) {
                    return Err(RemoteUrlError::MissingHost(url.to_string()));
                }
            }
            other => return Err(RemoteUrlError::UnsupportedScheme(other.to_string())),
        }

        let path = parsed.path();
        if path.is_empty() || path == "/" {
            return Err(RemoteUrlError::MissingRepoPath(url.to_string()));
        }

        Ok(())
    }

    /// URL文字列を取得
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// 指定形式を取得
    pub fn kind(&self) -> RemoteKind {
        self.kind
    }

    /// ログ出力用に認証情報を伏せた文字列を返す
    pub fn redacted(&self) -> String {
        if self.kind != RemoteKind::Url {
            return self.url.clone();
        }
        let mut parsed = match Url::parse(&self.url) {
            Ok(parsed) => parsed,
            Err(_) => return self.url.clone(),
        };
        if parsed.password().is_some() {
            let _ = parsed.set_password(Some("***"));
        } else if !parsed.username().is_empty() {
            // トークンがユーザー名として渡される場合がある
            let _ = parsed.set_username("***");
        } else {
            return self.url.clone();
        }
        parsed.to_string()
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl TryFrom<&str> for RemoteUrl {
    type Error = RemoteUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        RemoteUrl::new(url)
    }
}

impl TryFrom<String> for RemoteUrl {
    type Error = RemoteUrlError;

    fn try_from(url: String) -> Result<Self, Self::Error> {
        RemoteUrl::new(&url)
    }
}

impl From<RemoteUrl> for String {
    fn from(remote: RemoteUrl) -> Self {
        remote.url
    }
}
