use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 自動生成メッセージの接頭辞
pub const AUTO_UPDATE_PREFIX: &str = "Auto-update: ";

/// 自動生成メッセージのタイムスタンプ書式（YYYY-MM-DD HH:MM:SS）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// コミットメッセージ
///
/// 明示的に指定されたメッセージか、ローカル時刻から生成した
/// `Auto-update: YYYY-MM-DD HH:MM:SS` のどちらか。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitMessage(String);

impl CommitMessage {
    /// 指定されたメッセージを使い、無ければ現在時刻から生成する
    pub fn or_auto(message: Option<&str>) -> Self {
        match message {
            Some(text) if !text.trim().is_empty() => Self(text.to_string()),
            _ => Self::auto_update(&Local::now()),
        }
    }

    /// 与えられた時刻から自動更新メッセージを生成
    pub fn auto_update<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(format!(
            "{}{}",
            AUTO_UPDATE_PREFIX,
            at.format(TIMESTAMP_FORMAT)
        ))
    }

    /// 自動生成されたメッセージかどうか
    pub fn is_auto_update(&self) -> bool {
        self.0
            .strip_prefix(AUTO_UPDATE_PREFIX)
            .map(|ts| chrono::NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_ok())
            .unwrap_or(false)
    }

    /// メッセージ本文を取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
