use crate::common::error::GitDeployError;

/// gitdeploy全体で使用するResult型のエイリアス
///
/// このエイリアスにより、プロジェクト全体で一貫したエラーハンドリングが可能になる。
///
/// # Examples
///
/// ```
/// use gitdeploy::common::result::GitDeployResult;
/// use gitdeploy::common::error::GitDeployError;
///
/// fn example_function() -> GitDeployResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> GitDeployResult<()> {
///     Err(GitDeployError::validation_error("branch", "must not be empty", None))
/// }
/// ```
pub type GitDeployResult<T> = Result<T, GitDeployError>;

/// Optionのエラー変換ヘルパー
pub trait OptionExt<T> {
    /// Option値をValidationErrorに変換する
    ///
    /// # Arguments
    ///
    /// * `field` - バリデーションエラーのフィールド名
    /// * `message` - エラーメッセージ
    ///
    /// # Examples
    ///
    /// ```
    /// use gitdeploy::common::result::{GitDeployResult, OptionExt};
    ///
    /// let none_value: Option<String> = None;
    /// let result: GitDeployResult<String> = none_value.ok_or_validation_error("remote_url", "required");
    /// assert!(result.is_err());
    /// ```
    fn ok_or_validation_error(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> GitDeployResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_validation_error(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> GitDeployResult<T> {
        self.ok_or_else(|| GitDeployError::validation_error(field, message, None))
    }
}

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T, E> {
    /// ファイルシステムエラーとしてGitDeployResultに変換
    ///
    /// # Examples
    ///
    /// ```
    /// use gitdeploy::common::result::{GitDeployResult, ResultExt};
    ///
    /// let result: GitDeployResult<std::path::PathBuf> =
    ///     std::env::current_dir().with_filesystem_error("Cannot determine current directory", None);
    /// assert!(result.is_ok());
    /// ```
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GitDeployResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GitDeployResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| GitDeployError::filesystem_error_with_source(message, path, e.into()))
    }
}
