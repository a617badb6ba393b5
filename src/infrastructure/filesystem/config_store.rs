use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::debug;

use crate::common::error::GitDeployError;
use crate::common::result::{GitDeployResult, OptionExt};
use crate::common::templates::TemplateProcessor;
use crate::domain::entities::deployer_config::DeployerConfig;
use crate::infrastructure::process::ExecutionConfig;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "gitdeploy.yaml";

/// Config store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Config file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Config file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(String),

    #[error("Config file read failed: {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file write failed: {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing failed in {path}: {source}")]
    YamlParsingFailed {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Settings as written in `gitdeploy.yaml`, or collected from the command
/// line. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploySettings {
    /// Local working tree to publish
    #[serde(default)]
    pub local_path: Option<PathBuf>,

    /// Remote repository locator
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Branch to create and push
    #[serde(default)]
    pub branch: Option<String>,

    /// Remote name registered on init
    #[serde(default)]
    pub remote_name: Option<String>,

    /// git executable
    #[serde(default)]
    pub git_executable: Option<String>,

    /// Per-command timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Extra environment for every git invocation
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl DeploySettings {
    /// Layer `overrides` on top of `self`; set fields in `overrides` win,
    /// environment maps are merged key by key.
    pub fn merge(mut self, overrides: DeploySettings) -> Self {
        self.local_path = overrides.local_path.or(self.local_path);
        self.remote_url = overrides.remote_url.or(self.remote_url);
        self.branch = overrides.branch.or(self.branch);
        self.remote_name = overrides.remote_name.or(self.remote_name);
        self.git_executable = overrides.git_executable.or(self.git_executable);
        self.timeout_secs = overrides.timeout_secs.or(self.timeout_secs);
        self.env.extend(overrides.env);
        self
    }

    /// Build the validated deployer configuration.
    ///
    /// A missing `local_path` means the current directory.
    pub fn to_deployer_config(&self) -> GitDeployResult<DeployerConfig> {
        let remote_url = self
            .remote_url
            .as_deref()
            .ok_or_validation_error("remote_url", "a remote URL is required (--remote, GITDEPLOY_REMOTE or remote_url in gitdeploy.yaml)")?;

        let local_path = self
            .local_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = DeployerConfig::new(local_path, remote_url)?;
        if let Some(branch) = &self.branch {
            config = config.with_branch(branch)?;
        }
        if let Some(remote_name) = &self.remote_name {
            config = config.with_remote_name(remote_name)?;
        }
        Ok(config)
    }

    /// Runner configuration for these settings
    pub fn execution_config(&self) -> GitDeployResult<ExecutionConfig> {
        let mut config = ExecutionConfig::new().with_environment_variables(
            self.env.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        );
        if let Some(timeout_secs) = self.timeout_secs {
            if timeout_secs == 0 {
                return Err(GitDeployError::validation_error(
                    "timeout_secs",
                    "must be greater than zero",
                    Some("0".to_string()),
                ));
            }
            config = config.with_timeout(timeout_secs);
        }
        Ok(config)
    }
}

/// Reads and writes `gitdeploy.yaml`
#[derive(Debug, Clone, Default)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new config store
    pub fn new() -> Self {
        Self
    }

    /// Default config file location inside `dir`, if the file exists
    pub fn find_default(&self, dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Read settings from a YAML file.
    ///
    /// A relative `local_path` is resolved against the file's directory.
    pub async fn load(&self, path: &Path) -> Result<DeploySettings, ConfigStoreError> {
        if !path.exists() {
            return Err(ConfigStoreError::ConfigFileNotFound(
                path.display().to_string(),
            ));
        }

        let content =
            async_fs::read_to_string(path)
                .await
                .map_err(|source| ConfigStoreError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })?;

        let mut settings: DeploySettings = if content.trim().is_empty() {
            DeploySettings::default()
        } else {
            serde_yaml::from_str(&content).map_err(|source| {
                ConfigStoreError::YamlParsingFailed {
                    path: path.display().to_string(),
                    source,
                }
            })?
        };

        if let (Some(local_path), Some(base)) = (&settings.local_path, path.parent()) {
            if local_path.is_relative() {
                settings.local_path = Some(base.join(local_path));
            }
        }

        debug!(path = %path.display(), "loaded config file");
        Ok(settings)
    }

    /// Write the commented configuration template
    pub async fn write_template(
        &self,
        path: &Path,
        remote_url: &str,
        branch: &str,
        force: bool,
    ) -> Result<(), ConfigStoreError> {
        if path.exists() && !force {
            return Err(ConfigStoreError::AlreadyExists(path.display().to_string()));
        }

        let content = TemplateProcessor::new().render_config(remote_url, branch);
        self.write(path, &content).await
    }

    async fn write(&self, path: &Path, content: &str) -> Result<(), ConfigStoreError> {
        let write_failed = |source| ConfigStoreError::WriteFailed {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await.map_err(write_failed)?;
        }
        async_fs::write(path, content).await.map_err(write_failed)
    }
}
