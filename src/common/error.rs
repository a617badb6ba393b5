use std::path::PathBuf;
use thiserror::Error;

use crate::application::use_cases::deploy_changes::DeployError;
use crate::domain::entities::deployer_config::DeployerConfigError;
use crate::infrastructure::filesystem::config_store::ConfigStoreError;
use crate::infrastructure::process::CommandError;

#[derive(Error, Debug)]
pub enum GitDeployError {
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("Command execution failed: {0}")]
    CommandError(#[from] CommandError),

    #[error(transparent)]
    DeployError(#[from] DeployError),
}

impl GitDeployError {
    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }
}

impl From<std::io::Error> for GitDeployError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<DeployerConfigError> for GitDeployError {
    fn from(error: DeployerConfigError) -> Self {
        Self::config_error_with_source("Invalid deployer configuration", error)
    }
}

impl From<ConfigStoreError> for GitDeployError {
    fn from(error: ConfigStoreError) -> Self {
        Self::config_error_with_source("Failed to load configuration file", error)
    }
}
