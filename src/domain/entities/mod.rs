pub mod deployer_config;

pub use deployer_config::{DeployerConfig, DeployerConfigError};
