pub mod config_store;

pub use config_store::{ConfigStore, ConfigStoreError, DeploySettings, CONFIG_FILE_NAME};
