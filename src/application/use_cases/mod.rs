pub mod deploy_changes;
pub mod status_check;

pub use deploy_changes::{
    BranchOutcome, DeployError, DeployOutcome, DeployReport, DeployStage, Deployer,
};
pub use status_check::{RepositoryState, StatusCheckUseCase, StatusReport};
