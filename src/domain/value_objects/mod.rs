pub mod branch_name;
pub mod commit_message;
pub mod remote_url;

pub use branch_name::{BranchName, BranchNameError};
pub use commit_message::CommitMessage;
pub use remote_url::{RemoteKind, RemoteUrl, RemoteUrlError};
