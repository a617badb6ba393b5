pub mod git_cli;

// Re-export main types for convenience
pub use git_cli::{GitCli, GIT_EXECUTABLE};
