/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Process execution (spawning the git executable)
/// - Git operations expressed as single git invocations
/// - File system operations (configuration file)
pub mod filesystem;
pub mod git;
pub mod process;

// Re-export commonly used types
pub use filesystem::{ConfigStore, DeploySettings};
pub use git::GitCli;
pub use process::{CommandError, CommandResult, CommandRunner, ExecutionConfig, ProcessCommandRunner};
