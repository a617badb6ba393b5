pub mod command_runner;

pub use command_runner::{
    render_command,
    CommandError,
    CommandResult,
    CommandRunner,
    ExecutionConfig,
    ProcessCommandRunner,
};

#[cfg(test)]
pub use command_runner::MockCommandRunner;
