use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Command runner errors
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("`{command}` failed with exit code {exit_code}: {message}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        message: String,
    },

    #[error("Failed to launch `{command}`: {cause}")]
    LaunchFailed {
        command: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("`{command}` timed out after {timeout_seconds} seconds")]
    TimedOut {
        command: String,
        timeout_seconds: u64,
    },
}

impl CommandError {
    /// Diagnostic text reported by the tool, or the launch/timeout reason
    pub fn message(&self) -> String {
        match self {
            Self::CommandFailed { message, .. } => message.clone(),
            Self::LaunchFailed { cause, .. } => cause.to_string(),
            Self::TimedOut { timeout_seconds, .. } => {
                format!("timed out after {} seconds", timeout_seconds)
            }
        }
    }

    /// Rendered command line the error belongs to
    pub fn command(&self) -> &str {
        match self {
            Self::CommandFailed { command, .. }
            | Self::LaunchFailed { command, .. }
            | Self::TimedOut { command, .. } => command,
        }
    }
}

/// Configuration shared by every command a runner spawns
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Environment variables to set for the process
    pub environment_variables: HashMap<String, String>,

    /// Timeout for a single command in seconds
    pub timeout_seconds: Option<u64>,
}

impl ExecutionConfig {
    /// Create a new execution config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add environment variable
    pub fn with_environment_variable(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.environment_variables.insert(key.into(), value.into());
        self
    }

    /// Add multiple environment variables
    pub fn with_environment_variables(mut self, vars: HashMap<String, String>) -> Self {
        self.environment_variables.extend(vars);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}

/// Result of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Rendered command line, for logs and errors
    pub command: String,

    /// Exit code of the process (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Standard output
    pub stdout: String,

    /// Standard error output
    pub stderr: String,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl CommandResult {
    /// Create a new command result
    pub fn new(
        command: impl Into<String>,
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            execution_time_ms: 0,
        }
    }

    /// Whether the command exited with status zero
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output with trailing whitespace trimmed, or `CommandFailed`
    /// carrying the tool's diagnostic text on a non-zero exit.
    pub fn into_stdout(self) -> Result<String, CommandError> {
        if self.success() {
            return Ok(self.stdout.trim_end().to_string());
        }

        // git reports some failures (e.g. "nothing to commit") on stdout
        let message = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };

        Err(CommandError::CommandFailed {
            command: self.command,
            exit_code: self.exit_code,
            message: message.to_string(),
        })
    }
}

/// Render a program and its arguments as one line for display
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(|part| {
            if part.is_empty() || part.contains(char::is_whitespace) {
                format!("{:?}", part)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spawns an external program with an argument list (never through a shell)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program args...` in `working_dir` and wait for it to finish.
    ///
    /// A non-zero exit is not an error at this level; see
    /// [`CommandResult::into_stdout`].
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult, CommandError>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandRunner {
    config: ExecutionConfig,
}

impl ProcessCommandRunner {
    /// Create a runner with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with the given configuration
    pub fn with_config(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Runner configuration
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult, CommandError> {
        let command_line = render_command(program, args);
        let start_time = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in &self.config.environment_variables {
            cmd.env(key, value);
        }

        debug!(command = %command_line, dir = %working_dir.display(), "spawning");

        let child = cmd.spawn().map_err(|cause| CommandError::LaunchFailed {
            command: command_line.clone(),
            cause,
        })?;

        // Dropping the wait future on timeout kills the child (kill_on_drop)
        let output = match self.config.timeout_seconds {
            Some(timeout_seconds) => {
                match timeout(
                    Duration::from_secs(timeout_seconds),
                    child.wait_with_output(),
                )
                .await
                {
                    Ok(output) => output,
                    Err(_) => {
                        return Err(CommandError::TimedOut {
                            command: command_line,
                            timeout_seconds,
                        })
                    }
                }
            }
            None => child.wait_with_output().await,
        }
        .map_err(|cause| CommandError::LaunchFailed {
            command: command_line.clone(),
            cause,
        })?;

        let mut result = CommandResult::new(
            command_line,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        result.execution_time_ms = start_time.elapsed().as_millis() as u64;

        debug!(
            command = %result.command,
            exit_code = result.exit_code,
            elapsed_ms = result.execution_time_ms,
            "finished"
        );

        Ok(result)
    }
}
