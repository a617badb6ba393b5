//! Scripted command runner
//!
//! Records every invocation and answers from a list of canned responses,
//! so the deploy workflow can be checked without a git executable.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use gitdeploy::infrastructure::process::{
    render_command, CommandError, CommandResult, CommandRunner,
};

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl Invocation {
    /// Arguments joined with spaces, e.g. `push -u origin main`
    pub fn line(&self) -> String {
        self.args.join(" ")
    }
}

struct Rule {
    prefix: String,
    exit_code: i32,
    stdout: String,
    stderr: String,
    once: bool,
}

/// Command runner answering from canned responses
///
/// Unmatched commands succeed with empty output. `init` also creates the
/// metadata directory, like the real tool does.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    history: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every command whose argument line starts with `prefix`
    pub fn respond(self, prefix: &str, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.push_rule(prefix, exit_code, stdout, stderr, false);
        self
    }

    /// Answer only the next matching command, then fall back to other rules
    pub fn respond_once(self, prefix: &str, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.push_rule(prefix, exit_code, stdout, stderr, true);
        self
    }

    fn push_rule(&self, prefix: &str, exit_code: i32, stdout: &str, stderr: &str, once: bool) {
        self.rules.lock().unwrap().push(Rule {
            prefix: prefix.to_string(),
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            once,
        });
    }

    /// All recorded invocations in call order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.history.lock().unwrap().clone()
    }

    /// Argument lines in call order
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations().iter().map(Invocation::line).collect()
    }

    /// Number of calls whose argument line starts with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.command_lines()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }

    fn answer(&self, line: &str) -> (i32, String, String) {
        let mut rules = self.rules.lock().unwrap();

        let index = rules
            .iter()
            .position(|r| r.once && line.starts_with(&r.prefix))
            .or_else(|| rules.iter().position(|r| line.starts_with(&r.prefix)));

        match index {
            Some(i) if rules[i].once => {
                let rule = rules.remove(i);
                (rule.exit_code, rule.stdout, rule.stderr)
            }
            Some(i) => (rules[i].exit_code, rules[i].stdout.clone(), rules[i].stderr.clone()),
            None => (0, String::new(), String::new()),
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult, CommandError> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            working_dir: working_dir.to_path_buf(),
        };
        let line = invocation.line();
        self.history.lock().unwrap().push(invocation);

        let command = render_command(program, args);
        let (exit_code, stdout, stderr) = self.answer(&line);

        if line == "init" && exit_code == 0 {
            std::fs::create_dir_all(working_dir.join(".git")).map_err(|cause| {
                CommandError::LaunchFailed {
                    command: command.clone(),
                    cause,
                }
            })?;
        }

        Ok(CommandResult::new(command, exit_code, stdout, stderr))
    }
}
