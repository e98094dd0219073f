//! External process execution with merged output capture.
//!
//! The original tooling reached for ambient subprocess execution; here the
//! capability is an explicit trait so the diagnoser can run against a fake
//! that returns canned bytes. The system implementation merges the child's
//! stdout and stderr into one buffer in arrival order and blocks until the
//! child exits. There is no timeout, no cancellation, and no output cap:
//! the full byte sequence is held in memory before any scanning happens.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::thread;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("program contains shell metacharacters: {0}")]
    InvalidProgram(String),

    #[error("failed to launch {command}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RunnerError> for bt_common::Error {
    fn from(err: RunnerError) -> Self {
        match err {
            RunnerError::InvalidProgram(program) => bt_common::Error::Spawn {
                command: program,
                reason: "program contains shell metacharacters".to_string(),
            },
            RunnerError::Spawn { command, reason } => {
                bt_common::Error::Spawn { command, reason }
            }
            RunnerError::Io(e) => bt_common::Error::Io(e),
        }
    }
}

/// A fixed argument vector describing one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: String,

    /// Arguments, passed verbatim.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command specification.
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Render the invocation as a single string for messages and logs.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

impl From<&crate::config::BuildConfig> for CommandSpec {
    fn from(config: &crate::config::BuildConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

/// Captured result of one invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Merged stdout+stderr bytes in arrival order.
    pub combined: Vec<u8>,

    /// Exit code, if the child exited normally.
    pub status: Option<i32>,
}

/// Capability to execute an external command and capture its output.
pub trait ProcessRunner {
    /// Run the command to completion and return its merged output.
    fn run(&self, spec: &CommandSpec) -> Result<RunOutput, RunnerError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Reject programs that smell like shell injection. Arguments are
    /// handed to the OS directly and never interpreted by a shell, so only
    /// the program itself needs vetting.
    fn validate_program(program: &str) -> Result<(), RunnerError> {
        if program.contains(['|', '&', ';', '$', '`', '\n', '\r']) {
            return Err(RunnerError::InvalidProgram(program.to_string()));
        }
        Ok(())
    }
}

impl ProcessRunner for SystemRunner {
    #[instrument(skip(self), fields(program = %spec.program))]
    fn run(&self, spec: &CommandSpec) -> Result<RunOutput, RunnerError> {
        Self::validate_program(&spec.program)?;

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RunnerError::Spawn {
                command: spec.display(),
                reason: e.to_string(),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // One shared buffer, chunk-granular appends: each pipe pushes data
        // as it arrives, so the merge approximates the child's emission
        // order. Both drain threads finish at pipe EOF, i.e. child exit.
        let combined = Mutex::new(Vec::new());
        let drained: std::io::Result<()> = thread::scope(|s| {
            let sink = &combined;
            let handles: Vec<_> = [
                stdout.map(|r| Box::new(r) as Box<dyn Read + Send>),
                stderr.map(|r| Box::new(r) as Box<dyn Read + Send>),
            ]
            .into_iter()
            .flatten()
            .map(|reader| s.spawn(move || drain_into(reader, sink)))
            .collect();

            let mut result = Ok(());
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => result = Err(e),
                    Err(_) => {
                        result = Err(std::io::Error::other("output reader thread panicked"))
                    }
                }
            }
            result
        });

        let status = child.wait()?;
        drained?;

        let combined = combined
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        debug!(
            status = ?status.code(),
            bytes = combined.len(),
            "command completed"
        );

        Ok(RunOutput {
            combined,
            status: status.code(),
        })
    }
}

/// Copy a stream into the shared buffer, one chunk per lock acquisition.
fn drain_into(mut reader: impl Read, sink: &Mutex<Vec<u8>>) -> std::io::Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Ok(());
        }
        let mut buf = sink
            .lock()
            .map_err(|_| std::io::Error::other("output buffer poisoned"))?;
        buf.extend_from_slice(&chunk[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_echo() {
        let runner = SystemRunner;
        let output = runner
            .run(&CommandSpec::new("echo", &["hello", "world"]))
            .expect("echo runs");

        assert_eq!(output.status, Some(0));
        assert_eq!(
            String::from_utf8_lossy(&output.combined).trim(),
            "hello world"
        );
    }

    #[test]
    fn test_stderr_is_merged() {
        let runner = SystemRunner;
        let output = runner
            .run(&CommandSpec::new(
                "sh",
                &["-c", "echo to-out; echo to-err >&2"],
            ))
            .expect("sh runs");

        let text = String::from_utf8_lossy(&output.combined).to_string();
        assert!(text.contains("to-out"), "missing stdout in: {text:?}");
        assert!(text.contains("to-err"), "missing stderr in: {text:?}");
    }

    #[test]
    fn test_nonzero_exit_is_captured_not_an_error() {
        let runner = SystemRunner;
        let output = runner
            .run(&CommandSpec::new("sh", &["-c", "exit 42"]))
            .expect("sh runs");

        assert_eq!(output.status, Some(42));
    }

    #[test]
    fn test_spawn_failure() {
        let runner = SystemRunner;
        let result = runner.run(&CommandSpec::new(
            "/nonexistent/command/that/does/not/exist",
            &[],
        ));

        match result {
            Err(RunnerError::Spawn { command, .. }) => {
                assert!(command.contains("/nonexistent/command"));
            }
            other => panic!("expected Spawn error, got {other:?}"),
        }
    }

    #[test]
    fn test_shell_metacharacters_rejected() {
        let runner = SystemRunner;
        let result = runner.run(&CommandSpec::new("echo; rm -rf /", &[]));

        match result {
            Err(RunnerError::InvalidProgram(_)) => {}
            other => panic!("expected InvalidProgram, got {other:?}"),
        }
    }

    #[test]
    fn test_command_spec_display() {
        let spec = CommandSpec::new("./gradlew", &["assembleDebug"]);
        assert_eq!(spec.display(), "./gradlew assembleDebug");

        let bare = CommandSpec::new("true", &[]);
        assert_eq!(bare.display(), "true");
    }

    #[test]
    fn test_spec_from_build_config() {
        let spec = CommandSpec::from(&crate::config::BuildConfig::default());
        assert_eq!(spec.program, "./gradlew");
        assert_eq!(spec.args, vec!["assembleDebug"]);
    }
}
