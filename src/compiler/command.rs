//! External command execution for `cmd` lines.

use std::process::{Command, Stdio};

use crate::error::{Result, SignError};

/// Runs a `cmd` line's command and returns its raw standard output.
///
/// Implementations fail with [`SignError::ExternalCommand`] when the command
/// cannot be launched or exits unsuccessfully.
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<Vec<u8>>;
}

impl<F> CommandRunner for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn run(&self, command: &str) -> Result<Vec<u8>> {
        self(command)
    }
}

/// Runs commands through `sh -c`, capturing stdout and passing stderr through.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandRunner;

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str) -> Result<Vec<u8>> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| SignError::ExternalCommand {
                command: command.to_string(),
                reason: format!("unable to launch: {}", e),
            })?;

        if !output.status.success() {
            return Err(SignError::ExternalCommand {
                command: command.to_string(),
                reason: format!("returned an error ({})", output.status),
            });
        }

        tracing::debug!(command, bytes = output.stdout.len(), "Command finished");
        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_shell_runner_captures_stdout() {
        let out = ShellCommandRunner.run("printf 'hello\\nworld'").unwrap();
        assert_eq!(out, b"hello\nworld");
    }

    #[test]
    fn test_shell_runner_nonzero_exit() {
        let err = ShellCommandRunner.run("exit 3").unwrap_err();
        match err {
            SignError::ExternalCommand { command, .. } => assert_eq!(command, "exit 3"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_closure_runner() {
        let runner = |cmd: &str| -> Result<Vec<u8>> { Ok(cmd.as_bytes().to_vec()) };
        assert_eq!(runner.run("abc").unwrap(), b"abc");
    }
}
