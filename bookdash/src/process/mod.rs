//! External process invocation
//!
//! Scripts are opaque: they are started, awaited to completion and their
//! captured output handed back verbatim. No timeout, no retry.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

/// Captured output of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; -1 when the process was terminated by a signal
    pub exit_code: i32,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a command to completion and captures its output
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &str, args: &[String], working_dir: &Path)
        -> Result<ProcessOutput>;
}

/// Runner backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(
        &self,
        command: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<ProcessOutput> {
        tracing::info!(
            "Running {} {} in {}",
            command,
            args.join(" "),
            working_dir.display()
        );

        let output = tokio::process::Command::new(command)
            .args(args)
            .current_dir(working_dir)
            .output()
            .await
            .map_err(|source| Error::Process {
                command: command.to_string(),
                source,
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!("{} exited with {}", command, exit_code);

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_exit_zero() {
        let mut output = ProcessOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        };
        assert!(output.success());

        output.exit_code = 2;
        assert!(!output.success());

        output.exit_code = -1;
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let args = vec![
            "-c".to_string(),
            "echo indexed; echo warning >&2; exit 3".to_string(),
        ];
        let output = SystemRunner.run("sh", &args, dir.path()).await.unwrap();

        assert_eq!(output.stdout, "indexed\n");
        assert_eq!(output.stderr, "warning\n");
        assert_eq!(output.exit_code, 3);
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_uses_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("books.json"), "[]").unwrap();
        let args = vec!["books.json".to_string()];
        let output = SystemRunner.run("cat", &args, dir.path()).await.unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "[]");
    }

    #[tokio::test]
    async fn test_missing_command_is_process_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemRunner
            .run("bookdash-no-such-interpreter", &[], dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Process { .. }));
    }
}
