use crate::ports::outbound::{CommandRunner, CommandSpec, ToolOutput};
use crate::shared::error::PipelineError;
use crate::shared::Result;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// SystemCommandRunner adapter spawning real processes with `tokio::process`
///
/// Each invocation is bounded by `timeout`; a process still running when it
/// expires is killed and reported with `timed_out = true`.
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn invoke(&self, command: &CommandSpec) -> Result<ToolOutput> {
        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.current_dir {
            process.current_dir(dir);
        }

        let child = process.spawn().map_err(|e| PipelineError::ToolInvocation {
            program: command.program.clone(),
            details: e.to_string(),
        })?;

        // Dropping the pending future on timeout drops the child, which kills it.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => {
                let output = output.map_err(|e| PipelineError::ToolInvocation {
                    program: command.program.clone(),
                    details: e.to_string(),
                })?;
                Ok(ToolOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    timed_out: false,
                })
            }
            Err(_) => Ok(ToolOutput {
                exit_code: None,
                stdout: String::new(),
                stderr: PipelineError::ToolTimeout {
                    program: command.program.clone(),
                    seconds: self.timeout.as_secs(),
                }
                .to_string(),
                timed_out: true,
            }),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn runner() -> SystemCommandRunner {
        SystemCommandRunner::new(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_captures_exit_code_and_streams() {
        let command = CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = runner().invoke(&command).await.unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(!output.timed_out);
    }

    #[tokio::test]
    async fn test_runs_in_current_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let command = CommandSpec::new("pwd").current_dir(temp_dir.path());
        let output = runner().invoke(&command).await.unwrap();

        assert!(output.success());
        let reported = std::path::PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp_dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let command = CommandSpec::new("deb-sbom-no-such-tool");
        let err = runner().invoke(&command).await.unwrap_err();
        assert!(err.to_string().contains("Failed to run `deb-sbom-no-such-tool`"));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = SystemCommandRunner::new(Duration::from_millis(200));
        let command = CommandSpec::new("sleep").arg("30");

        let started = std::time::Instant::now();
        let output = runner.invoke(&command).await.unwrap();

        assert!(output.timed_out);
        assert_eq!(output.exit_code, None);
        assert!(output.stderr.contains("did not finish"));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
