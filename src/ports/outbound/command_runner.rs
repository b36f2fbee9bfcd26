use crate::shared::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// A structured external command: program plus argument vector
///
/// Arguments are passed to the process verbatim and never through a shell,
/// so paths and package names need no quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Wraps the command in `sudo` when `enabled`
    pub fn privileged(self, enabled: bool) -> Self {
        if !enabled {
            return self;
        }
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
            current_dir: self.current_dir,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished (or terminated) external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was killed by a signal or timed out
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }

    /// Short description of a failed run for log lines
    pub fn failure_detail(&self) -> String {
        if self.timed_out {
            return "timed out and was terminated".to_string();
        }
        let stderr = self.stderr.trim();
        match self.exit_code {
            Some(code) if stderr.is_empty() => format!("exit code {}", code),
            Some(code) => format!("exit code {}: {}", code, stderr),
            None if stderr.is_empty() => "terminated by signal".to_string(),
            None => format!("terminated by signal: {}", stderr),
        }
    }
}

/// CommandRunner port for invoking external tools
///
/// Every packaging and scanning tool (`apt-get`, `apt-rdepends`, `trivy`,
/// `clamscan`, `freshclam`) is reached through this port so tests can
/// substitute a fake.
///
/// # Errors
/// Returns an error only when the tool could not be started at all.
/// A non-zero exit or a timeout is reported through [`ToolOutput`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn invoke(&self, command: &CommandSpec) -> Result<ToolOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_args() {
        let command = CommandSpec::new("trivy")
            .args(["fs", "--format", "cyclonedx"])
            .arg("/tmp/a.deb")
            .current_dir("/tmp");
        assert_eq!(command.program, "trivy");
        assert_eq!(command.args, vec!["fs", "--format", "cyclonedx", "/tmp/a.deb"]);
        assert_eq!(command.current_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(command.to_string(), "trivy fs --format cyclonedx /tmp/a.deb");
    }

    #[test]
    fn test_privileged_prefixes_sudo() {
        let command = CommandSpec::new("apt-get").arg("update").privileged(true);
        assert_eq!(command.program, "sudo");
        assert_eq!(command.args, vec!["apt-get", "update"]);

        let command = CommandSpec::new("apt-get").arg("update").privileged(false);
        assert_eq!(command.program, "apt-get");
    }

    #[test]
    fn test_tool_output_success_and_detail() {
        let ok = ToolOutput {
            exit_code: Some(0),
            ..Default::default()
        };
        assert!(ok.success());

        let failed = ToolOutput {
            exit_code: Some(100),
            stderr: "E: Unable to locate package nosuch\n".to_string(),
            ..Default::default()
        };
        assert!(!failed.success());
        assert_eq!(
            failed.failure_detail(),
            "exit code 100: E: Unable to locate package nosuch"
        );

        let hung = ToolOutput {
            timed_out: true,
            ..Default::default()
        };
        assert!(!hung.success());
        assert_eq!(hung.failure_detail(), "timed out and was terminated");
    }
}
