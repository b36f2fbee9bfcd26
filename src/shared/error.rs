use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// Per-item failures (a package that could not be downloaded, a scan that
/// failed) never change the exit code. Only process-level setup failures do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The full pipeline sequence ran to completion
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Setup error (unreadable config file, output tree cannot be created, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for the package audit pipeline.
///
/// Uses thiserror to derive Display and Error traits automatically.
/// Most of these are logged and contained to a single package or artifact;
/// only configuration and output-directory errors reach `main`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Package manifest not found: {path}\n\n💡 Hint: Create the file with one `source,package[=version]` entry per line")]
    ManifestNotFound { path: PathBuf },

    #[error("Repository list not found: {path}\n\n💡 Hint: Create the file with one `name,url[,gpg_key_url[,codename]]` entry per line")]
    RepositoryListNotFound { path: PathBuf },

    #[error("Invalid manifest line {line_number}: '{line}'\nReason: {reason}")]
    InvalidManifestLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("Invalid repository line {line_number}: '{line}'\nReason: {reason}")]
    InvalidRepositoryLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("Failed to run `{program}`: {details}\n\n💡 Hint: Verify that `{program}` is installed and on PATH")]
    ToolInvocation { program: String, details: String },

    #[error("`{program}` did not finish within {seconds}s and was terminated")]
    ToolTimeout { program: String, seconds: u64 },

    #[error("Failed to download {url}: {details}")]
    DownloadFailed { url: String, details: String },

    #[error("Failed to read package archive: {path}\nDetails: {details}")]
    ArchiveRead { path: PathBuf, details: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    ConfigError { message: String, hint: String },

    #[error("Failed to prepare output directory: {path}\nDetails: {details}\n\n💡 Hint: Please verify that you have write permissions for the output location")]
    OutputDirectory { path: PathBuf, details: String },

    #[error("Failed to write report: {path}\nDetails: {details}")]
    ReportWrite { path: PathBuf, details: String },
}
