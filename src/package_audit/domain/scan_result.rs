use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Outcome class of an external scanner stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanStatus {
    /// The tool exited 0 and produced its output document
    Success,
    /// The tool ran but exited non-zero (or timed out)
    ToolError,
    /// The tool could not be started at all
    Exception,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStatus::Success => write!(f, "success"),
            ScanStatus::ToolError => write!(f, "tool error"),
            ScanStatus::Exception => write!(f, "exception"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanKind {
    Sbom,
    Vulnerability,
}

/// Vulnerability severity as reported by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Unknown,
    ];

    /// Parses a scanner severity label (case-insensitive)
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" | "MODERATE" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One vulnerability entry from a scan result document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VulnerabilityFinding {
    pub id: String,
    pub package_name: String,
    pub installed_version: String,
    pub fixed_version: Option<String>,
    pub severity: Severity,
    /// The `Target` of the result section this finding came from
    pub target: String,
    pub title: Option<String>,
}

/// Result of one scanner stage (SBOM generation or SBOM vulnerability scan)
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub kind: ScanKind,
    pub output_path: PathBuf,
    pub status: ScanStatus,
    /// Captured stderr or exception text when the stage failed
    pub detail: Option<String>,
    pub findings: Vec<VulnerabilityFinding>,
}

impl ScanResult {
    pub fn success(kind: ScanKind, output_path: PathBuf) -> Self {
        Self {
            kind,
            output_path,
            status: ScanStatus::Success,
            detail: None,
            findings: Vec::new(),
        }
    }

    pub fn failed(kind: ScanKind, output_path: PathBuf, status: ScanStatus, detail: String) -> Self {
        Self {
            kind,
            output_path,
            status,
            detail: Some(detail),
            findings: Vec::new(),
        }
    }

    pub fn with_findings(mut self, findings: Vec<VulnerabilityFinding>) -> Self {
        self.findings = findings;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ScanStatus::Success
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }
}

/// Antivirus verdict for one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MalwareVerdict {
    Clean,
    /// Detection detail is the scanner's captured standard output
    Infected(String),
    /// Error detail is the scanner's captured standard error
    ScanError(String),
    /// Malware scanning was disabled for this run
    NotScanned,
}

impl MalwareVerdict {
    /// Maps an antivirus exit code to a verdict.
    ///
    /// 0 is clean, 1 is infected, anything else (including a missing code
    /// after a signal or timeout) is a scan error.
    pub fn from_exit_code(exit_code: Option<i32>, stdout: &str, stderr: &str) -> Self {
        match exit_code {
            Some(0) => MalwareVerdict::Clean,
            Some(1) => MalwareVerdict::Infected(stdout.to_string()),
            _ => MalwareVerdict::ScanError(stderr.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MalwareVerdict::Clean => "clean",
            MalwareVerdict::Infected(_) => "infected",
            MalwareVerdict::ScanError(_) => "scan error",
            MalwareVerdict::NotScanned => "not scanned",
        }
    }
}
