pub mod artifact;
pub mod metadata;
pub mod package_request;
pub mod repository;
pub mod scan_result;
pub mod stage;

pub use artifact::{ArtifactReport, DownloadedArtifact};
pub use metadata::PackageMetadata;
pub use package_request::{PackageRequest, PackageSource};
pub use repository::{RepositoryEntry, RepositoryRegistry};
pub use scan_result::{
    MalwareVerdict, ScanKind, ScanResult, ScanStatus, Severity, VulnerabilityFinding,
};
pub use stage::PipelineStage;

/// Result of reading a line-oriented input file: the entries that parsed,
/// plus one error per rejected line (reported as warnings, never fatal).
#[derive(Debug)]
pub struct ParseOutcome<T> {
    pub items: Vec<T>,
    pub rejected: Vec<crate::shared::error::PipelineError>,
}

impl<T> ParseOutcome<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> Default for ParseOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Yields `(line_number, trimmed_line)` for every meaningful line,
/// skipping blank lines and `#` comments.
pub(crate) fn meaningful_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}
