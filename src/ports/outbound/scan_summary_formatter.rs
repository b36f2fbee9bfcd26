use crate::package_audit::domain::ArtifactReport;
use crate::package_audit::services::ScanTally;
use crate::shared::Result;

/// ScanSummaryFormatter port for the human-readable scan summary
///
/// This port abstracts the rendering of the per-run summary document
/// from the aggregated artifact reports.
pub trait ScanSummaryFormatter: Send + Sync {
    /// Formats the summary of one run
    ///
    /// # Arguments
    /// * `tally` - Aggregate counts over all artifacts
    /// * `reports` - Per-artifact results, in processing order
    fn format(&self, tally: &ScanTally, reports: &[ArtifactReport]) -> Result<String>;
}
