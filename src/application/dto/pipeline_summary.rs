use super::DownloadMode;
use crate::package_audit::domain::{PackageRequest, PipelineStage};
use crate::package_audit::services::ScanTally;
use std::path::PathBuf;
use uuid::Uuid;

/// Counters from the acquisition stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquisitionOutcome {
    /// Archive paths whose originating request is known
    pub origins: Vec<(PathBuf, PackageRequest)>,
    /// Requests handed to the fetcher, dependencies included
    pub attempted: usize,
    pub downloaded: usize,
    pub failed: usize,
    /// Requests dropped because their key was already claimed this run
    pub duplicates: usize,
    /// Archive moves made by relocation sweeps after package-manager downloads
    pub relocated: usize,
}

impl AcquisitionOutcome {
    pub fn merge(&mut self, other: AcquisitionOutcome) {
        self.origins.extend(other.origins);
        self.attempted += other.attempted;
        self.downloaded += other.downloaded;
        self.failed += other.failed;
        self.duplicates += other.duplicates;
        self.relocated += other.relocated;
    }
}

/// Files written by the aggregation stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    pub metadata_table: Option<PathBuf>,
    pub scan_summary: Option<PathBuf>,
    pub llm_report: Option<PathBuf>,
}

/// PipelineSummary - what one run did, returned to the CLI
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub run_id: Uuid,
    pub mode: DownloadMode,
    pub final_stage: PipelineStage,
    pub repositories: usize,
    pub requests: usize,
    /// Input lines skipped with a warning
    pub rejected_lines: usize,
    pub acquisition: AcquisitionOutcome,
    pub tally: ScanTally,
    pub reports: ReportOutcome,
}
