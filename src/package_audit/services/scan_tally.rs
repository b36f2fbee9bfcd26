use crate::package_audit::domain::{ArtifactReport, MalwareVerdict, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate counts over all processed artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanTally {
    pub artifacts: usize,
    pub sboms_generated: usize,
    pub sboms_failed: usize,
    pub scans_completed: usize,
    pub scans_failed: usize,
    pub vulnerabilities: BTreeMap<Severity, usize>,
    pub malware_clean: usize,
    pub malware_infected: usize,
    pub malware_errors: usize,
    pub malware_not_scanned: usize,
    pub licenses_detected: usize,
}

impl ScanTally {
    pub fn from_reports(reports: &[ArtifactReport]) -> Self {
        let mut tally = ScanTally {
            artifacts: reports.len(),
            ..Default::default()
        };

        for report in reports {
            if report.sbom.is_success() {
                tally.sboms_generated += 1;
            } else {
                tally.sboms_failed += 1;
            }

            if let Some(scan) = &report.vulnerabilities {
                if scan.is_success() {
                    tally.scans_completed += 1;
                } else {
                    tally.scans_failed += 1;
                }
                for finding in &scan.findings {
                    *tally.vulnerabilities.entry(finding.severity).or_insert(0) += 1;
                }
            }

            match report.malware {
                MalwareVerdict::Clean => tally.malware_clean += 1,
                MalwareVerdict::Infected(_) => tally.malware_infected += 1,
                MalwareVerdict::ScanError(_) => tally.malware_errors += 1,
                MalwareVerdict::NotScanned => tally.malware_not_scanned += 1,
            }

            if !report.metadata.license_type.is_empty() {
                tally.licenses_detected += 1;
            }
        }

        tally
    }

    pub fn vulnerability_count(&self, severity: Severity) -> usize {
        self.vulnerabilities.get(&severity).copied().unwrap_or(0)
    }

    pub fn total_vulnerabilities(&self) -> usize {
        self.vulnerabilities.values().sum()
    }
}
