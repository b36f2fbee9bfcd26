use crate::package_audit::domain::{ArtifactReport, MalwareVerdict, Severity};
use crate::package_audit::services::ScanTally;
use crate::ports::outbound::ScanSummaryFormatter;
use crate::shared::Result;

/// Markdown table header for per-package results
const RESULTS_TABLE_HEADER: &str =
    "| Package | Version | License | SBOM | Vulnerability Scan | CRITICAL | HIGH | MEDIUM | LOW | Malware |\n";

/// Markdown table separator line for per-package results
const RESULTS_TABLE_SEPARATOR: &str =
    "|---------|---------|---------|------|--------------------|----------|------|--------|-----|---------|\n";

/// Markdown table header for notable findings
const FINDINGS_TABLE_HEADER: &str =
    "| Package | Vulnerability | Severity | Installed Version | Fixed Version | Title |\n";

/// Markdown table separator line for notable findings
const FINDINGS_TABLE_SEPARATOR: &str =
    "|---------|---------------|----------|-------------------|---------------|-------|\n";

/// MarkdownFormatter adapter for the per-run scan summary document
///
/// This adapter implements the ScanSummaryFormatter port.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn or_na(text: &str) -> &str {
        if text.is_empty() {
            "N/A"
        } else {
            text
        }
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    fn render_header(&self, output: &mut String) {
        output.push_str("# Debian Package Audit Summary\n\n");
    }

    fn render_overview(&self, output: &mut String, tally: &ScanTally) {
        output.push_str("## Overview\n\n");
        output.push_str("| Metric | Count |\n");
        output.push_str("|--------|-------|\n");
        let rows = [
            ("Packages analysed", tally.artifacts),
            ("SBOMs generated", tally.sboms_generated),
            ("SBOM generation failures", tally.sboms_failed),
            ("Vulnerability scans completed", tally.scans_completed),
            ("Vulnerability scan failures", tally.scans_failed),
            ("Licenses detected", tally.licenses_detected),
        ];
        for (label, count) in rows {
            output.push_str(&format!("| {} | {} |\n", label, count));
        }
        output.push('\n');
    }

    fn render_severity_counts(&self, output: &mut String, tally: &ScanTally) {
        output.push_str("## Vulnerabilities by Severity\n\n");
        output.push_str(&format!(
            "**Found {} {} across all packages.**\n\n",
            tally.total_vulnerabilities(),
            if tally.total_vulnerabilities() == 1 {
                "vulnerability"
            } else {
                "vulnerabilities"
            }
        ));
        output.push_str("| Severity | Count |\n");
        output.push_str("|----------|-------|\n");
        for severity in Severity::ALL {
            output.push_str(&format!(
                "| {} | {} |\n",
                severity,
                tally.vulnerability_count(severity)
            ));
        }
        output.push('\n');
    }

    fn render_malware(&self, output: &mut String, tally: &ScanTally, reports: &[ArtifactReport]) {
        output.push_str("## Malware Scan\n\n");
        output.push_str(&format!(
            "- Clean: {}\n- Infected: {}\n- Scan errors: {}\n- Not scanned: {}\n\n",
            tally.malware_clean, tally.malware_infected, tally.malware_errors, tally.malware_not_scanned
        ));

        let infected: Vec<_> = reports
            .iter()
            .filter_map(|report| match &report.malware {
                MalwareVerdict::Infected(detail) => Some((report.artifact.file_name(), detail)),
                _ => None,
            })
            .collect();
        if infected.is_empty() {
            return;
        }

        output.push_str("### ⚠️ Infected Packages\n\n");
        for (name, detail) in infected {
            output.push_str(&format!("- **{}**\n\n```\n{}\n```\n\n", name, detail.trim()));
        }
    }

    fn render_results(&self, output: &mut String, reports: &[ArtifactReport]) {
        output.push_str("## Package Results\n\n");
        if reports.is_empty() {
            output.push_str("*No packages were processed*\n\n");
            return;
        }

        output.push_str(RESULTS_TABLE_HEADER);
        output.push_str(RESULTS_TABLE_SEPARATOR);
        for report in reports {
            let (scan_status, counts) = match &report.vulnerabilities {
                Some(scan) => (
                    scan.status.to_string(),
                    [Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
                        .map(|severity| scan.count_by_severity(severity).to_string()),
                ),
                None => ("not run".to_string(), ["-", "-", "-", "-"].map(String::from)),
            };

            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&report.artifact.file_name()),
                Self::escape_markdown_table_cell(Self::or_na(&report.metadata.version)),
                Self::escape_markdown_table_cell(Self::or_na(&report.metadata.license_type)),
                report.sbom.status,
                scan_status,
                counts[0],
                counts[1],
                counts[2],
                counts[3],
                report.malware.label()
            ));
        }
        output.push('\n');
    }

    /// Lists CRITICAL and HIGH findings, most severe first
    fn render_notable_findings(&self, output: &mut String, reports: &[ArtifactReport]) {
        let mut findings: Vec<_> = reports
            .iter()
            .filter_map(|report| report.vulnerabilities.as_ref())
            .flat_map(|scan| scan.findings.iter())
            .filter(|finding| matches!(finding.severity, Severity::Critical | Severity::High))
            .collect();
        if findings.is_empty() {
            return;
        }
        findings.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.package_name.cmp(&b.package_name))
                .then_with(|| a.id.cmp(&b.id))
        });

        output.push_str("## Critical and High Findings\n\n");
        output.push_str(FINDINGS_TABLE_HEADER);
        output.push_str(FINDINGS_TABLE_SEPARATOR);
        for finding in findings {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&finding.package_name),
                Self::escape_markdown_table_cell(&finding.id),
                finding.severity,
                Self::escape_markdown_table_cell(&finding.installed_version),
                Self::escape_markdown_table_cell(finding.fixed_version.as_deref().unwrap_or("N/A")),
                Self::escape_markdown_table_cell(finding.title.as_deref().unwrap_or(""))
            ));
        }
        output.push('\n');
    }
}

impl ScanSummaryFormatter for MarkdownFormatter {
    fn format(&self, tally: &ScanTally, reports: &[ArtifactReport]) -> Result<String> {
        let mut output = String::new();
        self.render_header(&mut output);
        self.render_overview(&mut output, tally);
        self.render_severity_counts(&mut output, tally);
        self.render_malware(&mut output, tally, reports);
        self.render_results(&mut output, reports);
        self.render_notable_findings(&mut output, reports);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_audit::domain::{
        DownloadedArtifact, PackageMetadata, ScanKind, ScanResult, ScanStatus,
        VulnerabilityFinding,
    };
    use std::path::PathBuf;

    fn finding(id: &str, severity: Severity) -> VulnerabilityFinding {
        VulnerabilityFinding {
            id: id.to_string(),
            package_name: "libcurl4".to_string(),
            installed_version: "7.88.1-10".to_string(),
            fixed_version: None,
            severity,
            target: "curl".to_string(),
            title: Some("curl: heap overflow | SOCKS5".to_string()),
        }
    }

    fn curl_report() -> ArtifactReport {
        ArtifactReport {
            artifact: DownloadedArtifact::new(PathBuf::from("/o/curl_7.88.1_amd64.deb"), None),
            sbom: ScanResult::success(ScanKind::Sbom, PathBuf::from("s.json")),
            vulnerabilities: Some(
                ScanResult::success(ScanKind::Vulnerability, PathBuf::from("r.json"))
                    .with_findings(vec![
                        finding("CVE-2023-38545", Severity::Critical),
                        finding("CVE-2023-0001", Severity::Low),
                    ]),
            ),
            malware: MalwareVerdict::Clean,
            metadata: PackageMetadata::new(
                "curl".to_string(),
                "7.88.1".to_string(),
                "MIT".to_string(),
                "https://curl.se/".to_string(),
            ),
        }
    }

    fn broken_report() -> ArtifactReport {
        ArtifactReport {
            artifact: DownloadedArtifact::new(PathBuf::from("/o/evil_1.0_all.deb"), None),
            sbom: ScanResult::failed(
                ScanKind::Sbom,
                PathBuf::from("e.json"),
                ScanStatus::ToolError,
                "bad".to_string(),
            ),
            vulnerabilities: None,
            malware: MalwareVerdict::Infected("evil_1.0_all.deb: Eicar-Signature FOUND".to_string()),
            metadata: PackageMetadata::default(),
        }
    }

    fn render(reports: &[ArtifactReport]) -> String {
        MarkdownFormatter::new()
            .format(&ScanTally::from_reports(reports), reports)
            .unwrap()
    }

    #[test]
    fn test_sections_present() {
        let output = render(&[curl_report(), broken_report()]);
        assert!(output.starts_with("# Debian Package Audit Summary"));
        assert!(output.contains("| Packages analysed | 2 |"));
        assert!(output.contains("| CRITICAL | 1 |"));
        assert!(output.contains("- Infected: 1"));
        assert!(output.contains("Eicar-Signature FOUND"));
    }

    #[test]
    fn test_results_rows() {
        let output = render(&[curl_report(), broken_report()]);
        assert!(output.contains(
            "| curl_7.88.1_amd64.deb | 7.88.1 | MIT | success | success | 1 | 0 | 0 | 1 | clean |"
        ));
        assert!(output.contains(
            "| evil_1.0_all.deb | N/A | N/A | tool error | not run | - | - | - | - | infected |"
        ));
    }

    #[test]
    fn test_notable_findings_escaped_and_filtered() {
        let output = render(&[curl_report()]);
        assert!(output.contains("## Critical and High Findings"));
        assert!(output.contains("curl: heap overflow \\| SOCKS5"));
        assert!(!output.contains("| CVE-2023-0001 |"));
    }

    #[test]
    fn test_empty_run() {
        let output = render(&[]);
        assert!(output.contains("*No packages were processed*"));
        assert!(!output.contains("## Critical and High Findings"));
    }
}
