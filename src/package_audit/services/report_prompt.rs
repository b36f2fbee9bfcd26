use super::ScanTally;
use crate::package_audit::domain::{ArtifactReport, MalwareVerdict, Severity};

/// Cap on findings listed per artifact so the prompt stays bounded
const MAX_FINDINGS_PER_ARTIFACT: usize = 20;

const ANALYST_INSTRUCTIONS: &str = "You are a cybersecurity analyst. Analyze the following SBOM and Trivy vulnerability scan results and provide a summary report that a junior application security specialist can understand. Include key findings, critical vulnerabilities, and general security recommendations.";

/// ReportPrompt service: builds the single language-model prompt for a run
pub struct ReportPrompt;

impl ReportPrompt {
    pub fn build(tally: &ScanTally, reports: &[ArtifactReport]) -> String {
        let mut prompt = String::new();
        prompt.push_str(ANALYST_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Aggregate results:\n");
        prompt.push_str(&format!("- Packages analysed: {}\n", tally.artifacts));
        prompt.push_str(&format!(
            "- SBOMs generated: {} ({} failed)\n",
            tally.sboms_generated, tally.sboms_failed
        ));
        prompt.push_str(&format!(
            "- Vulnerability scans completed: {} ({} failed)\n",
            tally.scans_completed, tally.scans_failed
        ));
        let severity_line: Vec<String> = Severity::ALL
            .iter()
            .map(|severity| format!("{}={}", severity, tally.vulnerability_count(*severity)))
            .collect();
        prompt.push_str(&format!(
            "- Vulnerabilities by severity: {}\n",
            severity_line.join(", ")
        ));
        prompt.push_str(&format!(
            "- Malware scan: {} clean, {} infected, {} errors, {} not scanned\n\n",
            tally.malware_clean, tally.malware_infected, tally.malware_errors, tally.malware_not_scanned
        ));

        prompt.push_str("Per-package results:\n");
        for report in reports {
            Self::push_artifact(&mut prompt, report);
        }

        prompt
    }

    fn push_artifact(prompt: &mut String, report: &ArtifactReport) {
        let license = if report.metadata.license_type.is_empty() {
            "unknown"
        } else {
            report.metadata.license_type.as_str()
        };
        prompt.push_str(&format!(
            "\n## {} (version {}, license {})\n",
            report.artifact.file_name(),
            if report.metadata.version.is_empty() {
                "unknown"
            } else {
                report.metadata.version.as_str()
            },
            license
        ));
        prompt.push_str(&format!("SBOM: {}\n", report.sbom.status));
        prompt.push_str(&format!("Malware: {}", report.malware.label()));
        if let MalwareVerdict::Infected(detail) = &report.malware {
            prompt.push_str(&format!(" ({})", detail.trim()));
        }
        prompt.push('\n');

        let Some(scan) = &report.vulnerabilities else {
            prompt.push_str("Vulnerability scan: not run\n");
            return;
        };
        prompt.push_str(&format!(
            "Vulnerability scan: {}, {} findings\n",
            scan.status,
            scan.findings.len()
        ));

        let mut findings: Vec<_> = scan.findings.iter().collect();
        findings.sort_by_key(|finding| finding.severity);
        for finding in findings.iter().take(MAX_FINDINGS_PER_ARTIFACT) {
            prompt.push_str(&format!(
                "- {} [{}] {} {}{}\n",
                finding.id,
                finding.severity,
                finding.package_name,
                finding.installed_version,
                finding
                    .fixed_version
                    .as_deref()
                    .map(|fixed| format!(" (fixed in {})", fixed))
                    .unwrap_or_default()
            ));
        }
        if findings.len() > MAX_FINDINGS_PER_ARTIFACT {
            prompt.push_str(&format!(
                "- ... {} more findings omitted\n",
                findings.len() - MAX_FINDINGS_PER_ARTIFACT
            ));
        }
    }
}
