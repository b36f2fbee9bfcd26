use crate::package_audit::domain::{Severity, VulnerabilityFinding};
use crate::shared::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TrivyReport {
    #[serde(rename = "Results", default)]
    results: Option<Vec<TrivyResult>>,
}

#[derive(Debug, Deserialize)]
struct TrivyResult {
    #[serde(rename = "Target", default)]
    target: String,
    #[serde(rename = "Vulnerabilities", default)]
    vulnerabilities: Option<Vec<TrivyVulnerability>>,
}

#[derive(Debug, Deserialize)]
struct TrivyVulnerability {
    #[serde(rename = "VulnerabilityID", default)]
    vulnerability_id: String,
    #[serde(rename = "PkgName", default)]
    pkg_name: String,
    #[serde(rename = "InstalledVersion", default)]
    installed_version: String,
    #[serde(rename = "FixedVersion", default)]
    fixed_version: Option<String>,
    #[serde(rename = "Severity", default)]
    severity: String,
    #[serde(rename = "Title", default)]
    title: Option<String>,
}

/// TrivyReportParser service for scanner JSON result documents
pub struct TrivyReportParser;

impl TrivyReportParser {
    /// Flattens every `Results[].Vulnerabilities[]` entry into findings
    ///
    /// Sections without vulnerabilities (absent or `null`) contribute nothing.
    pub fn parse(document: &str) -> Result<Vec<VulnerabilityFinding>> {
        let report: TrivyReport = serde_json::from_str(document)?;

        let findings = report
            .results
            .unwrap_or_default()
            .into_iter()
            .flat_map(|result| {
                let target = result.target;
                result
                    .vulnerabilities
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |vuln| VulnerabilityFinding {
                        id: vuln.vulnerability_id,
                        package_name: vuln.pkg_name,
                        installed_version: vuln.installed_version,
                        fixed_version: vuln.fixed_version.filter(|v| !v.is_empty()),
                        severity: Severity::from_label(&vuln.severity),
                        target: target.clone(),
                        title: vuln.title,
                    })
            })
            .collect();

        Ok(findings)
    }
}
