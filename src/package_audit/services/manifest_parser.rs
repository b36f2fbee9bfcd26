use crate::package_audit::domain::{
    meaningful_lines, PackageRequest, PackageSource, ParseOutcome, RepositoryRegistry,
};
use crate::shared::error::PipelineError;

/// Manifest source tag for the system package manager
pub const PACKAGE_MANAGER_TAG: &str = "apt";

/// Tools that can be requested as pinned binary releases
pub const PINNED_RELEASE_TOOLS: [&str; 1] = ["terraform"];

/// ManifestParser service for the line-oriented input files
///
/// Rejected lines never abort parsing; each one becomes exactly one entry in
/// [`ParseOutcome::rejected`] for the caller to log as a warning.
pub struct ManifestParser;

impl ManifestParser {
    /// Parses the package manifest against the loaded repository registry
    ///
    /// Accepted forms:
    /// - `curl` (package manager, no source tag)
    /// - `apt,curl=7.88.1-10,wget` (one request per extra field)
    /// - `myrepo,pool/main/c/curl_7.88.0.deb` (registered repository)
    /// - `terraform,1.6.2` (pinned release)
    pub fn parse(content: &str, registry: &RepositoryRegistry) -> ParseOutcome<PackageRequest> {
        let mut outcome = ParseOutcome::new();

        for (line_number, line) in meaningful_lines(content) {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();

            let (source, items) = if parts.len() == 1 {
                (PackageSource::PackageManager, &parts[..])
            } else {
                match Self::classify_source(parts[0], registry) {
                    Some(source) => (source, &parts[1..]),
                    None => {
                        outcome.rejected.push(PipelineError::InvalidManifestLine {
                            line_number,
                            line: line.to_string(),
                            reason: format!("unknown repository or source '{}'", parts[0]),
                        });
                        continue;
                    }
                }
            };

            for item in items.iter().filter(|item| !item.is_empty()) {
                match PackageRequest::from_item(source.clone(), item) {
                    Ok(request) => outcome.items.push(request),
                    Err(e) => outcome.rejected.push(PipelineError::InvalidManifestLine {
                        line_number,
                        line: line.to_string(),
                        reason: e.to_string(),
                    }),
                }
            }
        }

        outcome
    }

    /// Parses a URLs file: one absolute URL per line
    pub fn parse_url_list(content: &str) -> ParseOutcome<PackageRequest> {
        Self::parse_single_column(content, PackageSource::DirectUrl, |url| {
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(())
            } else {
                Err("expected an http:// or https:// URL".to_string())
            }
        })
    }

    /// Parses a filenames file: one file name per line, joined to a base URL later
    pub fn parse_filename_list(content: &str) -> ParseOutcome<PackageRequest> {
        Self::parse_single_column(content, PackageSource::DirectFilename, |_| Ok(()))
    }

    fn classify_source(tag: &str, registry: &RepositoryRegistry) -> Option<PackageSource> {
        if tag == PACKAGE_MANAGER_TAG {
            return Some(PackageSource::PackageManager);
        }
        if registry.contains(tag) {
            return Some(PackageSource::Repository(tag.to_string()));
        }
        PINNED_RELEASE_TOOLS
            .iter()
            .find(|tool| **tool == tag)
            .map(|tool| PackageSource::PinnedRelease(tool.to_string()))
    }

    fn parse_single_column(
        content: &str,
        source: PackageSource,
        check: impl Fn(&str) -> std::result::Result<(), String>,
    ) -> ParseOutcome<PackageRequest> {
        let mut outcome = ParseOutcome::new();

        for (line_number, line) in meaningful_lines(content) {
            let parsed = check(line).and_then(|_| {
                PackageRequest::from_item(source.clone(), line).map_err(|e| e.to_string())
            });
            match parsed {
                Ok(request) => outcome.items.push(request),
                Err(reason) => outcome.rejected.push(PipelineError::InvalidManifestLine {
                    line_number,
                    line: line.to_string(),
                    reason,
                }),
            }
        }

        outcome
    }
}
