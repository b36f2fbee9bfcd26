use super::{MalwareVerdict, PackageMetadata, PackageRequest, ScanResult};
use std::path::{Path, PathBuf};

/// A package archive sitting in the canonical packages directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    file_path: PathBuf,
    /// The request that produced the file, when known. Files swept in from
    /// the package manager cache (transitive dependencies) have none.
    origin_request: Option<PackageRequest>,
}

impl DownloadedArtifact {
    pub fn new(file_path: PathBuf, origin_request: Option<PackageRequest>) -> Self {
        Self {
            file_path,
            origin_request,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn origin_request(&self) -> Option<&PackageRequest> {
        self.origin_request.as_ref()
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name with the archive extension removed (`curl_7.88.1_amd64`)
    pub fn stem(&self) -> String {
        self.file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Everything the processing stage learned about one artifact
#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub artifact: DownloadedArtifact,
    pub sbom: ScanResult,
    /// Absent when SBOM generation failed and there was nothing to scan
    pub vulnerabilities: Option<ScanResult>,
    pub malware: MalwareVerdict,
    pub metadata: PackageMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_and_stem() {
        let artifact = DownloadedArtifact::new(
            PathBuf::from("/out/deb_packages/curl_7.88.1-10_amd64.deb"),
            None,
        );
        assert_eq!(artifact.file_name(), "curl_7.88.1-10_amd64.deb");
        assert_eq!(artifact.stem(), "curl_7.88.1-10_amd64");
        assert!(artifact.origin_request().is_none());
    }
}
