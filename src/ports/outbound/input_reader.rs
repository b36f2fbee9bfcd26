use crate::shared::Result;
use std::path::Path;

/// InputReader port for the line-oriented input files of a run
///
/// This port abstracts the file system access used to read the package
/// manifest, the repository list, the URL or filename lists, and the scanner's
/// result documents.
pub trait InputReader: Send + Sync {
    /// Reads the package manifest
    ///
    /// # Errors
    /// Returns `PipelineError::ManifestNotFound` if the file does not exist,
    /// or an error if it cannot be read safely
    fn read_manifest(&self, path: &Path) -> Result<String>;

    /// Reads the repository list
    ///
    /// # Errors
    /// Returns `PipelineError::RepositoryListNotFound` if the file does not
    /// exist, or an error if it cannot be read safely
    fn read_repository_list(&self, path: &Path) -> Result<String>;

    /// Reads a URLs or filenames list
    fn read_entry_list(&self, path: &Path) -> Result<String>;

    /// Reads a JSON result document written by the vulnerability scanner
    fn read_scan_result(&self, path: &Path) -> Result<String>;
}
