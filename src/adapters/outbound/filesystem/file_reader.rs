use crate::ports::outbound::InputReader;
use crate::shared::error::PipelineError;
use crate::shared::security::{validate_file_size, validate_regular_file};
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum input file size for security (10 MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Scan result documents of large packages run well past the input limit
const MAX_SCAN_RESULT_SIZE: u64 = 200 * 1024 * 1024;

/// FileSystemReader adapter for reading input lists from the file system
///
/// This adapter implements the InputReader port.
#[derive(Clone)]
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemReader {
    /// Reads a regular, non-link file of at most `max_size` bytes
    fn safe_read_file(&self, path: &Path, file_type: &str, max_size: u64) -> Result<String> {
        validate_regular_file(path, file_type)?;
        let metadata = fs::metadata(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_type, e))?;
        validate_file_size(metadata.len(), path, max_size)?;

        fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_type, e))
    }
}

impl InputReader for FileSystemReader {
    fn read_manifest(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(PipelineError::ManifestNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        self.safe_read_file(path, "package manifest", MAX_FILE_SIZE)
    }

    fn read_repository_list(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(PipelineError::RepositoryListNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        self.safe_read_file(path, "repository list", MAX_FILE_SIZE)
    }

    fn read_entry_list(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            anyhow::bail!("Input list not found: {}", path.display());
        }
        self.safe_read_file(path, "input list", MAX_FILE_SIZE)
    }

    fn read_scan_result(&self, path: &Path) -> Result<String> {
        self.safe_read_file(path, "scan result", MAX_SCAN_RESULT_SIZE)
    }
}
