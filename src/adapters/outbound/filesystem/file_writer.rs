use crate::ports::outbound::TextFileWriter;
use crate::shared::error::PipelineError;
use crate::shared::security::validate_not_symlink;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// FileSystemWriter adapter for writing text documents to files
///
/// This adapter implements the TextFileWriter port for file output.
pub struct FileSystemWriter;

impl FileSystemWriter {
    pub fn new() -> Self {
        Self
    }

    /// Validates that the parent directory exists before writing
    fn validate_parent_directory(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() && parent != Path::new("") {
                return Err(PipelineError::ReportWrite {
                    path: path.to_path_buf(),
                    details: format!("Parent directory does not exist: {}", parent.display()),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Default for FileSystemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFileWriter for FileSystemWriter {
    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        Self::validate_parent_directory(path)?;
        if fs::symlink_metadata(path).is_ok() {
            validate_not_symlink(path, "write")?;
        }

        fs::write(path, content).map_err(|e| PipelineError::ReportWrite {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(())
    }
}
