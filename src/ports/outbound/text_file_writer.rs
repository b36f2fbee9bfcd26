use crate::shared::Result;
use std::path::Path;

/// TextFileWriter port for text documents the run produces
///
/// This port abstracts the destination of markdown reports and generated
/// apt source entries.
pub trait TextFileWriter: Send + Sync {
    /// Writes `content` to `path`, replacing any existing file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The parent directory does not exist
    /// - The target is a symbolic link
    /// - Writing fails
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;
}
