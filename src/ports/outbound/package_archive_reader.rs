use crate::shared::Result;
use std::path::Path;

/// PackageArchiveReader port for looking inside `.deb` archives
pub trait PackageArchiveReader: Send + Sync {
    /// Returns the text of the `control` file from the control member
    ///
    /// # Errors
    /// Returns an error if the archive or its control member cannot be read
    fn read_control(&self, archive: &Path) -> Result<String>;

    /// Returns the text of one file from the data member, or `None` when the
    /// archive does not contain it
    ///
    /// `member` is relative to the package root, e.g.
    /// `usr/share/doc/curl/copyright`.
    fn read_data_file(&self, archive: &Path, member: &str) -> Result<Option<String>>;
}
