use crate::package_audit::domain::PackageMetadata;
use crate::shared::Result;
use std::path::Path;

/// MetadataTableWriter port for the metadata spreadsheet
pub trait MetadataTableWriter: Send + Sync {
    /// Writes all rows in one pass, replacing any existing file
    fn write_table(&self, rows: &[PackageMetadata], path: &Path) -> Result<()>;
}
