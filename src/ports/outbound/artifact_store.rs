use crate::shared::Result;
use std::path::{Path, PathBuf};

/// What one relocation sweep did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationOutcome {
    /// Final paths of the files moved into the target directory
    pub moved: Vec<PathBuf>,
    /// Source files left in place, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

impl RelocationOutcome {
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }
}

/// ArtifactStore port for package archives on disk
pub trait ArtifactStore: Send + Sync {
    /// Writes a downloaded body verbatim as `dir/file_name`
    fn store(&self, dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;

    /// Lists the package and release archives directly inside `dir`, sorted by name
    fn list_artifacts(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Moves every package archive found in `source_dirs` into `target_dir`
    ///
    /// A same-named file already in `target_dir` is deleted before the move,
    /// so the most recent relocation of a name wins. Missing source
    /// directories are ignored, which keeps repeated sweeps idempotent.
    fn relocate(&self, source_dirs: &[PathBuf], target_dir: &Path) -> Result<RelocationOutcome>;
}
