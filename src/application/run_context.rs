use crate::application::dto::OutputLayout;
use crate::package_audit::domain::{PackageMetadata, PackageRequest};
use crate::shared::error::PipelineError;
use crate::shared::Result;
use dashmap::DashSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// PipelineRun - the state shared by every task of one run
///
/// Owns the output tree, the "already downloaded" set and the metadata rows
/// collected by processing workers. Nothing here outlives the run.
pub struct PipelineRun {
    run_id: Uuid,
    layout: OutputLayout,
    downloaded: DashSet<String>,
    metadata: Mutex<Vec<PackageMetadata>>,
}

impl PipelineRun {
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            layout,
            downloaded: DashSet::new(),
            metadata: Mutex::new(Vec::new()),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Creates every directory of the output tree
    ///
    /// # Errors
    /// Returns `PipelineError::OutputDirectory` for the first directory that
    /// cannot be created or is a symbolic link
    pub fn prepare_directories(&self) -> Result<()> {
        for dir in self.layout.directories() {
            if fs::symlink_metadata(dir)
                .map(|meta| meta.is_symlink())
                .unwrap_or(false)
            {
                return Err(PipelineError::OutputDirectory {
                    path: dir.to_path_buf(),
                    details: "Security: output directory is a symbolic link".to_string(),
                }
                .into());
            }
            fs::create_dir_all(dir).map_err(|e| PipelineError::OutputDirectory {
                path: dir.to_path_buf(),
                details: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Claims a request's dedup key; `false` means it was already claimed
    ///
    /// The key is taken before the first attempt, so a failed download is not
    /// retried by a later duplicate request.
    pub fn claim(&self, request: &PackageRequest) -> bool {
        self.downloaded.insert(request.dedup_key())
    }

    pub fn is_claimed(&self, key: &str) -> bool {
        self.downloaded.contains(key)
    }

    pub fn claimed_count(&self) -> usize {
        self.downloaded.len()
    }

    pub fn record_metadata(&self, row: PackageMetadata) {
        self.metadata
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(row);
    }

    pub fn metadata_rows(&self) -> Vec<PackageMetadata> {
        self.metadata
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Makes the output directories world-writable (unix only)
    pub fn relax_permissions(&self) -> Result<()> {
        for dir in self.layout.directories() {
            set_world_writable(dir)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn set_world_writable(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if dir.is_dir() {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o777))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_world_writable(_dir: &Path) -> Result<()> {
    Ok(())
}
