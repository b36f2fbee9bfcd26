use crate::ports::outbound::{ArtifactStore, RelocationOutcome};
use crate::shared::security::{validate_not_symlink, validate_plain_file_name};
use crate::shared::Result;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of the package archives the pipeline relocates
pub const ARTIFACT_EXTENSION: &str = "deb";

/// File extension of pinned binary release archives
pub const RELEASE_EXTENSION: &str = "zip";

/// FileSystemArtifactStore adapter for package archives on local disk
///
/// Implements the ArtifactStore port. Relocation deletes an existing
/// same-named target before moving, and falls back to copy-and-remove when
/// the source sits on a different file system.
pub struct FileSystemArtifactStore;

impl FileSystemArtifactStore {
    pub fn new() -> Self {
        Self
    }

    fn is_artifact(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext == ARTIFACT_EXTENSION)
            .unwrap_or(false)
    }

    fn is_processable(path: &Path) -> bool {
        Self::is_artifact(path)
            || path
                .extension()
                .map(|ext| ext == RELEASE_EXTENSION)
                .unwrap_or(false)
    }

    fn move_file(source: &Path, destination: &Path) -> Result<()> {
        if fs::symlink_metadata(destination).is_ok() {
            fs::remove_file(destination).with_context(|| {
                format!("Failed to remove existing {}", destination.display())
            })?;
        }

        if fs::rename(source, destination).is_err() {
            fs::copy(source, destination).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    destination.display()
                )
            })?;
            fs::remove_file(source)
                .with_context(|| format!("Failed to remove {}", source.display()))?;
        }
        Ok(())
    }

    fn same_directory(a: &Path, b: &Path) -> bool {
        match (a.canonicalize(), b.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for FileSystemArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactStore for FileSystemArtifactStore {
    fn store(&self, dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        validate_plain_file_name(file_name)?;
        let path = dir.join(file_name);
        if fs::symlink_metadata(&path).is_ok() {
            validate_not_symlink(&path, "write")?;
        }
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    fn list_artifacts(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut artifacts = Vec::new();
        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file() && Self::is_processable(&path) {
                artifacts.push(path);
            }
        }
        artifacts.sort();
        Ok(artifacts)
    }

    fn relocate(&self, source_dirs: &[PathBuf], target_dir: &Path) -> Result<RelocationOutcome> {
        fs::create_dir_all(target_dir)
            .with_context(|| format!("Failed to create {}", target_dir.display()))?;

        let mut outcome = RelocationOutcome::default();
        for source_dir in source_dirs {
            if !source_dir.is_dir() || Self::same_directory(source_dir, target_dir) {
                continue;
            }

            let mut candidates = Vec::new();
            for entry in fs::read_dir(source_dir)
                .with_context(|| format!("Failed to list {}", source_dir.display()))?
            {
                let entry = entry?;
                if Self::is_artifact(&entry.path()) {
                    candidates.push(entry);
                }
            }
            candidates.sort_by_key(|entry| entry.file_name());

            for entry in candidates {
                let source = entry.path();
                let file_type = entry.file_type()?;
                if file_type.is_symlink() {
                    outcome
                        .skipped
                        .push((source, "symbolic links are not relocated".to_string()));
                    continue;
                }
                if !file_type.is_file() {
                    continue;
                }

                let destination = target_dir.join(entry.file_name());
                match Self::move_file(&source, &destination) {
                    Ok(()) => outcome.moved.push(destination),
                    Err(e) => outcome.skipped.push((source, format!("{:#}", e))),
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relocate_moves_only_archives() {
        let cache = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        fs::write(cache.path().join("curl_7.88.1_amd64.deb"), "curl").unwrap();
        fs::write(cache.path().join("lock"), "").unwrap();

        let store = FileSystemArtifactStore::new();
        let outcome = store
            .relocate(&[cache.path().to_path_buf()], target.path())
            .unwrap();

        assert_eq!(outcome.moved_count(), 1);
        assert!(target.path().join("curl_7.88.1_amd64.deb").exists());
        assert!(!cache.path().join("curl_7.88.1_amd64.deb").exists());
        assert!(cache.path().join("lock").exists());
    }

    #[test]
    fn test_relocate_twice_is_idempotent() {
        let cache = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        fs::write(cache.path().join("a.deb"), "a").unwrap();

        let store = FileSystemArtifactStore::new();
        let sources = vec![cache.path().to_path_buf()];
        assert_eq!(store.relocate(&sources, target.path()).unwrap().moved_count(), 1);

        let second = store.relocate(&sources, target.path()).unwrap();
        assert_eq!(second, RelocationOutcome::default());
        assert_eq!(fs::read_to_string(target.path().join("a.deb")).unwrap(), "a");
    }

    #[test]
    fn test_relocate_last_move_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        fs::write(first.path().join("tool.deb"), "first").unwrap();
        fs::write(second.path().join("tool.deb"), "second").unwrap();

        let store = FileSystemArtifactStore::new();
        store
            .relocate(&[first.path().to_path_buf()], target.path())
            .unwrap();
        store
            .relocate(&[second.path().to_path_buf()], target.path())
            .unwrap();

        let names = store.list_artifacts(target.path()).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(fs::read_to_string(&names[0]).unwrap(), "second");
    }

    #[test]
    fn test_relocate_ignores_missing_and_target_dirs() {
        let target = TempDir::new().unwrap();
        fs::write(target.path().join("a.deb"), "a").unwrap();

        let store = FileSystemArtifactStore::new();
        let outcome = store
            .relocate(
                &[PathBuf::from("/nonexistent/cache"), target.path().to_path_buf()],
                target.path(),
            )
            .unwrap();
        assert_eq!(outcome.moved_count(), 0);
        assert!(target.path().join("a.deb").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_relocate_skips_symlinks() {
        let cache = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let real = cache.path().join("real.bin");
        fs::write(&real, "x").unwrap();
        std::os::unix::fs::symlink(&real, cache.path().join("link.deb")).unwrap();

        let outcome = FileSystemArtifactStore::new()
            .relocate(&[cache.path().to_path_buf()], target.path())
            .unwrap();
        assert_eq!(outcome.moved_count(), 0);
        assert_eq!(outcome.skipped.len(), 1);
    }

    #[test]
    fn test_store_writes_body_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = FileSystemArtifactStore::new();
        let path = store.store(dir.path(), "curl.deb", b"!<arch>\n").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"!<arch>\n");
    }

    #[test]
    fn test_store_rejects_path_components() {
        let dir = TempDir::new().unwrap();
        let store = FileSystemArtifactStore::new();
        assert!(store.store(dir.path(), "../escape.deb", b"x").is_err());
        assert!(store.store(dir.path(), "..", b"x").is_err());
    }

    #[test]
    fn test_list_artifacts_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.deb"), "").unwrap();
        fs::write(dir.path().join("a.deb"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("terraform_1.6.2_linux_amd64.zip"), "").unwrap();

        let listed = FileSystemArtifactStore::new().list_artifacts(dir.path()).unwrap();
        let names: Vec<_> = listed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.deb", "b.deb", "terraform_1.6.2_linux_amd64.zip"]);
    }
}
