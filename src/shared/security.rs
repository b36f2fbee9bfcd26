//! Filesystem guards for everything the pipeline moves, reads or writes.
//!
//! Archives arrive from mirrors and vendor repositories, and the output tree
//! may be handed to another user afterwards, so links are never followed and
//! names taken from URLs never escape their directory.

use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Largest package archive the metadata extractor will open (1 GiB).
pub const MAX_ARCHIVE_SIZE: u64 = 1024 * 1024 * 1024;

/// Largest copyright file read out of an archive (4 MiB).
pub const MAX_COPYRIGHT_SIZE: u64 = 4 * 1024 * 1024;

/// Fails when `path` is a symbolic link; `action` names what was about to happen
pub fn validate_not_symlink(path: &Path, action: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!("Cannot {} {}: {}", action, path.display(), e)
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: refusing to {} {} because it is a symbolic link",
            action,
            path.display()
        );
    }

    Ok(())
}

/// Fails unless `path` is a regular file that is not a link
pub fn validate_regular_file(path: &Path, description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Cannot inspect {} {}: {}", description, path.display(), e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} {} is a symbolic link",
            description,
            path.display()
        );
    }
    if !metadata.is_file() {
        anyhow::bail!("{} {} is not a regular file", description, path.display());
    }

    Ok(())
}

pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes, limit {} bytes)",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Accepts a single path component that stays inside its parent directory
///
/// Used for archive names taken from download URLs and for repository names
/// that become `.list` and keyring file names.
pub fn validate_plain_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\', '\0']) {
        anyhow::bail!("Security: '{}' is not a plain file name", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_regular_archive_passes_link_check() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("curl_7.88.1_amd64.deb");
        fs::write(&file_path, "!<arch>\n").unwrap();

        assert!(validate_not_symlink(&file_path, "move").is_ok());
        assert!(validate_regular_file(&file_path, "package archive").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_archive_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.deb");
        fs::write(&target, "x").unwrap();
        let link = temp_dir.path().join("link.deb");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = validate_not_symlink(&link, "move").unwrap_err();
        assert!(err.to_string().contains("refusing to move"));
        assert!(validate_regular_file(&link, "package archive").is_err());
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let path = PathBuf::from("/nonexistent/file.deb");
        assert!(validate_not_symlink(&path, "move").is_err());
    }

    #[test]
    fn test_directory_is_not_a_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = validate_regular_file(temp_dir.path(), "package archive").unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_file_size_limits() {
        let path = PathBuf::from("/test/huge.deb");
        let err = validate_file_size(MAX_ARCHIVE_SIZE + 1, &path, MAX_ARCHIVE_SIZE).unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert!(validate_file_size(1000, &path, MAX_COPYRIGHT_SIZE).is_ok());
    }

    #[test]
    fn test_plain_file_names() {
        assert!(validate_plain_file_name("curl_7.88.1_amd64.deb").is_ok());
        assert!(validate_plain_file_name("docker").is_ok());
        for name in ["", ".", "..", ".hidden", "../etc/passwd", "a/b.deb", "a\\b.deb"] {
            assert!(validate_plain_file_name(name).is_err(), "{name:?} accepted");
        }
    }
}
