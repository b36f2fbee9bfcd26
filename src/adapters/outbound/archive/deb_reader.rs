use crate::ports::outbound::PackageArchiveReader;
use crate::shared::error::PipelineError;
use crate::shared::security::{
    validate_file_size, validate_regular_file, MAX_ARCHIVE_SIZE, MAX_COPYRIGHT_SIZE,
};
use crate::shared::Result;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

/// Member name prefix of the control tarball inside the `ar` container
const CONTROL_MEMBER: &str = "control.tar";

/// Member name prefix of the data tarball inside the `ar` container
const DATA_MEMBER: &str = "data.tar";

/// DebArchiveReader adapter for Debian binary packages
///
/// A `.deb` is an `ar` container holding `debian-binary`,
/// `control.tar[.gz|.xz|.zst]` and `data.tar[.gz|.xz|.zst]`.
#[derive(Clone)]
pub struct DebArchiveReader;

impl DebArchiveReader {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, archive: &Path) -> Result<ar::Archive<BufReader<File>>> {
        validate_regular_file(archive, "package archive")?;
        let size = fs::metadata(archive)?.len();
        validate_file_size(size, archive, MAX_ARCHIVE_SIZE)?;

        let file = File::open(archive).map_err(|e| PipelineError::ArchiveRead {
            path: archive.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(ar::Archive::new(BufReader::new(file)))
    }

    /// Wraps a compressed tar member in the matching decoder
    fn decompress<'a, R: Read + 'a>(member_name: &str, reader: R) -> Result<Box<dyn Read + 'a>> {
        let suffix = member_name
            .split_once(".tar")
            .map(|(_, suffix)| suffix)
            .unwrap_or_default();
        let decoder: Box<dyn Read + 'a> = match suffix {
            "" => Box::new(reader),
            ".gz" => Box::new(libflate::gzip::Decoder::new(reader)?),
            ".xz" => Box::new(xz2::read::XzDecoder::new(reader)),
            ".zst" => Box::new(zstd::stream::read::Decoder::new(reader)?),
            other => anyhow::bail!("unsupported compression '{}' for {}", other, member_name),
        };
        Ok(decoder)
    }

    /// Tar paths in packages are usually `./usr/...`; compare without the prefix
    fn normalize_member_path(path: &Path) -> String {
        let text = path.to_string_lossy();
        text.trim_start_matches("./").trim_start_matches('/').to_string()
    }

    /// Finds `wanted` inside the tarball member starting with `member_prefix`
    ///
    /// Returns `Ok(None)` if the tarball exists but lacks the file.
    fn read_tar_file(
        &self,
        archive_path: &Path,
        member_prefix: &str,
        wanted: &str,
        max_size: u64,
    ) -> Result<Option<String>> {
        let mut archive = self.open(archive_path)?;

        while let Some(entry) = archive.next_entry() {
            let entry = entry.map_err(|e| PipelineError::ArchiveRead {
                path: archive_path.to_path_buf(),
                details: e.to_string(),
            })?;
            let member_name = String::from_utf8_lossy(entry.header().identifier()).into_owned();
            if !member_name.starts_with(member_prefix) {
                continue;
            }

            let mut tarball = tar::Archive::new(Self::decompress(&member_name, entry)?);
            for file in tarball.entries()? {
                let mut file = file?;
                if Self::normalize_member_path(&file.path()?) != wanted {
                    continue;
                }
                validate_file_size(file.header().size()?, Path::new(wanted), max_size)?;

                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)?;
                return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
            }
            return Ok(None);
        }

        Err(PipelineError::ArchiveRead {
            path: archive_path.to_path_buf(),
            details: format!("no {}* member found", member_prefix),
        }
        .into())
    }
}

impl Default for DebArchiveReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageArchiveReader for DebArchiveReader {
    fn read_control(&self, archive: &Path) -> Result<String> {
        self.read_tar_file(archive, CONTROL_MEMBER, "control", MAX_COPYRIGHT_SIZE)?
            .ok_or_else(|| {
                PipelineError::ArchiveRead {
                    path: archive.to_path_buf(),
                    details: "control member has no control file".to_string(),
                }
                .into()
            })
    }

    fn read_data_file(&self, archive: &Path, member: &str) -> Result<Option<String>> {
        let wanted = member.trim_start_matches("./").trim_start_matches('/');
        self.read_tar_file(archive, DATA_MEMBER, wanted, MAX_COPYRIGHT_SIZE)
    }
}
