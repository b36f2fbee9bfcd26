use deb_sbom::prelude::*;
use std::path::Path;
use std::time::Duration;

/// Real `.deb` reader that holds its thread for `delay` on every control read
#[derive(Clone)]
pub struct SlowArchiveReader {
    inner: DebArchiveReader,
    delay: Duration,
}

impl SlowArchiveReader {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: DebArchiveReader::new(),
            delay,
        }
    }
}

impl PackageArchiveReader for SlowArchiveReader {
    fn read_control(&self, archive: &Path) -> Result<String> {
        std::thread::sleep(self.delay);
        self.inner.read_control(archive)
    }

    fn read_data_file(&self, archive: &Path, member: &str) -> Result<Option<String>> {
        self.inner.read_data_file(archive, member)
    }
}
