use crate::shared::Result;
use async_trait::async_trait;

/// HttpFetcher port for downloading remote files
///
/// Used for direct `.deb` downloads, pinned release archives and repository
/// signing keys.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Fetches `url` and returns the response body
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-2xx status
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
