use crate::ports::outbound::HttpFetcher;
use crate::shared::error::PipelineError;
use crate::shared::Result;
use async_trait::async_trait;
use std::time::Duration;

/// ReqwestHttpFetcher adapter for plain HTTP(S) downloads
///
/// Implements the HttpFetcher port with an async reqwest client. A single
/// attempt is made per call; non-2xx statuses are failures.
pub struct ReqwestHttpFetcher {
    client: reqwest::Client,
}

impl ReqwestHttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("deb-sbom/{}", version);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

// Note: no Default implementation, since building the client can fail.

#[async_trait]
impl HttpFetcher for ReqwestHttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let download_failed = |details: String| PipelineError::DownloadFailed {
            url: url.to_string(),
            details,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_failed(format!("server returned status {}", status)).into());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| download_failed(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        assert!(ReqwestHttpFetcher::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_download_failure() {
        let fetcher = ReqwestHttpFetcher::new(Duration::from_secs(2)).unwrap();
        let err = fetcher
            .fetch("http://127.0.0.1:9/curl_7.88.1_amd64.deb")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to download"));
    }
}
