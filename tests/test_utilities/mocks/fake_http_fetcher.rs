use async_trait::async_trait;
use deb_sbom::prelude::*;
use deb_sbom::shared::error::PipelineError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fake HttpFetcher serving canned bodies by exact URL
#[derive(Default, Clone)]
pub struct FakeHttpFetcher {
    pub bodies: HashMap<String, Vec<u8>>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl FakeHttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetcher for FakeHttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requested.lock().unwrap().push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| {
            PipelineError::DownloadFailed {
                url: url.to_string(),
                details: "server returned status 404 Not Found".to_string(),
            }
            .into()
        })
    }
}
