use async_trait::async_trait;
use deb_sbom::prelude::*;
use std::sync::{Arc, Mutex};

/// Fake language-model client returning a canned report or failing
#[derive(Default, Clone)]
pub struct FakeSummaryGenerator {
    pub response: Option<String>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeSummaryGenerator {
    pub fn responding(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            prompts: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryGenerator for FakeSummaryGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => anyhow::bail!("language model endpoint returned 500 Internal Server Error"),
        }
    }
}
