use crate::shared::Result;
use async_trait::async_trait;

/// SummaryGenerator port for the optional language-model report
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Submits `prompt` and returns the generated text verbatim
    async fn generate(&self, prompt: &str) -> Result<String>;
}
