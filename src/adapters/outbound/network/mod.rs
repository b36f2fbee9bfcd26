/// Network adapters for external HTTP services
mod http_client;
mod openai_client;

pub use http_client::ReqwestHttpFetcher;
pub use openai_client::OpenAiSummaryGenerator;
