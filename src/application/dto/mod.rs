/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod pipeline_settings;
mod pipeline_summary;

pub use pipeline_settings::{
    AptPaths, DownloadMode, OutputLayout, PipelineSettings, ToolNames, DEFAULT_RELEASE_URL_TEMPLATE,
    DEFAULT_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_WORKERS,
};
pub use pipeline_summary::{AcquisitionOutcome, PipelineSummary, ReportOutcome};
