//! deb-sbom - security audit pipeline for Debian packages
//!
//! This library downloads `.deb` packages (through apt, registered
//! repositories, plain URLs or pinned tool releases), collects them in one
//! directory, and runs every archive through SBOM generation, an SBOM
//! vulnerability scan, an antivirus scan and metadata extraction. The results
//! end up in a metadata spreadsheet, a markdown scan summary and, optionally,
//! a language-model security report.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`package_audit`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and run state
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use deb_sbom::prelude::*;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<()> {
//! let settings = PipelineSettings::new("output", "output/apt_work");
//!
//! // Create adapters
//! let adapters = PipelineAdapters {
//!     command_runner: SystemCommandRunner::new(Duration::from_secs(1800)),
//!     http_fetcher: ReqwestHttpFetcher::new(Duration::from_secs(60))?,
//!     artifact_store: FileSystemArtifactStore::new(),
//!     input_reader: FileSystemReader::new(),
//!     text_writer: FileSystemWriter::new(),
//!     archive_reader: DebArchiveReader::new(),
//!     table_writer: XlsxMetadataWriter::new(),
//!     summary_formatter: MarkdownFormatter::new(),
//!     summary_generator: None::<OpenAiSummaryGenerator>,
//!     log_sink: FileLogSink::new(&settings.layout.log_dir),
//!     progress_reporter: StderrProgressReporter::new(),
//! };
//!
//! // Execute
//! let summary = RunPipelineUseCase::new(adapters).execute(&settings).await?;
//! println!("{} artifact(s) audited", summary.tally.artifacts);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod package_audit;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::archive::DebArchiveReader;
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileLogSink, FileSystemArtifactStore, FileSystemReader, FileSystemWriter,
    };
    pub use crate::adapters::outbound::formatters::{MarkdownFormatter, XlsxMetadataWriter};
    pub use crate::adapters::outbound::network::{OpenAiSummaryGenerator, ReqwestHttpFetcher};
    pub use crate::adapters::outbound::process::SystemCommandRunner;
    pub use crate::application::dto::{
        DownloadMode, OutputLayout, PipelineSettings, PipelineSummary,
    };
    pub use crate::application::use_cases::{PipelineAdapters, RunPipelineUseCase};
    pub use crate::application::PipelineRun;
    pub use crate::package_audit::domain::{
        ArtifactReport, DownloadedArtifact, MalwareVerdict, PackageMetadata, PackageRequest,
        PackageSource, PipelineStage, RepositoryEntry, RepositoryRegistry, ScanResult,
        ScanStatus, Severity,
    };
    pub use crate::package_audit::policies::LicenseDetector;
    pub use crate::package_audit::services::{ManifestParser, ScanTally};
    pub use crate::ports::outbound::{
        ArtifactStore, CommandRunner, CommandSpec, HttpFetcher, InputReader, LogSink, LogStream,
        MetadataTableWriter, PackageArchiveReader, ProgressReporter, ScanSummaryFormatter,
        SummaryGenerator, TextFileWriter, ToolOutput,
    };
    pub use crate::shared::Result;
}
