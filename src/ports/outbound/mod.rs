/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (processes, network, file system, console).
pub mod artifact_store;
pub mod command_runner;
pub mod http_fetcher;
pub mod input_reader;
pub mod log_sink;
pub mod metadata_table_writer;
pub mod package_archive_reader;
pub mod progress_reporter;
pub mod scan_summary_formatter;
pub mod summary_generator;
pub mod text_file_writer;

pub use artifact_store::{ArtifactStore, RelocationOutcome};
pub use command_runner::{CommandRunner, CommandSpec, ToolOutput};
pub use http_fetcher::HttpFetcher;
pub use input_reader::InputReader;
pub use log_sink::{LogLevel, LogSink, LogStream};
pub use metadata_table_writer::MetadataTableWriter;
pub use package_archive_reader::PackageArchiveReader;
pub use progress_reporter::ProgressReporter;
pub use scan_summary_formatter::ScanSummaryFormatter;
pub use summary_generator::SummaryGenerator;
pub use text_file_writer::TextFileWriter;
