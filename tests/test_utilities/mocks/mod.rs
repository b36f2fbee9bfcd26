/// Mock implementations for testing
mod fake_command_runner;
mod fake_http_fetcher;
mod fake_summary_generator;
mod memory_log_sink;
mod mock_progress_reporter;
mod slow_archive_reader;

pub use fake_command_runner::FakeCommandRunner;
pub use fake_http_fetcher::FakeHttpFetcher;
pub use fake_summary_generator::FakeSummaryGenerator;
pub use memory_log_sink::MemoryLogSink;
pub use mock_progress_reporter::MockProgressReporter;
pub use slow_archive_reader::SlowArchiveReader;
