/// Filesystem adapters for file I/O operations
mod artifact_store;
mod file_log_sink;
mod file_reader;
mod file_writer;

pub use artifact_store::{FileSystemArtifactStore, ARTIFACT_EXTENSION, RELEASE_EXTENSION};
pub use file_log_sink::FileLogSink;
pub use file_reader::FileSystemReader;
pub use file_writer::FileSystemWriter;
