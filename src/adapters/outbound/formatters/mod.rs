/// Formatter adapters for the run's report documents
mod markdown_formatter;
mod xlsx_writer;

pub use markdown_formatter::MarkdownFormatter;
pub use xlsx_writer::XlsxMetadataWriter;
