/// Archive adapters for reading package files
mod deb_reader;

pub use deb_reader::DebArchiveReader;
