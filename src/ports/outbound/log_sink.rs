use std::fmt;

/// The separate append-only log streams of a run, one per concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogStream {
    Download,
    Sbom,
    VulnerabilityScan,
    MalwareScan,
    Metadata,
    Report,
}

impl LogStream {
    pub const ALL: [LogStream; 6] = [
        LogStream::Download,
        LogStream::Sbom,
        LogStream::VulnerabilityScan,
        LogStream::MalwareScan,
        LogStream::Metadata,
        LogStream::Report,
    ];

    /// File name of the stream inside the logs directory
    pub fn file_name(&self) -> &'static str {
        match self {
            LogStream::Download => "download_log.txt",
            LogStream::Sbom => "sbom_log.txt",
            LogStream::VulnerabilityScan => "trivy_log.txt",
            LogStream::MalwareScan => "clamav_log.txt",
            LogStream::Metadata => "metadata_log.txt",
            LogStream::Report => "report_log.txt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// LogSink port for the run's log streams
///
/// Implementations must tolerate concurrent calls from pool workers; a
/// single call produces exactly one line.
pub trait LogSink: Send + Sync {
    fn log(&self, stream: LogStream, level: LogLevel, message: &str);

    fn info(&self, stream: LogStream, message: &str) {
        self.log(stream, LogLevel::Info, message);
    }

    fn warning(&self, stream: LogStream, message: &str) {
        self.log(stream, LogLevel::Warning, message);
    }

    fn error(&self, stream: LogStream, message: &str) {
        self.log(stream, LogLevel::Error, message);
    }
}
