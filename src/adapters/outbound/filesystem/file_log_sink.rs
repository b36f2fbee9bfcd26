use crate::ports::outbound::{LogLevel, LogSink, LogStream};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Timestamp layout of every log line
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// FileLogSink adapter writing one append-only file per log stream
///
/// Lines look like `2026-03-14 09:26:53 - INFO - Downloaded curl` and are
/// echoed to stderr unless echo is disabled.
pub struct FileLogSink {
    log_dir: PathBuf,
    echo: bool,
    write_lock: Mutex<()>,
}

impl FileLogSink {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            echo: true,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn stream_path(&self, stream: LogStream) -> PathBuf {
        self.log_dir.join(stream.file_name())
    }

    fn format_line(level: LogLevel, message: &str) -> String {
        format!(
            "{} - {} - {}\n",
            Local::now().format(TIMESTAMP_FORMAT),
            level,
            message
        )
    }
}

impl LogSink for FileLogSink {
    fn log(&self, stream: LogStream, level: LogLevel, message: &str) {
        let line = Self::format_line(level, message);
        let path = self.stream_path(stream);

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let written = fs::create_dir_all(&self.log_dir).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?
                .write_all(line.as_bytes())
        });

        if let Err(e) = written {
            eprintln!("⚠️  Failed to write {}: {}", path.display(), e);
        }
        if self.echo {
            eprint!("{}", line);
        }
    }
}
