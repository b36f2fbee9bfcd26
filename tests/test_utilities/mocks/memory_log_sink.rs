use deb_sbom::ports::outbound::LogLevel;
use deb_sbom::prelude::*;
use std::sync::{Arc, Mutex};

/// In-memory LogSink that keeps every line for assertions
#[derive(Default, Clone)]
pub struct MemoryLogSink {
    pub lines: Arc<Mutex<Vec<(LogStream, LogLevel, String)>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self, stream: LogStream, level: LogLevel) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, l, _)| *s == stream && *l == level)
            .map(|(_, _, message)| message.clone())
            .collect()
    }

    pub fn warnings(&self, stream: LogStream) -> Vec<String> {
        self.messages(stream, LogLevel::Warning)
    }

    pub fn errors(&self, stream: LogStream) -> Vec<String> {
        self.messages(stream, LogLevel::Error)
    }

    pub fn contains(&self, stream: LogStream, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(s, _, message)| *s == stream && message.contains(needle))
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, stream: LogStream, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((stream, level, message.to_string()));
    }
}
