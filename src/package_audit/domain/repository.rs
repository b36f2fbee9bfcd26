use super::{meaningful_lines, ParseOutcome};
use crate::shared::error::PipelineError;

/// A named package repository from the repository list
///
/// `base_url` is either a plain URL (`https://deb.example.test/`) or a full
/// apt source entry (`deb [arch=amd64] https://deb.example.test stable main`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    pub name: String,
    pub base_url: String,
    pub signing_key_url: Option<String>,
    pub codename_override: Option<String>,
}

impl RepositoryEntry {
    /// Whether `base_url` holds a full `deb ...` source entry
    pub fn is_source_entry(&self) -> bool {
        self.base_url.starts_with("deb ") || self.base_url.starts_with("deb-src ")
    }

    /// The URL used when joining relative package paths
    pub fn download_base(&self) -> &str {
        if self.is_source_entry() {
            self.base_url
                .split_whitespace()
                .find(|token| token.contains("://"))
                .unwrap_or(&self.base_url)
        } else {
            &self.base_url
        }
    }
}

/// Mapping of repository name to entry, loaded once per run
///
/// Keeps file order so apt source files are written in the order listed.
/// A name listed twice keeps its position and takes the later definition.
#[derive(Debug, Clone, Default)]
pub struct RepositoryRegistry {
    entries: Vec<RepositoryEntry>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `name,url_or_entry[,gpg_key_url[,codename]]` lines
    pub fn parse(content: &str) -> ParseOutcome<RepositoryEntry> {
        let mut outcome = ParseOutcome::new();

        for (line_number, line) in meaningful_lines(content) {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            if parts.len() < 2 {
                outcome.rejected.push(PipelineError::InvalidRepositoryLine {
                    line_number,
                    line: line.to_string(),
                    reason: "expected at least `name,url`".to_string(),
                });
                continue;
            }

            let name = parts[0];
            let base_url = parts[1];
            if name.is_empty() || base_url.is_empty() {
                outcome.rejected.push(PipelineError::InvalidRepositoryLine {
                    line_number,
                    line: line.to_string(),
                    reason: "repository name and URL must not be empty".to_string(),
                });
                continue;
            }

            let optional = |idx: usize| {
                parts
                    .get(idx)
                    .filter(|value| !value.is_empty())
                    .map(|value| value.to_string())
            };

            outcome.items.push(RepositoryEntry {
                name: name.to_string(),
                base_url: base_url.to_string(),
                signing_key_url: optional(2),
                codename_override: optional(3),
            });
        }

        outcome
    }

    pub fn from_entries(entries: Vec<RepositoryEntry>) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry.insert(entry);
        }
        registry
    }

    pub fn insert(&mut self, entry: RepositoryEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RepositoryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn entries(&self) -> &[RepositoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
