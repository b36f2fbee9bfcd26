use crate::package_audit::domain::RepositoryEntry;
use std::path::Path;

/// Component used for plain-URL repositories
const DEFAULT_COMPONENT: &str = "main";

/// SourcesEntry service: renders one apt `sources.list` line for a repository
pub struct SourcesEntry;

impl SourcesEntry {
    /// Renders the entry, inserting `signed-by=<keyring>` when a keyring is given
    ///
    /// A full `deb ...` entry keeps its own suite and components; an existing
    /// `[...]` option list is extended rather than replaced. A plain URL
    /// becomes `deb [signed-by=...] <url> <codename> main`.
    pub fn render(entry: &RepositoryEntry, keyring: Option<&Path>, codename: &str) -> String {
        let signed_by = keyring.map(|path| format!("signed-by={}", path.display()));

        if entry.is_source_entry() {
            return Self::insert_option(entry.base_url.trim(), signed_by.as_deref());
        }

        match signed_by {
            Some(option) => format!(
                "deb [{}] {} {} {}",
                option, entry.base_url, codename, DEFAULT_COMPONENT
            ),
            None => format!("deb {} {} {}", entry.base_url, codename, DEFAULT_COMPONENT),
        }
    }

    fn insert_option(source_line: &str, option: Option<&str>) -> String {
        let Some(option) = option else {
            return source_line.to_string();
        };

        let (kind, rest) = source_line
            .split_once(char::is_whitespace)
            .unwrap_or((source_line, ""));
        let rest = rest.trim_start();

        if let Some(options_body) = rest.strip_prefix('[') {
            if let Some((existing, tail)) = options_body.split_once(']') {
                let existing = existing.trim();
                let merged = if existing.is_empty() {
                    option.to_string()
                } else {
                    format!("{} {}", existing, option)
                };
                return format!("{} [{}]{}", kind, merged, tail);
            }
        }

        format!("{} [{}] {}", kind, option, rest)
    }
}
