mod control_paragraph;
mod dependency_parser;
mod manifest_parser;
mod report_prompt;
mod scan_tally;
mod sources_entry;
mod trivy_report;
mod url_builder;

pub use control_paragraph::ControlParagraph;
pub use dependency_parser::DependencyParser;
pub use manifest_parser::{ManifestParser, PACKAGE_MANAGER_TAG, PINNED_RELEASE_TOOLS};
pub use report_prompt::ReportPrompt;
pub use scan_tally::ScanTally;
pub use sources_entry::SourcesEntry;
pub use trivy_report::TrivyReportParser;
pub use url_builder::UrlBuilder;
