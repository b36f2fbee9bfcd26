use serde::Serialize;

/// Package metadata row for the metadata spreadsheet
///
/// Missing control fields are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    /// Best-effort license heuristic; empty when undetermined
    pub license_type: String,
    pub homepage_url: String,
}

impl PackageMetadata {
    pub fn new(name: String, version: String, license_type: String, homepage_url: String) -> Self {
        Self {
            name,
            version,
            license_type,
            homepage_url,
        }
    }
}
