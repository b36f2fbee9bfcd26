/// License names searched for in copyright text, in tie-break order.
///
/// The first token in this list that occurs anywhere in the text wins, so
/// text mentioning "LGPL" reports "GPL" because "GPL" is checked first.
/// Reordering this list changes the spreadsheet output.
pub const LICENSE_TOKENS: [&str; 9] = [
    "BSD",
    "GPL",
    "MIT",
    "Apache",
    "LGPL",
    "MPL",
    "CC0",
    "Artistic",
    "Public Domain",
];

/// LicenseDetector policy: best-effort license naming from copyright text
///
/// This is a plain substring heuristic over [`LICENSE_TOKENS`], not an SPDX
/// expression parser. It is case-sensitive and may mis-detect.
pub struct LicenseDetector;

impl LicenseDetector {
    /// Returns the first token of [`LICENSE_TOKENS`] contained in `text`
    pub fn detect(text: &str) -> Option<&'static str> {
        LICENSE_TOKENS
            .iter()
            .copied()
            .find(|token| text.contains(token))
    }

    /// Same as [`LicenseDetector::detect`], with an empty string for "undetermined"
    pub fn license_type(text: &str) -> String {
        Self::detect(text).map(String::from).unwrap_or_default()
    }
}
