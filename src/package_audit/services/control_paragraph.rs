use std::collections::HashMap;

/// The first paragraph of a Debian `control` file
///
/// Field names are matched case-insensitively. Continuation lines (leading
/// space or tab) are appended to the preceding field.
#[derive(Debug, Clone, Default)]
pub struct ControlParagraph {
    fields: HashMap<String, String>,
}

impl ControlParagraph {
    pub fn parse(text: &str) -> Self {
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut current: Option<String> = None;

        for line in text.lines() {
            if line.trim().is_empty() {
                if fields.is_empty() {
                    continue;
                }
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some(value) = current.as_ref().and_then(|key| fields.get_mut(key)) {
                    value.push('\n');
                    value.push_str(line.trim());
                }
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim().to_ascii_lowercase();
                fields.insert(key.clone(), value.trim().to_string());
                current = Some(key);
            }
        }

        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(&field.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Field value, or the empty string when absent
    pub fn field_or_empty(&self, field: &str) -> String {
        self.get(field).unwrap_or_default().to_string()
    }
}
