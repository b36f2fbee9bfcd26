//! Configuration file support for deb-sbom.
//!
//! Provides YAML-based configuration through `deb-sbom.config.yml` files,
//! including data structures, file loading, and validation. Values here sit
//! between the built-in defaults and the command line.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use deb_sbom::application::dto::DownloadMode;
use deb_sbom::shared::error::PipelineError;
use deb_sbom::shared::Result;

pub const CONFIG_FILENAME: &str = "deb-sbom.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub mode: Option<String>,
    pub manifest: Option<PathBuf>,
    pub repos: Option<PathBuf>,
    pub urls_file: Option<PathBuf>,
    pub filenames_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub workers: Option<usize>,
    pub retries: Option<u32>,
    pub retry_delay_secs: Option<u64>,
    pub tool_timeout_secs: Option<u64>,
    pub http_timeout_secs: Option<u64>,
    pub malware_scan: Option<bool>,
    pub llm_report: Option<bool>,
    pub register_sources: Option<bool>,
    pub default_codename: Option<String>,
    pub release_url_template: Option<String>,
    pub sudo: Option<bool>,
    pub chown: Option<String>,
    pub apt: Option<AptConfig>,
    pub tools: Option<ToolsConfig>,
    pub llm: Option<LlmConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Package manager locations.
#[derive(Debug, Deserialize, Default)]
pub struct AptConfig {
    pub cache_dir: Option<PathBuf>,
    pub sources_dir: Option<PathBuf>,
    pub keyring_dir: Option<PathBuf>,
}

/// External tool names or paths.
#[derive(Debug, Deserialize, Default)]
pub struct ToolsConfig {
    pub apt_get: Option<String>,
    pub apt_rdepends: Option<String>,
    pub trivy: Option<String>,
    pub clamscan: Option<String>,
    pub freshclam: Option<String>,
    pub lsb_release: Option<String>,
}

impl ToolsConfig {
    fn named(&self) -> [(&'static str, Option<&String>); 6] {
        [
            ("apt_get", self.apt_get.as_ref()),
            ("apt_rdepends", self.apt_rdepends.as_ref()),
            ("trivy", self.trivy.as_ref()),
            ("clamscan", self.clamscan.as_ref()),
            ("freshclam", self.freshclam.as_ref()),
            ("lsb_release", self.lsb_release.as_ref()),
        ]
    }
}

/// Language-model endpoint for the optional security report.
#[derive(Debug, Deserialize, Default)]
pub struct LlmConfig {
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn config_error(message: String, hint: &str) -> anyhow::Error {
    PipelineError::ConfigError {
        message,
        hint: hint.to_string(),
    }
    .into()
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(mode) = &config.mode {
        DownloadMode::from_str(mode)
            .map_err(|e| config_error(e, "Use one of: repository, url, filename."))?;
    }

    if config.workers == Some(0) {
        return Err(config_error(
            "workers must be at least 1".to_string(),
            "Remove the field to use the default of 5 concurrent workers.",
        ));
    }

    for (field, value) in [
        ("tool_timeout_secs", config.tool_timeout_secs),
        ("http_timeout_secs", config.http_timeout_secs),
    ] {
        if value == Some(0) {
            return Err(config_error(
                format!("{} must be greater than zero", field),
                "Timeouts are given in whole seconds.",
            ));
        }
    }

    if let Some(tools) = &config.tools {
        for (field, value) in tools.named() {
            if value.is_some_and(|name| name.trim().is_empty()) {
                return Err(config_error(
                    format!("tools.{} must not be empty", field),
                    "Give a program name on PATH or an absolute path, or remove the field.",
                ));
            }
        }
    }

    if let Some(template) = &config.release_url_template {
        if !template.contains("{version}") {
            return Err(config_error(
                format!("release_url_template '{}' has no {{version}} placeholder", template),
                "Example: https://releases.hashicorp.com/terraform/{version}/terraform_{version}_linux_amd64.zip",
            ));
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, content).unwrap();
        config_path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(
            &dir,
            r#"
mode: url
urls_file: lists/urls.txt
output_dir: /srv/audit
workers: 8
retries: 2
retry_delay_secs: 1
malware_scan: false
default_codename: bookworm
apt:
  cache_dir: /tmp/apt-cache
tools:
  trivy: /opt/trivy/bin/trivy
llm:
  model: gpt-4o-mini
"#,
        );

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.mode.as_deref(), Some("url"));
        assert_eq!(config.urls_file, Some(PathBuf::from("lists/urls.txt")));
        assert_eq!(config.output_dir, Some(PathBuf::from("/srv/audit")));
        assert_eq!(config.workers, Some(8));
        assert_eq!(config.retries, Some(2));
        assert_eq!(config.retry_delay_secs, Some(1));
        assert_eq!(config.malware_scan, Some(false));
        assert_eq!(config.default_codename.as_deref(), Some("bookworm"));
        assert_eq!(
            config.apt.unwrap().cache_dir,
            Some(PathBuf::from("/tmp/apt-cache"))
        );
        assert_eq!(
            config.tools.unwrap().trivy.as_deref(),
            Some("/opt/trivy/bin/trivy")
        );
        assert_eq!(config.llm.unwrap().model.as_deref(), Some("gpt-4o-mini"));
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "workers: 3\n").unwrap();

        let config = discover_config(dir.path()).unwrap();
        assert_eq!(config.unwrap().workers, Some(3));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "invalid: yaml: [[[broken");

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "workers: 0\n");

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("workers must be at least 1"));
        assert!(err.contains("💡 Hint"));
    }

    #[test]
    fn test_empty_tool_name_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "tools:\n  clamscan: \"  \"\n");

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("tools.clamscan must not be empty"));
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "mode: ftp\n");

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Invalid download mode"));
    }

    #[test]
    fn test_release_template_without_placeholder_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(
            &dir,
            "release_url_template: https://example.test/terraform.zip\n",
        );

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("{version}"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "tool_timeout_secs: 0\n");

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("tool_timeout_secs"));
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(
            &dir,
            r#"
workers: 2
unknown_field: true
another_unknown: value
"#,
        );

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("unknown_field"));
        assert!(config.unknown_fields.contains_key("another_unknown"));
    }

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert!(config.mode.is_none());
        assert!(config.workers.is_none());
        assert!(config.tools.is_none());
        assert!(config.unknown_fields.is_empty());
    }
}
