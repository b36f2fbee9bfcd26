/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ENV_VARS: [&str; 5] = [
    "DOWNLOAD_MODE",
    "BASE_URL",
    "OUTPUT_DIR",
    "LOG_DIR",
    "OPENAI_API_KEY",
];

fn deb_sbom() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("deb-sbom");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// A config file that keeps every path of the run inside `dir`
fn write_sandbox_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let config_path = dir.join("deb-sbom.config.yml");
    let content = format!(
        "output_dir: {root}/output\nurls_file: {root}/urls.txt\napt:\n  cache_dir: {root}/apt-cache\n  sources_dir: {root}/sources\n  keyring_dir: {root}/keyrings\n{extra}",
        root = dir.display(),
        extra = extra
    );
    fs::write(&config_path, content).unwrap();
    config_path
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        deb_sbom()
            .arg("--help")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("--skip-malware-scan"));
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        deb_sbom()
            .arg("--version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        deb_sbom().arg("--invalid-option").assert().code(2);
    }

    /// Exit code 2: Invalid download mode
    #[test]
    fn test_exit_code_invalid_mode() {
        deb_sbom().args(["--mode", "ftp"]).assert().code(2);
    }

    /// Exit code 2: Worker count must be positive
    #[test]
    fn test_exit_code_zero_workers() {
        deb_sbom().args(["--workers", "0"]).assert().code(2);
    }

    /// Exit code 3: Application error - missing config file
    #[test]
    fn test_exit_code_missing_config_file() {
        deb_sbom()
            .args(["--config", "/nonexistent/deb-sbom.config.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }

    /// Exit code 3: Application error - invalid config value
    #[test]
    fn test_exit_code_invalid_config_value() {
        let dir = TempDir::new().unwrap();
        let config_path = write_sandbox_config(dir.path(), "workers: 0\n");

        deb_sbom()
            .args(["--config", config_path.to_str().unwrap()])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("workers must be at least 1"));
    }
}

mod run_tests {
    use super::*;

    #[test]
    fn test_url_mode_with_empty_list_writes_reports() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("urls.txt"), "# nothing to fetch yet\n").unwrap();
        let config_path = write_sandbox_config(dir.path(), "mode: url\nmalware_scan: false\n");

        deb_sbom()
            .args(["--config", config_path.to_str().unwrap()])
            .assert()
            .code(0);

        let output = dir.path().join("output");
        assert!(output.join("deb_packages").is_dir());
        assert!(output.join("sbom_results").is_dir());
        assert!(output.join("trivy_results").is_dir());
        assert!(output.join("deb_metadata.xlsx").is_file());
        let summary = fs::read_to_string(output.join("scan_summary.md")).unwrap();
        assert!(summary.contains("Packages analysed"));
        assert!(output.join("logs").is_dir());
    }

    #[test]
    fn test_auto_discovered_config_is_applied() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("urls.txt"), "").unwrap();
        write_sandbox_config(dir.path(), "mode: url\nmalware_scan: false\n");

        deb_sbom().current_dir(dir.path()).assert().code(0);

        assert!(dir.path().join("output/scan_summary.md").is_file());
    }

    #[test]
    fn test_cli_output_dir_overrides_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("urls.txt"), "").unwrap();
        let config_path = write_sandbox_config(dir.path(), "mode: url\nmalware_scan: false\n");
        let override_dir = dir.path().join("elsewhere");

        deb_sbom()
            .args([
                "--config",
                config_path.to_str().unwrap(),
                "--output-dir",
                override_dir.to_str().unwrap(),
            ])
            .assert()
            .code(0);

        assert!(override_dir.join("scan_summary.md").is_file());
        assert!(!dir.path().join("output").exists());
    }
}
