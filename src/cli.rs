use clap::Parser;
use std::path::PathBuf;

use deb_sbom::application::dto::DownloadMode;

/// Parses a strictly positive count
fn parse_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("value must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("'{}' is not a valid count: {}", s, e)),
    }
}

/// Audit Debian packages: download, SBOM, vulnerability and malware scans
#[derive(Parser, Debug)]
#[command(name = "deb-sbom")]
#[command(version)]
#[command(
    about = "Download Debian packages, generate SBOMs, scan them for vulnerabilities and malware, and report their metadata",
    long_about = None
)]
pub struct Args {
    /// Path to a YAML config file (defaults to ./deb-sbom.config.yml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Download mode: repository, url or filename
    #[arg(short, long, env = "DOWNLOAD_MODE")]
    pub mode: Option<DownloadMode>,

    /// Package manifest used in repository mode
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Repository list used in repository mode
    #[arg(long, value_name = "FILE")]
    pub repos: Option<PathBuf>,

    /// URLs file used in url mode
    #[arg(long, value_name = "FILE")]
    pub urls_file: Option<PathBuf>,

    /// Filenames file used in filename mode
    #[arg(long, value_name = "FILE")]
    pub filenames_file: Option<PathBuf>,

    /// Base URL that filenames are joined to in filename mode
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Root of the output tree
    #[arg(short, long, env = "OUTPUT_DIR", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for the per-stage log files (defaults to <output-dir>/logs)
    #[arg(long, env = "LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Directory `apt-get download` runs in (defaults to <output-dir>/apt_work)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Number of concurrent downloads and artifact scans
    #[arg(short, long, value_parser = parse_positive)]
    pub workers: Option<usize>,

    /// Attempts per package-manager download
    #[arg(long)]
    pub retries: Option<u32>,

    /// Skip the antivirus scan and the definition update
    #[arg(long)]
    pub skip_malware_scan: bool,

    /// Do not write apt source entries for the repository list
    #[arg(long)]
    pub skip_source_registration: bool,

    /// Ask a language model for a security report (needs OPENAI_API_KEY)
    #[arg(long)]
    pub llm_report: bool,

    /// API key for the language-model report
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Run privileged package-manager commands through sudo
    #[arg(long)]
    pub sudo: bool,

    /// Give the output tree to this user when the run ends
    #[arg(long, value_name = "USER")]
    pub chown: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_arguments() {
        let args = Args::try_parse_from(["deb-sbom", "--output-dir", "/tmp/out"]).unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/out")));
        assert!(!args.skip_malware_scan);
        assert!(!args.llm_report);
        assert!(args.chown.is_none());
    }

    #[test]
    fn test_mode_parsing() {
        let args = Args::try_parse_from(["deb-sbom", "--mode", "url"]).unwrap();
        assert_eq!(args.mode, Some(DownloadMode::Url));

        let args = Args::try_parse_from(["deb-sbom", "-m", "FILENAME"]).unwrap();
        assert_eq!(args.mode, Some(DownloadMode::Filename));
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let result = Args::try_parse_from(["deb-sbom", "--mode", "ftp"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = Args::try_parse_from(["deb-sbom", "--workers", "0"]);
        assert!(result.is_err());

        let args = Args::try_parse_from(["deb-sbom", "-w", "8"]).unwrap();
        assert_eq!(args.workers, Some(8));
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "deb-sbom",
            "--skip-malware-scan",
            "--skip-source-registration",
            "--llm-report",
            "--sudo",
            "--chown",
            "builder",
            "--retries",
            "5",
        ])
        .unwrap();
        assert!(args.skip_malware_scan);
        assert!(args.skip_source_registration);
        assert!(args.llm_report);
        assert!(args.sudo);
        assert_eq!(args.chown.as_deref(), Some("builder"));
        assert_eq!(args.retries, Some(5));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("3"), Ok(3));
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-1").is_err());
        assert!(parse_positive("many").is_err());
    }
}
