use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default pool size for concurrent downloads and artifact processing
pub const DEFAULT_WORKERS: usize = 5;

/// Default number of attempts per package-manager download
pub const DEFAULT_RETRIES: u32 = 3;

/// Default pause between download attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Default release URL template for pinned terraform requests
pub const DEFAULT_RELEASE_URL_TEMPLATE: &str =
    "https://releases.hashicorp.com/terraform/{version}/terraform_{version}_linux_amd64.zip";

/// How the package list for a run is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
    /// Package manifest plus repository list
    #[default]
    Repository,
    /// A list of absolute URLs
    Url,
    /// A list of file names joined to a base URL
    Filename,
}

impl FromStr for DownloadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "repository" | "repo" | "manifest" => Ok(DownloadMode::Repository),
            "url" => Ok(DownloadMode::Url),
            "filename" => Ok(DownloadMode::Filename),
            _ => Err(format!(
                "Invalid download mode: {}. Please specify 'repository', 'url' or 'filename'",
                s
            )),
        }
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Repository => write!(f, "repository"),
            DownloadMode::Url => write!(f, "url"),
            DownloadMode::Filename => write!(f, "filename"),
        }
    }
}

/// The output tree of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub packages_dir: PathBuf,
    pub sbom_dir: PathBuf,
    pub vulnerability_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            packages_dir: root.join("deb_packages"),
            sbom_dir: root.join("sbom_results"),
            vulnerability_dir: root.join("trivy_results"),
            log_dir: root.join("logs"),
            root,
        }
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    pub fn directories(&self) -> [&Path; 5] {
        [
            &self.root,
            &self.packages_dir,
            &self.sbom_dir,
            &self.vulnerability_dir,
            &self.log_dir,
        ]
    }

    /// `<stem>.cyclonedx.json` under the SBOM directory
    pub fn sbom_path(&self, stem: &str) -> PathBuf {
        self.sbom_dir.join(format!("{}.cyclonedx.json", stem))
    }

    /// `<stem>-trivy-result.json` under the vulnerability directory
    pub fn vulnerability_result_path(&self, stem: &str) -> PathBuf {
        self.vulnerability_dir
            .join(format!("{}-trivy-result.json", stem))
    }

    pub fn metadata_table_path(&self) -> PathBuf {
        self.root.join("deb_metadata.xlsx")
    }

    pub fn scan_summary_path(&self) -> PathBuf {
        self.root.join("scan_summary.md")
    }

    pub fn llm_report_path(&self) -> PathBuf {
        self.root.join("llm_security_report.md")
    }
}

/// Names of the external tools, overridable for non-standard installs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNames {
    pub apt_get: String,
    pub apt_rdepends: String,
    pub trivy: String,
    pub clamscan: String,
    pub freshclam: String,
    pub lsb_release: String,
}

impl Default for ToolNames {
    fn default() -> Self {
        Self {
            apt_get: "apt-get".to_string(),
            apt_rdepends: "apt-rdepends".to_string(),
            trivy: "trivy".to_string(),
            clamscan: "clamscan".to_string(),
            freshclam: "freshclam".to_string(),
            lsb_release: "lsb_release".to_string(),
        }
    }
}

/// System locations used by the package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AptPaths {
    pub cache_dir: PathBuf,
    pub sources_dir: PathBuf,
    pub keyring_dir: PathBuf,
}

impl Default for AptPaths {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("/var/cache/apt/archives"),
            sources_dir: PathBuf::from("/etc/apt/sources.list.d"),
            keyring_dir: PathBuf::from("/usr/share/keyrings"),
        }
    }
}

/// PipelineSettings - fully resolved configuration of one run
///
/// Built by the CLI from flags, environment and the optional config file.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub mode: DownloadMode,
    pub manifest_path: PathBuf,
    pub repository_list_path: PathBuf,
    pub urls_file: PathBuf,
    pub filenames_file: PathBuf,
    pub base_url: Option<String>,
    pub layout: OutputLayout,
    /// Directory `apt-get download` runs in; swept by the relocator
    pub work_dir: PathBuf,
    pub apt: AptPaths,
    pub tools: ToolNames,
    /// Write apt source entries and keys for the repository list
    pub register_sources: bool,
    pub default_codename: Option<String>,
    pub release_url_template: String,
    pub workers: usize,
    pub retries: u32,
    pub retry_delay: Duration,
    pub malware_scan: bool,
    pub llm_report: bool,
    /// Prefix privileged package-manager commands with `sudo`
    pub use_sudo: bool,
    /// Hand the output tree to this user at teardown
    pub chown_user: Option<String>,
}

impl PipelineSettings {
    pub fn new(output_root: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: DownloadMode::default(),
            manifest_path: PathBuf::from("packages.txt"),
            repository_list_path: PathBuf::from("repos.txt"),
            urls_file: PathBuf::from("urls.txt"),
            filenames_file: PathBuf::from("filenames.txt"),
            base_url: None,
            layout: OutputLayout::new(output_root),
            work_dir: work_dir.into(),
            apt: AptPaths::default(),
            tools: ToolNames::default(),
            register_sources: true,
            default_codename: None,
            release_url_template: DEFAULT_RELEASE_URL_TEMPLATE.to_string(),
            workers: DEFAULT_WORKERS,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            malware_scan: true,
            llm_report: false,
            use_sudo: false,
            chown_user: None,
        }
    }

    /// Directories the relocator sweeps for freshly downloaded archives
    pub fn relocation_sources(&self) -> Vec<PathBuf> {
        vec![self.apt.cache_dir.clone(), self.work_dir.clone()]
    }
}
