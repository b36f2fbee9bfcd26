use crate::shared::Result;
use std::fmt;

/// Maximum length for package identifiers (security limit)
const MAX_IDENTIFIER_LENGTH: usize = 2048;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Where a package is acquired from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageSource {
    /// The system package manager (`apt-get download`)
    PackageManager,
    /// A repository registered in the repository list, by name
    Repository(String),
    /// A pinned binary release of a known tool (e.g. `terraform`)
    PinnedRelease(String),
    /// A full URL listed in the URLs file
    DirectUrl,
    /// A filename joined to the configured base URL
    DirectFilename,
}

impl fmt::Display for PackageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageSource::PackageManager => write!(f, "apt"),
            PackageSource::Repository(name) => write!(f, "repository '{}'", name),
            PackageSource::PinnedRelease(tool) => write!(f, "{} release", tool),
            PackageSource::DirectUrl => write!(f, "url"),
            PackageSource::DirectFilename => write!(f, "filename"),
        }
    }
}

/// A single package the pipeline was asked to acquire
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRequest {
    source: PackageSource,
    identifier: String,
    version: Option<String>,
}

impl PackageRequest {
    pub fn new(source: PackageSource, identifier: String, version: Option<String>) -> Result<Self> {
        validate_identifier(&source, &identifier)?;
        if let Some(version) = &version {
            validate_version(version)?;
        }

        Ok(Self {
            source,
            identifier,
            version,
        })
    }

    /// Parses a manifest item of the form `identifier[=version]`.
    ///
    /// Only package-manager items carry a version; repository paths and URLs
    /// are taken verbatim.
    pub fn from_item(source: PackageSource, item: &str) -> Result<Self> {
        let item = item.trim();
        match source {
            PackageSource::PackageManager => match item.split_once('=') {
                Some((name, version)) => Self::new(
                    source,
                    name.trim().to_string(),
                    Some(version.trim().to_string()),
                ),
                None => Self::new(source, item.to_string(), None),
            },
            PackageSource::PinnedRelease(ref tool) => {
                // `terraform,1.6.2` and `terraform,terraform=1.6.2` are equivalent
                let version = match item.split_once('=') {
                    Some((_, version)) => version.trim(),
                    None => item,
                };
                let tool = tool.clone();
                Self::new(source, tool, Some(version.to_string()))
            }
            _ => Self::new(source, item.to_string(), None),
        }
    }

    pub fn source(&self) -> &PackageSource {
        &self.source
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Key used by the run-wide "already downloaded" set
    pub fn dedup_key(&self) -> String {
        match &self.version {
            Some(version) => format!("{}={}", self.identifier, version),
            None => self.identifier.clone(),
        }
    }
}

impl fmt::Display for PackageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.dedup_key(), self.source)
    }
}

fn validate_identifier(source: &PackageSource, identifier: &str) -> Result<()> {
    if identifier.is_empty() {
        anyhow::bail!("Package identifier cannot be empty");
    }

    if identifier.len() > MAX_IDENTIFIER_LENGTH {
        anyhow::bail!(
            "Package identifier is too long ({} bytes). Maximum allowed: {} bytes",
            identifier.len(),
            MAX_IDENTIFIER_LENGTH
        );
    }

    if identifier.chars().any(char::is_whitespace) {
        anyhow::bail!("Package identifier '{}' contains whitespace", identifier);
    }

    if *source == PackageSource::PackageManager {
        // Security: names are passed as arguments to apt-get, so a leading
        // dash would be read as an option.
        if identifier.starts_with('-') {
            anyhow::bail!(
                "Package name '{}' must not start with '-'",
                identifier
            );
        }

        if !identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | ':' | '_'))
        {
            anyhow::bail!(
                "Package name '{}' contains invalid characters. Only alphanumeric, '-', '+', '.', ':' and '_' are allowed.",
                identifier
            );
        }
    }

    Ok(())
}

fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        anyhow::bail!("Package version cannot be empty");
    }

    if version.len() > MAX_VERSION_LENGTH {
        anyhow::bail!(
            "Package version is too long ({} bytes). Maximum allowed: {} bytes",
            version.len(),
            MAX_VERSION_LENGTH
        );
    }

    if !version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '~' | ':' | '_'))
    {
        anyhow::bail!(
            "Package version '{}' contains invalid characters",
            version
        );
    }

    Ok(())
}
